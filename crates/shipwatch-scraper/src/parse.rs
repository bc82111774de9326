//! Extraction of tracking status and checkpoint history from page HTML.
//!
//! The tracking site renders history entries as list items whose inner text
//! stacks date, time, activity, and location on separate lines. Parsing
//! works on a text-line reduction of the page: a line containing a
//! `D-Mon-YYYY` date opens a checkpoint block of up to five lines, and the
//! remaining lines of the block are classified heuristically. The
//! heuristics are deliberately loose — the site's markup is unstable, its
//! field order is not, so line-level pattern matching has proven more
//! durable than selector-based extraction.

use regex::Regex;

use shipwatch_core::{Checkpoint, COURIER_NAME};

/// How many lines after a date line belong to the same checkpoint block.
const CHECKPOINT_BLOCK_LINES: usize = 5;

/// Status labels probed in order against the whole page text. The first
/// match wins, so `IN TRANSIT` outranks `DELIVERED` appearing in boilerplate
/// further down the page.
const STATUS_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)IN TRANSIT|IN-TRANSIT", "IN TRANSIT"),
    (r"(?i)DELIVERED", "DELIVERED"),
    (r"(?i)PENDING", "PENDING"),
    (r"(?i)OUT FOR DELIVERY", "OUT FOR DELIVERY"),
];

/// Result of parsing one tracking page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Coarse status label; empty when no known label appears on the page.
    pub status: String,
    /// Checkpoints in page order, which is the site's newest-first order.
    pub checkpoints: Vec<Checkpoint>,
}

/// Parses a fetched tracking page into status and checkpoint history.
///
/// A page with no recognizable status and no checkpoints parses to an
/// empty [`ParsedPage`]; emptiness is not an error at this layer.
#[must_use]
pub fn parse_tracking_page(html: &str) -> ParsedPage {
    let lines = page_text_lines(html);
    let full_text = lines.join("\n");

    ParsedPage {
        status: classify_status(&full_text),
        checkpoints: extract_checkpoints(&lines),
    }
}

/// Maps page text to a coarse status label via the ordered pattern list,
/// or an empty string when nothing matches.
fn classify_status(text: &str) -> String {
    for (pattern, label) in STATUS_PATTERNS {
        let re = Regex::new(pattern).expect("valid status regex");
        if re.is_match(text) {
            return (*label).to_string();
        }
    }
    String::new()
}

/// Scans text lines for checkpoint blocks: each line containing a
/// `D-Mon-YYYY` date opens a block of up to [`CHECKPOINT_BLOCK_LINES`]
/// lines, parsed independently.
fn extract_checkpoints(lines: &[String]) -> Vec<Checkpoint> {
    let date_re = date_regex();
    let mut checkpoints = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !date_re.is_match(line) {
            continue;
        }
        let end = (i + CHECKPOINT_BLOCK_LINES).min(lines.len());
        let checkpoint = parse_checkpoint(&lines[i..end]);
        if !checkpoint.date.is_empty() {
            checkpoints.push(checkpoint);
        }
    }

    checkpoints
}

/// Parses one checkpoint block into structured fields.
///
/// The first date and first `H:MM AM/PM` time found anywhere in the block
/// win. Every other line is classified as location or activity:
///
/// - lines that just repeat the date, the time, or the courier name are
///   dropped;
/// - dash-containing lines that are not dates read as locations
///   (`BANDRA-EAST`);
/// - bracketed tags and status words (`[IN TRANSIT]`, `ON WAY`) read as
///   activity;
/// - all-caps lines and lines naming compass points or common Indian
///   address words (`NAGAR`, `ROAD`) read as locations;
/// - anything left is activity.
///
/// Multiple activity lines are joined with `" - "`; the first location
/// candidate wins.
fn parse_checkpoint(block: &[String]) -> Checkpoint {
    let date_re = date_regex();
    let time_re = Regex::new(r"\d{1,2}:\d{2}\s*(?:AM|PM)").expect("valid time regex");
    let activity_re =
        Regex::new(r"(?i)\[.*?\]|IN TRANSIT|DELIVERED|ON WAY|IN |OUT").expect("valid activity regex");

    let date = block
        .iter()
        .find_map(|line| date_re.find(line))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let time = block
        .iter()
        .find_map(|line| time_re.find(line))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let mut activity_candidates: Vec<&str> = Vec::new();
    let mut location_candidates: Vec<&str> = Vec::new();

    for line in block {
        if *line == date || (!time.is_empty() && *line == time) || line == COURIER_NAME {
            continue;
        }

        if line.contains('-') && !date_re.is_match(line) {
            location_candidates.push(line);
        } else if activity_re.is_match(line) {
            activity_candidates.push(line);
        } else if is_shouting(line) || has_location_word(line) {
            location_candidates.push(line);
        } else {
            activity_candidates.push(line);
        }
    }

    Checkpoint {
        date,
        time,
        activity: activity_candidates.join(" - "),
        location: location_candidates.first().map_or_else(String::new, |s| (*s).to_string()),
    }
}

fn date_regex() -> Regex {
    Regex::new(r"\d{1,2}-(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)-\d{4}")
        .expect("valid date regex")
}

/// All alphabetic characters uppercase, with at least one of them.
fn is_shouting(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

fn has_location_word(line: &str) -> bool {
    let upper = line.to_uppercase();
    ["EAST", "WEST", "NORTH", "SOUTH", "NAGAR", "ROAD"]
        .iter()
        .any(|word| upper.contains(word))
}

/// Reduces HTML to trimmed, non-empty text lines.
///
/// Scripts and styles are removed whole, block-level closers and `<br>`
/// become newlines so stacked fields stay on separate lines, remaining tags
/// are stripped, and the handful of entities the site actually emits are
/// decoded.
pub(crate) fn page_text_lines(html: &str) -> Vec<String> {
    let script_re =
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid script regex");
    let break_re =
        Regex::new(r"(?i)<br\s*/?>|</(li|p|div|tr|h[1-6]|ul|ol|td)>").expect("valid break regex");
    let tag_re = Regex::new(r"(?is)<[^>]+>").expect("valid tag regex");

    let without_scripts = script_re.replace_all(html, " ");
    let with_breaks = break_re.replace_all(&without_scripts, "\n");
    let text = tag_re.replace_all(&with_breaks, " ");
    let decoded = decode_entities(&text);

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(collapse_spaces)
        .collect()
}

/// Collapses runs of whitespace within a line to single spaces.
fn collapse_spaces(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
