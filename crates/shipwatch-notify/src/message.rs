//! Rendering of chat messages from snapshots.
//!
//! Formatting lives here, decision-making lives in the change detector.
//! The target is Google Chat's plain-text webhook format: `*bold*`
//! markers and `<url|text>` links.

use shipwatch_core::{Snapshot, COURIER_NAME};

/// Renders the notification text for a package update.
///
/// When a user-assigned `label` exists it becomes the headline, with the
/// tracking number in parentheses.
#[must_use]
pub fn render_update(snapshot: &Snapshot, label: Option<&str>) -> String {
    let title = match label {
        Some(label) => format!("📦 {label} ({})", snapshot.tracking_number),
        None => format!("📦 Package Update - {}", snapshot.tracking_number),
    };

    let status_display = if snapshot.status.is_empty() {
        "Unknown"
    } else {
        &snapshot.status
    };

    let mut lines = vec![
        format!("*{title}*"),
        format!("{} *Status:* {status_display}", status_glyph(&snapshot.status)),
        format!("🚚 *Courier:* {COURIER_NAME}"),
    ];

    if let Some(latest) = snapshot.latest_checkpoint() {
        lines.push(String::new());
        lines.push("*Latest Update:*".to_owned());
        lines.push(format!("📅 {} {}", latest.date, latest.time).trim_end().to_owned());
        if !latest.activity.is_empty() {
            lines.push(format!("📝 {}", latest.activity));
        }
        if !latest.location.is_empty() {
            lines.push(format!("📍 {}", latest.location));
        }
    }

    lines.push(String::new());
    lines.push(format!("🔗 <{}|View Full Tracking>", snapshot.url));

    lines.join("\n")
}

fn status_glyph(status: &str) -> &'static str {
    match status {
        "DELIVERED" => "✅",
        "IN TRANSIT" => "🚛",
        "PENDING" => "⏳",
        "OUT FOR DELIVERY" => "🚚",
        _ => "📍",
    }
}
