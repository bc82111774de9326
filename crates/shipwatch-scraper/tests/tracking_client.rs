//! Integration tests for `TrackingClient` against a local `wiremock` server,
//! so no real network traffic is made. Covers the happy path, the
//! valid-but-empty page, and the folding of HTTP failures into
//! `TrackOutcome::Failed`.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shipwatch_core::TrackOutcome;
use shipwatch_scraper::{ScraperError, TrackingClient};

fn test_client(base_url: &str) -> TrackingClient {
    TrackingClient::new(5, "shipwatch-test/0.1", base_url)
        .expect("failed to build test TrackingClient")
}

const TRACKING_PAGE: &str = "<html><body>\
<div>Status: IN TRANSIT</div>\
<ul>\
<li>29-Jan-2026<br>11:26 AM<br>IN Anjani Courier<br>BANDRA-EAST</li>\
</ul>\
</body></html>";

#[tokio::test]
async fn track_parses_served_page_into_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1566745519"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRACKING_PAGE))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client.track("1566745519").await;

    let TrackOutcome::Ok(snapshot) = outcome else {
        panic!("expected Ok outcome, got {outcome:?}");
    };
    assert_eq!(snapshot.tracking_number, "1566745519");
    assert_eq!(snapshot.status, "IN TRANSIT");
    assert_eq!(snapshot.checkpoints.len(), 1);
    assert_eq!(snapshot.checkpoints[0].date, "29-Jan-2026");
    assert_eq!(snapshot.checkpoints[0].location, "BANDRA-EAST");
    assert_eq!(snapshot.url, format!("{}/1566745519", server.uri()));
}

#[tokio::test]
async fn track_treats_empty_page_as_valid_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1566745519"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Loading…</body></html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client.track("1566745519").await;

    let TrackOutcome::Ok(snapshot) = outcome else {
        panic!("expected Ok outcome, got {outcome:?}");
    };
    assert_eq!(snapshot.status, "");
    assert!(snapshot.checkpoints.is_empty());
}

#[tokio::test]
async fn fetch_page_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/0000000000"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("0000000000").await.unwrap_err();
    assert!(
        matches!(err, ScraperError::NotFound { .. }),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_page_maps_500_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1566745519"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("1566745519").await.unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn track_folds_http_failure_into_failed_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1566745519"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client.track("1566745519").await;

    let TrackOutcome::Failed(failure) = outcome else {
        panic!("expected Failed outcome, got {outcome:?}");
    };
    assert_eq!(failure.tracking_number, "1566745519");
    assert!(
        failure.error.contains("503"),
        "error should mention the status: {}",
        failure.error
    );
}

#[tokio::test]
async fn track_folds_connection_failure_into_failed_outcome() {
    // Port 1 on localhost refuses connections.
    let client = test_client("http://127.0.0.1:1");
    let outcome = client.track("1566745519").await;
    assert!(matches!(outcome, TrackOutcome::Failed(_)));
}
