//! Integration tests for `Notifier` against a local `wiremock` server.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shipwatch_notify::{Notifier, NotifyError};

fn test_notifier(url: &str) -> Notifier {
    Notifier::new(url, 5).expect("failed to build test Notifier")
}

#[tokio::test]
async fn send_posts_single_text_field_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(serde_json::json!({ "text": "package update" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = test_notifier(&format!("{}/hook", server.uri()));
    notifier.send("package update").await.unwrap();
}

#[tokio::test]
async fn non_2xx_response_is_an_error_not_a_panic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let notifier = test_notifier(&format!("{}/hook", server.uri()));
    let err = notifier.send("package update").await.unwrap_err();
    let NotifyError::UnexpectedStatus { status, body } = err else {
        panic!("expected UnexpectedStatus, got: {err:?}");
    };
    assert_eq!(status, 403);
    assert_eq!(body, "invalid token");
}

#[tokio::test]
async fn connection_failure_is_an_http_error() {
    let notifier = test_notifier("http://127.0.0.1:1/hook");
    let err = notifier.send("package update").await.unwrap_err();
    assert!(matches!(err, NotifyError::Http(_)), "got: {err:?}");
}
