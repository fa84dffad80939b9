//! Integration tests for the cursor pagination engine using wiremock
//!
//! These tests drive whole paged sequences against mocked endpoints,
//! verifying termination, cursor propagation and replay behavior.

use cloudmon::resources::entity;
use cloudmon::{Error, MonitoringClient};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entity_record(id: &str) -> serde_json::Value {
    json!({"id": id, "label": format!("host-{id}"), "metadata": {}})
}

/// Mount a two-page /entities listing keyed purely on the marker parameter,
/// so any number of fresh sequences replay the same pages.
async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/entities"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [entity_record("en1"), entity_record("en2")],
            "metadata": {"next_marker": "token-page-2"}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .and(query_param("marker", "token-page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [entity_record("en3")],
            "metadata": {"next_marker": null}
        })))
        .mount(server)
        .await;
}

/// Iterating a full sequence yields the concatenation of mapped items in
/// page order, then stops.
#[tokio::test]
async fn test_pagination_terminates_on_null_marker() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let entities = entity::list_entities(&client, None)
        .try_collect()
        .await
        .expect("sequence should drain");

    let ids: Vec<&str> = entities.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["en1", "en2", "en3"]);
}

/// A fresh sequence over the same pages replays the identical items.
#[tokio::test]
async fn test_replay_from_fresh_sequence_is_idempotent() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();

    let first = entity::list_entities(&client, None).try_collect().await.unwrap();
    let second = entity::list_entities(&client, None).try_collect().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

/// Page N+1 must be requested with exactly page N's marker; the first
/// request carries no marker at all. The query_param matchers above
/// enforce the shape, the expect() counts enforce one fetch per page.
#[tokio::test]
async fn test_cursor_propagates_to_next_request_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [entity_record("en1")],
            "metadata": {"next_marker": "abc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .and(query_param("marker", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [entity_record("en2")],
            "metadata": {"next_marker": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let mut sequence = entity::list_entities(&client, None);

    assert_eq!(sequence.next().await.unwrap().unwrap().id, "en1");
    assert_eq!(sequence.last_marker(), Some("abc"));
    assert_eq!(sequence.next().await.unwrap().unwrap().id, "en2");
    assert!(sequence.next().await.unwrap().is_none());
    assert!(sequence.is_exhausted());
}

/// A descriptor's start marker seeds the very first request.
#[tokio::test]
async fn test_start_marker_seeds_first_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .and(query_param("marker", "resume-here"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [entity_record("en9")],
            "metadata": {"next_marker": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let entities = entity::list_entities(&client, Some("resume-here"))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].id, "en9");
}

/// 204 No Content on the first page means an empty, exhausted sequence.
#[tokio::test]
async fn test_no_content_exhausts_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let mut sequence = entity::list_entities(&client, None);

    assert!(sequence.next().await.unwrap().is_none());
    assert!(sequence.is_exhausted());
    // Exhaustion is permanent; no further fetch happens (expect(1) above).
    assert!(sequence.next().await.unwrap().is_none());
}

/// Any unexpected status fails the sequence without retry.
#[tokio::test]
async fn test_unexpected_status_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"details": "maintenance"})),
        )
        .mount(&server)
        .await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let err = entity::list_entities(&client, None)
        .try_collect()
        .await
        .unwrap_err();

    match err {
        Error::UnexpectedStatus { status, url, .. } => {
            assert_eq!(status, 503);
            assert_eq!(url, "/entities");
        }
        other => panic!("expected unexpected-status error, got {other:?}"),
    }
}

/// A page body missing the metadata object is a decode error, not a panic.
#[tokio::test]
async fn test_page_without_metadata_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": []
        })))
        .mount(&server)
        .await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let err = entity::list_entities(&client, None)
        .try_collect()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::MissingField { record: "page", field: "metadata" }
    ));
}

/// The stream adapter yields the same items as direct pulls.
#[tokio::test]
async fn test_stream_adapter_matches_sequence() {
    use futures::TryStreamExt;

    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = MonitoringClient::with_base_url(&server.uri(), "test-token").unwrap();
    let streamed: Vec<_> = entity::list_entities(&client, None)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<&str> = streamed.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["en1", "en2", "en3"]);
}
