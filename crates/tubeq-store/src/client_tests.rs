//! Tests for the store client and repositories against a mock PostgREST.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tubeq_models::{EntryId, QueueStatus, StatusUpdate, VideoId};

use crate::client::{Query, StoreClient, StoreConfig};
use crate::error::StoreError;
use crate::repos::{HistoryRepository, QueueRepository};
use crate::store::{QueueStore, SupabaseStore};

// =============================================================================
// Test Helpers
// =============================================================================

const API_KEY: &str = "test-service-key";

fn test_client(server: &MockServer) -> StoreClient {
    StoreClient::new(StoreConfig::new(server.uri(), API_KEY)).unwrap()
}

// =============================================================================
// Queue
// =============================================================================

#[tokio::test]
async fn test_next_pending_returns_first_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/video_queue"))
        .and(query_param("select", "*"))
        .and(query_param("status", "eq.pending"))
        .and(query_param("limit", "1"))
        .and(header("apikey", API_KEY))
        .and(header("authorization", "Bearer test-service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "youtube_url": "https://youtu.be/dQw4w9WgXcQ",
            "custom_description": "Launch day",
            "status": "pending",
            "error_message": null,
            "created_at": "2024-05-01T10:00:00+00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    let entry = repo.next_pending().await.unwrap().expect("entry");

    assert_eq!(entry.id, EntryId::from("7"));
    assert_eq!(entry.youtube_url, "https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(entry.description(), "Launch day");
}

#[tokio::test]
async fn test_next_pending_empty_queue() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/video_queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    assert!(repo.next_pending().await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_status_patches_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/video_queue"))
        .and(query_param("id", "eq.7"))
        .and(header("prefer", "return=minimal"))
        .and(body_json(json!({ "status": "failed", "error_message": "boom" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    repo.set_status(&EntryId::from("7"), &StatusUpdate::failed("boom"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/video_queue"))
        .and(query_param("id", "eq.6f1c2a9e"))
        .and(header("apikey", API_KEY))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    repo.delete(&EntryId::from("6f1c2a9e")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("id=eq.6f1c2a9e"));
}

#[tokio::test]
async fn test_unfiltered_delete_is_refused() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .delete("video_queue", &Query::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::RequestFailed(_)));
}

#[tokio::test]
async fn test_enqueue_inserts_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/video_queue"))
        .and(body_json(json!([
            {
                "youtube_url": "https://youtu.be/dQw4w9WgXcQ",
                "custom_description": "Weekly recap",
                "status": "pending"
            },
            {
                "youtube_url": "https://www.youtube.com/shorts/abc123def45",
                "custom_description": "Weekly recap",
                "status": "pending"
            }
        ])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    let urls = vec![
        " https://youtu.be/dQw4w9WgXcQ ".to_string(),
        String::new(),
        "https://www.youtube.com/shorts/abc123def45".to_string(),
    ];
    let count = repo.enqueue(&urls, Some("Weekly recap")).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_enqueue_rejects_whole_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    let err = repo
        .enqueue(&["https://youtu.be/dQw4w9WgXcQ", "https://vimeo.com/123456789"], None)
        .await
        .unwrap_err();

    match err {
        StoreError::InvalidUrls(urls) => assert_eq!(urls, vec!["https://vimeo.com/123456789"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_list_recent_orders_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/video_queue"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "b", "youtube_url": "https://youtu.be/BBBBBBBBBBB", "status": "failed",
              "error_message": "yt-dlp failed: HTTP Error 403" },
            { "id": "a", "youtube_url": "https://youtu.be/AAAAAAAAAAA", "status": "done" }
        ])))
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    let entries = repo.list_recent(Some(50)).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].status, QueueStatus::Failed);
    assert_eq!(entries[1].id, EntryId::from("a"));
}

// =============================================================================
// History
// =============================================================================

#[tokio::test]
async fn test_history_contains() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/history"))
        .and(query_param("video_id", "eq.dQw4w9WgXcQ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "video_id": "dQw4w9WgXcQ", "created_at": "2024-05-01T10:00:00+00:00" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/history"))
        .and(query_param("video_id", "eq.AAAAAAAAAAA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = HistoryRepository::new(test_client(&server));
    assert!(repo.contains(&VideoId::from("dQw4w9WgXcQ")).await.unwrap());
    assert!(!repo.contains(&VideoId::from("AAAAAAAAAAA")).await.unwrap());
}

#[tokio::test]
async fn test_record_history_through_store() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/history"))
        .and(body_json(json!({ "video_id": "dQw4w9WgXcQ" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseStore::new(test_client(&server));
    store
        .record_history(&VideoId::from("dQw4w9WgXcQ"))
        .await
        .unwrap();
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_error_status_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/video_queue"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid API key"}"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/history"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let store = SupabaseStore::new(test_client(&server));

    let err = store.next_pending().await.unwrap_err();
    assert!(matches!(err, StoreError::AuthError(ref m) if m.contains("Invalid API key")));

    let err = store
        .history_contains(&VideoId::from("dQw4w9WgXcQ"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ServerError(503, _)));
}

#[tokio::test]
async fn test_malformed_rows_are_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/video_queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "an array" })))
        .mount(&server)
        .await;

    let repo = QueueRepository::new(test_client(&server));
    let err = repo.next_pending().await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidResponse(_)));
}
