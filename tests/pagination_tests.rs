//! Pagination over the real HTTP client

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use soniox_batch::application::ports::{ApiError, HttpMethod};
use soniox_batch::application::{ListEndpoint, PaginationWalker};
use soniox_batch::domain::ApiConfig;
use soniox_batch::infrastructure::SonioxClient;

fn walker(server: &MockServer) -> PaginationWalker<SonioxClient> {
    let client = SonioxClient::new(ApiConfig::new("test-key").with_base_url(server.uri()));
    PaginationWalker::new(Arc::new(client))
}

fn items(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({ "id": format!("{prefix}-{i}") }))
        .collect()
}

#[tokio::test]
async fn cursor_pages_are_concatenated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": items("a", 100),
            "next_page_cursor": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("limit", "100"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": items("b", 40),
            "next_page_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let all = walker(&server)
        .collect(HttpMethod::Get, &ListEndpoint::FILES)
        .await
        .unwrap();

    assert_eq!(all.len(), 140);
    assert_eq!(all[0]["id"], "a-0");
    assert_eq!(all[139]["id"], "b-39");
}

#[tokio::test]
async fn offset_paging_stops_at_first_empty_page() {
    let server = MockServer::start().await;
    for (offset, count) in [("0", 100), ("100", 30), ("200", 0)] {
        Mock::given(method("GET"))
            .and(path("/transcriptions"))
            .and(query_param("offset", offset))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "transcriptions": items(offset, count) })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let all = walker(&server)
        .collect(HttpMethod::Get, &ListEndpoint::TRANSCRIPTIONS)
        .await
        .unwrap();

    assert_eq!(all.len(), 130);
    assert_eq!(server.received_requests().await.map_or(0, |r| r.len()), 3);
}

#[tokio::test]
async fn bare_array_pages_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(items("m", 3))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let all = walker(&server)
        .collect(HttpMethod::Get, &ListEndpoint::MODELS)
        .await
        .unwrap();

    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn scalar_page_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("unexpected")))
        .mount(&server)
        .await;

    let err = walker(&server)
        .collect(HttpMethod::Get, &ListEndpoint::FILES)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Malformed { .. }));
}
