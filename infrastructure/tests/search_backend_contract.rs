//! HTTP contract tests for the remote search backend.

use sales_intel_application::ports::search_backend::{SearchBackend, SearchError};
use sales_intel_domain::SearchRequest;
use sales_intel_infrastructure::HttpSearchBackend;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend(server: &MockServer) -> HttpSearchBackend {
    HttpSearchBackend::new(format!("{}/api/search", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn posts_query_and_max_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "hot leads", "maxResults": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"data": {"messages": [
                {"id": "m1", "subject": "Hot lead from Acme", "sender": "Sarah Johnson"}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = backend(&server)
        .await
        .search(&SearchRequest::new("hot leads"))
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].sender(), Some("Sarah Johnson"));
}

#[tokio::test]
async fn returns_backend_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"summary": "You have 2 renewals."})),
        )
        .mount(&server)
        .await;

    let outcome = backend(&server)
        .await
        .search(&SearchRequest::new("renewals").with_max_results(3))
        .await
        .unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.summary.as_deref(), Some("You have 2 renewals."));
}

#[tokio::test]
async fn surfaces_backend_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Search failed: index offline"})),
        )
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .search(&SearchRequest::new("deals"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SearchError::Backend {
            status: 400,
            message: "Search failed: index offline".to_string()
        }
    );
}

#[tokio::test]
async fn falls_back_to_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .search(&SearchRequest::new("deals"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP error! status: 502");
}

#[tokio::test]
async fn non_json_success_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .search(&SearchRequest::new("deals"))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    // Nothing listens on a port once its listener is dropped.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/api/search", port);
    let backend = HttpSearchBackend::new(url, Duration::from_secs(2)).unwrap();
    let err = backend.search(&SearchRequest::new("deals")).await.unwrap_err();
    assert!(err.is_transport());
}
