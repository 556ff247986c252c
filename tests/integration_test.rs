//! Integration tests for postr
//!
//! These tests run the real HTTP client, and a whole search session on top
//! of it, against a local mock search endpoint.

use postr::client::{FetchError, HttpSearchClient, SearchBackend};
use postr::location::MemoryLocation;
use postr::query::QueryParams;
use postr::search::Segment;
use postr::session::{SearchHandle, SearchSession, SessionSettings, ViewSnapshot};
use postr::view::{self, Column, Pagination, TableRenderer, TableRow};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to build a client for the mock server
fn client_for(server: &MockServer) -> HttpSearchClient {
    HttpSearchClient::new(&format!("{}/posts/search", server.uri()), Duration::from_secs(5)).unwrap()
}

/// Helper function to build one post as the service returns it
fn post_json(id: u64, title: &str, body: &str, tags: &[&str]) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "body": body,
        "tags": tags,
        "reactions": { "likes": 1, "dislikes": 0 },
        "views": 12,
        "userId": 3
    })
}

/// Helper function to build a response body
fn posts_body(posts: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    json!({ "posts": posts, "total": total, "skip": 0, "limit": 10 })
}

async fn settled(handle: &SearchHandle, completed: u64) -> ViewSnapshot {
    tokio::time::timeout(
        Duration::from_secs(5),
        handle.wait_until(|s| s.completed_requests >= completed && !s.loading),
    )
    .await
    .expect("session did not settle")
    .unwrap()
}

#[tokio::test]
async fn test_search_sends_query_skip_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/search"))
        .and(query_param("q", "love"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(
            vec![post_json(21, "Love", "love story", &["love", "fiction"])],
            21,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let params = QueryParams::default().with_text("love").with_page(3, 10).unwrap();
    let result = client_for(&server).search(&params).await.unwrap();

    assert_eq!(result.total, 21);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].id, 21);
    assert_eq!(result.records[0].tags, vec!["love", "fiction"]);
}

#[tokio::test]
async fn test_search_preserves_service_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(
            vec![post_json(9, "c", "c", &["x"]), post_json(2, "a", "a", &["x"]), post_json(5, "b", "b", &["x"])],
            3,
        )))
        .mount(&server)
        .await;

    let result = client_for(&server).search(&QueryParams::default()).await.unwrap();
    let ids: Vec<u64> = result.records.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![9, 2, 5]);
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = client_for(&server).search(&QueryParams::default()).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            detail: "internal error".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).search(&QueryParams::default()).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_transport() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client =
        HttpSearchClient::new(&format!("http://127.0.0.1:{port}/posts/search"), Duration::from_secs(5))
            .unwrap();

    let err = client.search(&QueryParams::default()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_session_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(
            vec![post_json(1, "T", "hello world", &["x", "y"])],
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "wor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(
            vec![
                post_json(1, "T", "hello world", &["x", "y"]),
                post_json(7, "U", "word games", &["y"]),
            ],
            2,
        )))
        .mount(&server)
        .await;

    let backend: Arc<dyn SearchBackend> = Arc::new(client_for(&server));
    let settings = SessionSettings {
        debounce: Duration::from_millis(20),
        ..SessionSettings::default()
    };
    let location = MemoryLocation::default();
    let handle = SearchSession::spawn(backend, settings, location.clone()).unwrap();

    let first = settled(&handle, 1).await;
    assert_eq!(first.rows.len(), 1);
    assert_eq!(first.tag_options, vec!["x", "y"]);

    handle.set_text("wor").unwrap();
    let second = settled(&handle, 2).await;
    assert_eq!(second.rows.len(), 2);
    assert_eq!(second.tag_options, vec!["x", "y"]);

    handle.set_tags(["x"]).unwrap();
    let third = settled(&handle, 3).await;
    assert_eq!(third.rows.len(), 1);
    assert_eq!(third.total, 2);
    let written = location.state().unwrap();
    assert_eq!(written.page, Some(1));
    assert_eq!(written.search, "wor");
    assert_eq!(written.tags, vec!["x"]);

    let rows = view::rows(&third);
    assert_eq!(
        rows[0].body,
        vec![
            Segment::Literal("hello ".to_string()),
            Segment::Matched("wor".to_string()),
            Segment::Literal("ld".to_string()),
        ]
    );

    handle.shutdown().await;
}

#[derive(Default)]
struct TextRenderer {
    output: Vec<String>,
}

impl TableRenderer for TextRenderer {
    fn render_table(&mut self, columns: &[Column], rows: &[TableRow], pagination: Pagination, _loading: bool) {
        let header: Vec<&str> = columns.iter().map(|c| c.title).collect();
        self.output.push(header.join(" | "));
        for row in rows {
            self.output.push(format!("{} | {} | {}", row.id, row.title, row.tags.join(",")));
        }
        self.output.push(format!("page {}/{}", pagination.page, pagination.page_count));
    }

    fn render_error(&mut self, message: &str) {
        self.output.push(format!("error: {message}"));
    }
}

#[tokio::test]
async fn test_session_failure_shows_error_then_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body(
            vec![post_json(1, "T", "hello world", &["x"])],
            1,
        )))
        .mount(&server)
        .await;

    let backend: Arc<dyn SearchBackend> = Arc::new(client_for(&server));
    let handle =
        SearchSession::spawn(backend, SessionSettings::default(), MemoryLocation::default()).unwrap();
    settled(&handle, 1).await;

    handle.set_text("down").unwrap();
    handle.submit().unwrap();
    let failed = settled(&handle, 2).await;

    let mut renderer = TextRenderer::default();
    view::render(&failed, &mut renderer);
    assert_eq!(renderer.output.len(), 1);
    assert!(renderer.output[0].starts_with("error: "));
    assert!(renderer.output[0].contains("503"));

    handle.set_text("").unwrap();
    handle.submit().unwrap();
    let recovered = settled(&handle, 3).await;

    let mut renderer = TextRenderer::default();
    view::render(&recovered, &mut renderer);
    assert_eq!(renderer.output[0], "ID | Title | Body | Tags");
    assert_eq!(renderer.output[1], "1 | T | x");
    assert_eq!(renderer.output[2], "page 1/1");

    handle.shutdown().await;
}
