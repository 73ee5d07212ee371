use serde_json::json;
use shelfwise_core::ShelfError;
use shelfwise_http::RowSourceClient;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> RowSourceClient {
    RowSourceClient::new(format!("{}/exec", server.uri())).expect("client")
}

#[tokio::test]
async fn test_fetch_rows_posts_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exec"))
        .and(body_json(json!({"action": "getShelfGrid"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                ["shelfId", "userEmail", "productsJson"],
                ["s1", "a@x.com", "[{\"id\":\"p1\",\"position\":\"A1\"}]"],
                ["s2", "b@x.com", ""]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client_for(&server).await.fetch_rows().await.expect("rows");
    assert_eq!(rows.row_count(), 2);
    assert_eq!(rows.column_index("productsJson"), Some(2));
}

#[tokio::test]
async fn test_custom_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"action": "getPlacements"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [["shelfId"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await.with_action("getPlacements");
    let rows = client.fetch_rows().await.expect("rows");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_no_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Sheet not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let envelope = client.fetch_envelope().await.expect("envelope");
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Sheet not found"));
    assert!(client.fetch_rows().await.expect("rows").is_empty());
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.fetch_rows().await.unwrap_err();
    assert!(matches!(err, ShelfError::Http(ref msg) if msg.contains("500")));

    assert!(client.fetch_rows_or_empty().await.is_empty());
}

#[tokio::test]
async fn test_malformed_envelope_is_schema_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"products": []}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.fetch_rows().await.unwrap_err();
    assert!(matches!(err, ShelfError::Schema(_)));
}

#[tokio::test]
async fn test_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.fetch_rows().await.unwrap_err();
    assert!(matches!(err, ShelfError::Http(ref msg) if msg.contains("parse JSON")));
}

#[tokio::test]
async fn test_check_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("action", "checkApiStatus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "API is running",
            "version": "1.0.1"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).await.check_status().await.expect("status");
    assert!(status.success);
    assert_eq!(status.version.as_deref(), Some("1.0.1"));
}

#[tokio::test]
async fn test_unreachable_host() {
    let client = RowSourceClient::with_timeout("http://127.0.0.1:1/exec", 2).expect("client");
    let err = client.fetch_rows().await.unwrap_err();
    assert!(matches!(err, ShelfError::Http(_)));
}
