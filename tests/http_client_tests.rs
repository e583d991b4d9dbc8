//! End-to-end tests for the reqwest-backed client.
//!
//! Each test starts a local mock server and dispatches through
//! [`RequestFacade::from_config`], so request encoding, headers, timeouts
//! and response interpretation are all exercised over real HTTP.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_request::{
    BaseUrl, BodyEncoding, Dispatched, HttpMethod, RequestConfig, RequestDescriptor,
    RequestError, RequestFacade, TransportError,
};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_facade(server: &MockServer) -> RequestFacade {
    let config = RequestConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    RequestFacade::from_config(config)
}

fn envelope(code: i64, data: serde_json::Value, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": code, "data": data, "msg": msg}))
}

#[tokio::test]
async fn test_post_json_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/create"))
        .and(header("content-type", "application/json"))
        .and(header_exists("user-agent"))
        .and(body_json(json!({"name": "Ada", "tags": ["admin"]})))
        .respond_with(envelope(200, json!({"id": 1, "name": "Ada"}), ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let result = facade
        .dispatch(
            RequestDescriptor::builder("users/create")
                .payload(json!({"name": "Ada", "tags": ["admin"]}))
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(result, Dispatched::Data(json!({"id": 1, "name": "Ada"})));
}

#[tokio::test]
async fn test_get_sends_payload_as_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/search"))
        .and(query_param("q", "ada"))
        .and(query_param("page", "2"))
        .respond_with(envelope(200, json!([{"id": 1}]), ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let data = facade
        .dispatch(
            RequestDescriptor::builder("users/search")
                .method(HttpMethod::Get)
                .payload(json!({"q": "ada", "page": 2}))
                .build(),
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();

    assert_eq!(data, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_form_encoded_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("user=ada"))
        .and(body_string_contains("remember=true"))
        .respond_with(envelope(200, json!("ok"), ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    facade
        .dispatch(
            RequestDescriptor::builder("login")
                .body_encoding(BodyEncoding::FormUrlEncoded)
                .payload(json!({"user": "ada", "remember": true}))
                .build(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_multipart_post_carries_every_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains("name=\"year\""))
        .and(body_string_contains("2024"))
        .respond_with(envelope(200, json!(null), ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    facade
        .dispatch(
            RequestDescriptor::builder("upload")
                .payload(json!({"title": "quarterly", "year": 2024}))
                .encode_as_multipart(true)
                .build(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_caller_headers_override_defaults_on_every_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(header("content-type", "text/plain"))
        .and(header("user-agent", "notes-app/2.0"))
        .respond_with(envelope(200, json!(null), ""))
        .expect(20)
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    for _ in 0..20 {
        facade
            .dispatch(
                RequestDescriptor::builder("notes")
                    .payload(json!("plain text note"))
                    .header("content-type", "text/plain")
                    .header("user-agent", "notes-app/2.0")
                    .build(),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_token_provider_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/me"))
        .and(header("token", "session-abc"))
        .respond_with(envelope(200, json!({"id": 3}), ""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let facade =
        create_facade(&mock_server).with_token_provider(|| Some("session-abc".to_string()));

    facade.dispatch(RequestDescriptor::new("me")).await.unwrap();
}

#[tokio::test]
async fn test_application_error_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/create"))
        .respond_with(envelope(500, json!(null), "bad input"))
        .mount(&mock_server)
        .await;

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let facade = create_facade(&mock_server);

    let error = facade
        .dispatch(
            RequestDescriptor::builder("users/create")
                .on_error(move |msg| sink.lock().unwrap().push(msg.to_string()))
                .build(),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, RequestError::Api { code: 500, .. }));
    assert_eq!(*errors.lock().unwrap(), vec!["bad input".to_string()]);
}

#[tokio::test]
async fn test_error_status_with_envelope_uses_its_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/create"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": 400, "msg": "name required"})),
        )
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let error = facade
        .dispatch(RequestDescriptor::new("users/create"))
        .await
        .unwrap_err();

    assert_eq!(error.api_message(), Some("name required"));
}

#[tokio::test]
async fn test_error_status_without_envelope_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let error = facade
        .dispatch(RequestDescriptor::new("users"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        RequestError::Transport(TransportError::Status { code: 502, .. })
    ));
    assert_eq!(error.to_string(), "Request failed with status code 502");
}

#[tokio::test]
async fn test_per_call_timeout_is_enforced_and_rewritten() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/slow"))
        .respond_with(envelope(200, json!(null), "").set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let facade = create_facade(&mock_server);

    let error = facade
        .dispatch(
            RequestDescriptor::builder("slow")
                .timeout(Duration::from_millis(50))
                .on_error(move |msg| sink.lock().unwrap().push(msg.to_string()))
                .build(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        RequestError::Transport(TransportError::Timeout { timeout_ms: 50 })
    ));
    assert_eq!(*errors.lock().unwrap(), vec!["Request timed out".to_string()]);
}

#[tokio::test]
async fn test_binary_download_with_content_disposition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/export"))
        .and(query_param("month", "2024-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; fileName=report.csv")
                .set_body_raw(b"id,total\n1,42\n".to_vec(), "text/csv"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let file = facade
        .download(
            RequestDescriptor::builder("reports/export")
                .method(HttpMethod::Get)
                .payload(json!({"month": "2024-01"}))
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(file.file_name, "report.csv");
    assert_eq!(file.file_blob, b"id,total\n1,42\n".to_vec());
}

#[tokio::test]
async fn test_binary_download_percent_encoded_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    "attachment; fileName=%E6%8A%A5%E8%A1%A8.xlsx",
                )
                .set_body_raw(vec![0x50, 0x4b, 0x03, 0x04], "application/octet-stream"),
        )
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let file = facade
        .download(
            RequestDescriptor::builder("reports/export")
                .method(HttpMethod::Get)
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(file.file_name, "报表.xlsx");
}

#[tokio::test]
async fn test_binary_download_json_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/export"))
        .respond_with(envelope(404, json!(null), "report not found"))
        .mount(&mock_server)
        .await;

    let facade = create_facade(&mock_server);

    let error = facade
        .download(
            RequestDescriptor::builder("reports/export")
                .method(HttpMethod::Get)
                .build(),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, RequestError::Api { code: 404, .. }));
    assert_eq!(error.to_string(), "report not found");
}

#[test]
fn test_dispatch_on_blocking_runtime() {
    tokio_test::block_on(async {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ping"))
            .respond_with(envelope(200, json!("pong"), ""))
            .mount(&mock_server)
            .await;

        let facade = create_facade(&mock_server);
        let data = facade.dispatch(RequestDescriptor::new("ping")).await.unwrap();

        assert_eq!(data, Dispatched::Data(json!("pong")));
    });
}
