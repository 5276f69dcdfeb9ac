//! HTTP contract tests for the API client
//!
//! These tests run the client against a wiremock server and check request
//! shapes, response parsing, and the error mapping.

use satlens_client::{AnalysisBackend, ApiClient, ClientConfig};
use satlens_core::error::SatlensError;
use satlens_core::models::{AnalysisState, ChatMessage, ReportFormat, UploadedFile};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri()))
}

fn jpeg() -> UploadedFile {
    UploadedFile::new("field.jpg", "image/jpeg", b"jpeg-payload".to_vec())
}

#[tokio::test]
async fn test_upload_sends_multipart_and_parses_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("name=\"analysis_types\""))
        .and(body_string_contains("change_detection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1",
            "filename": "field.jpg",
            "classification": {
                "landUse": {"Cropland": 60, "Water": 15, "Urban": 25},
                "confidence": 0.83
            },
            "ndvi": {"mean": 0.62, "std": 0.04, "healthScore": 78}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).upload_image(&jpeg()).await.unwrap();

    assert_eq!(result.id, "a1");
    assert_eq!(result.confidence_percent(), 83);
    assert_eq!(result.classification.land_use["Cropland"], 60.0);
}

#[tokio::test]
async fn test_upload_forwards_gpt_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(query_param("gptModel", "gpt-4o"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(ClientConfig::new(server.uri()).with_gpt_model("gpt-4o"));
    let result = client.upload_image(&jpeg()).await.unwrap();

    assert_eq!(result.id, "m1");
}

#[tokio::test]
async fn test_upload_server_error_maps_to_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let err = client_for(&server).upload_image(&jpeg()).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    match err {
        SatlensError::Http { message, .. } => assert_eq!(message.as_deref(), Some("model crashed")),
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/formats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).supported_formats().await.unwrap_err();
    assert!(matches!(err, SatlensError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_maps_to_network_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9"));

    let err = client.health_check().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_status_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analysis/a1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "progress": 100,
            "currentStep": "Analysis complete!",
            "result": {"id": "a1"}
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).analysis_status("a1").await.unwrap();

    assert_eq!(status.status, AnalysisState::Completed);
    assert_eq!(status.result.map(|r| r.id).as_deref(), Some("a1"));
}

#[tokio::test]
async fn test_status_escapes_reserved_characters_in_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analysis/a1%3Fx/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "progress": 20
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client_for(&server).analysis_status("a1?x").await.unwrap();

    assert_eq!(status.status, AnalysisState::Processing);
}

#[tokio::test]
async fn test_report_id_cannot_reach_other_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/analysis/..%2Fhealth%23/report"))
        .and(query_param("format", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("label,share\n"))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = client_for(&server).download_report("../health#", ReportFormat::Csv).await.unwrap();

    assert_eq!(bytes, b"label,share\n");
}

#[tokio::test]
async fn test_chat_sends_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "image_id": "a1",
            "message": "Any water?",
            "conversation_history": [{"type": "assistant", "content": "Hello!"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Yes, a river runs north-south.",
            "confidence": 0.77,
            "sources": ["ndvi"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![ChatMessage::assistant("Hello!")];
    let response = client_for(&server).chat_with_image("a1", "Any water?", &history).await.unwrap();

    assert_eq!(response.message, "Yes, a river runs north-south.");
    assert_eq!(response.sources, Some(vec!["ndvi".to_string()]));
}

#[tokio::test]
async fn test_download_csv_report_is_non_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analysis/a1/report"))
        .and(query_param("format", "csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("label,share\nCropland,60\n"),
        )
        .mount(&server)
        .await;

    let bytes = client_for(&server).download_report("a1", ReportFormat::Csv).await.unwrap();

    assert!(!bytes.is_empty());
    assert!(String::from_utf8_lossy(&bytes).starts_with("label,share"));
}

#[tokio::test]
async fn test_download_missing_report_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analysis/missing/report"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).download_report("missing", ReportFormat::Pdf).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_history_passes_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analysis/history"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a2", "filename": "b.png"},
            {"id": "a1", "filename": "a.png"}
        ])))
        .mount(&server)
        .await;

    let history = client_for(&server).analysis_history(2).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, "a2");
}

#[tokio::test]
async fn test_formats_and_health() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/formats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["jpeg", "png", "tiff"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "version": "1.2.0"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.supported_formats().await.unwrap(), vec!["jpeg", "png", "tiff"]);

    let health = client.health_check().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, "1.2.0");
}
