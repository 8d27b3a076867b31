//! HTTP contract of `POST /generate-qr`

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use qr_forge::config::ServerConfig;
use qr_forge::reader::read_raster;
use qr_forge::server::{AppState, create_router};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(ServerConfig::default()))
}

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate-qr")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

fn error_message(body: &[u8]) -> String {
    let value: Value = serde_json::from_slice(body).unwrap();
    value["error"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_generates_png() {
    let (status, content_type, body) = send(app(), json_request(r#"{"data": "HELLO"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert!(body.starts_with(b"\x89PNG\r\n\x1a\n"));

    let image = image::load_from_memory(&body).unwrap().to_luma8();
    // version 1 at scale 10 with a 4-module border
    assert_eq!(image.dimensions(), (290, 290));
    let decoded = read_raster(&image, 10, 4).unwrap();
    assert_eq!(decoded.data, b"HELLO");
}

#[tokio::test]
async fn test_uses_configured_level_and_scale() {
    let config = ServerConfig {
        module_scale: 2,
        border: 1,
        ec_level: qr_forge::ECLevel::H,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(config));
    let (status, _, body) = send(app, json_request(r#"{"data": "HELLO"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let image = image::load_from_memory(&body).unwrap().to_luma8();
    assert_eq!(image.dimensions(), (46, 46));
    assert_eq!(read_raster(&image, 2, 1).unwrap().ec_level, qr_forge::ECLevel::H);
}

#[tokio::test]
async fn test_missing_data() {
    for body in [r#"{}"#, r#"{"data": ""}"#, r#"{"data": null}"#] {
        let (status, content_type, response) = send(app(), json_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(error_message(&response), "No data provided");
    }
}

#[tokio::test]
async fn test_not_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/generate-qr")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("data=HELLO"))
        .unwrap();
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Request must be JSON");

    let (status, _, body) = send(app(), json_request("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Request must be JSON");

    let (status, _, body) = send(app(), json_request(r#"["HELLO"]"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Request must be JSON");
}

#[tokio::test]
async fn test_non_string_data_rejected() {
    for body in [
        r#"{"data": 42}"#,
        r#"{"data": true}"#,
        r#"{"data": {"a": 1}}"#,
        r#"{"data": ["HELLO"]}"#,
    ] {
        let (status, content_type, response) = send(app(), json_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(error_message(&response), "Request must be JSON", "{body}");
    }
}

#[tokio::test]
async fn test_falsy_data_is_missing() {
    for body in [
        r#"{"data": 0}"#,
        r#"{"data": -0.0}"#,
        r#"{"data": 0e10}"#,
        r#"{"data": false}"#,
        r#"{"data": []}"#,
    ] {
        let (status, _, response) = send(app(), json_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_message(&response), "No data provided", "{body}");
    }
}

#[tokio::test]
async fn test_payload_too_long_for_symbol() {
    let config = ServerConfig {
        max_body_bytes: 1 << 20,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(config));
    let body = format!(r#"{{"data": "{}"}}"#, "a".repeat(3000));
    let (status, _, response) = send(app, json_request(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&response).contains("does not fit"));
}

#[tokio::test]
async fn test_body_limit() {
    let config = ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(config));
    let body = format!(r#"{{"data": "{}"}}"#, "a".repeat(200));
    let (status, _, response) = send(app, json_request(&body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_message(&response), "Request body too large");
}

#[tokio::test]
async fn test_other_routes() {
    let request = Request::builder()
        .method("GET")
        .uri("/generate-qr")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let request = Request::builder()
        .method("POST")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
