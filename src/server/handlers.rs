//! `POST /generate-qr`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use super::AppState;
use crate::config::ServerConfig;
use crate::error::{EncodeError, RenderError};
use crate::render::render_png;

/// Failure modes of the endpoint, each mapped to a status and a JSON
/// `{"error": ...}` body
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a JSON object (or has the wrong content type)
    #[error("Request must be JSON")]
    NotJson,
    /// Body exceeds the configured limit
    #[error("Request body too large")]
    TooLarge,
    /// `data` missing, null or empty
    #[error("No data provided")]
    NoData,
    /// Payload could not be encoded
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// PNG generation failed
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The blocking worker panicked or was cancelled
    #[error("encoding worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotJson | ApiError::NoData | ApiError::Encode(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Render(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// POST /generate-qr with `{"data": "..."}`, answers with a PNG
pub async fn generate_qr(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge
        } else {
            ApiError::NotJson
        }
    })?;
    let text = request_text(&body)?;

    let config = state.config.clone();
    let png = tokio::task::spawn_blocking(move || generate_png(&text, &config)).await??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Text to encode from the request body. Only a non-empty string is
/// accepted. JSON values that are falsy the way a dynamic language reads
/// them (`null`, `false`, any zero, `[]`, `{}`) count as missing data;
/// any other non-string value is rejected as a malformed request.
pub fn request_text(body: &Value) -> Result<String, ApiError> {
    let Value::Object(fields) = body else {
        return Err(ApiError::NotJson);
    };
    match fields.get("data") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(value) if !is_falsy(value) => Err(ApiError::NotJson),
        _ => Err(ApiError::NoData),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn generate_png(text: &str, config: &ServerConfig) -> Result<Vec<u8>, ApiError> {
    let code = crate::encode(text.as_bytes(), config.ec_level)?;
    let png = render_png(&code, config.module_scale, config.border)?;
    debug!(
        len = text.len(),
        version = code.version.number(),
        png_bytes = png.len(),
        "generated symbol"
    );
    Ok(png)
}
