use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    response::{ErrorBody, log_app_error},
};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Rewrites plain-text error responses (extractor rejections, unmatched
/// routes, wrong methods) into the JSON error body. Status and the remaining
/// headers, such as `Allow` on a 405, are kept.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if !needs_json_body(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let message = read_message(parts.status, body).await;
    if parts.status.is_server_error() {
        log_app_error(&AppError::internal(message.clone()), parts.status);
    }

    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    let status = parts.status;
    (parts, Json(ErrorBody::new(status, message))).into_response()
}

fn needs_json_body(response: &Response) -> bool {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return false;
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    !(content_type.starts_with("application/json") || content_type.contains("+json"))
}

/// The rejection text when there is one, the reason phrase otherwise.
async fn read_message(status: StatusCode, body: Body) -> String {
    let text = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    if !text.is_empty() {
        return text;
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
