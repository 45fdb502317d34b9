//! JSON 响应构建

use bytes::Bytes;
use http_body_util::Full;
use hyper::http::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

pub type ApiResponse = Response<Full<Bytes>>;

/// 构建带状态码的 JSON 响应
pub fn json_response(status: StatusCode, body: &Value) -> ApiResponse {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// 使用原始状态码构建响应；hyper 无法表示的状态码回退为 502
pub fn json_with_code(code: u16, body: &Value) -> ApiResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
    json_response(status, body)
}

pub fn error(status: StatusCode, message: &str) -> ApiResponse {
    json_response(status, &json!({ "error": message }))
}

pub fn not_found() -> ApiResponse {
    error(StatusCode::NOT_FOUND, "Not found.")
}

pub fn payload_too_large(limit: usize) -> ApiResponse {
    error(
        StatusCode::PAYLOAD_TOO_LARGE,
        &format!("Request body exceeds {limit} bytes."),
    )
}

/// 405 响应，附带 `Allow` 头
pub fn method_not_allowed(allowed: &[&str]) -> ApiResponse {
    let allow = allowed.join(", ");
    let mut response = error(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method not allowed. Allowed: {allow}"),
    );
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}
