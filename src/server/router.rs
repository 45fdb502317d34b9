//! 请求路由

use std::convert::Infallible;
use std::error::Error as StdError;
use std::sync::Arc;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::{Method, Request};
use serde_json::json;

use super::response::{self, ApiResponse};
use crate::handler::{FlowRequestHandler, FlowServiceError, HandlerResponse};

pub const FLOWS_PATH: &str = "/api/flows";
pub const HEALTH_PATH: &str = "/health";
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 按方法与路径分发请求
pub async fn route<B>(
    req: Request<B>,
    handler: Arc<FlowRequestHandler>,
) -> Result<ApiResponse, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let path = req.uri().path().trim_end_matches('/').to_string();
    let method = req.method().clone();

    tracing::debug!(method = %method, path = %path, "Routing request");

    let response = match (method, path.as_str()) {
        (Method::GET, HEALTH_PATH) => response::json_response(
            hyper::StatusCode::OK,
            &json!({ "status": "healthy", "service": "klaviyo-flow-builder" }),
        ),
        (Method::POST, FLOWS_PATH) => create_flow(req, handler).await,
        (_, FLOWS_PATH) => response::method_not_allowed(&["POST"]),
        _ => response::not_found(),
    };

    Ok(response)
}

async fn create_flow<B>(req: Request<B>, handler: Arc<FlowRequestHandler>) -> ApiResponse
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    // 配置错误优先于读取请求体
    if handler.config().api_key().is_none() {
        tracing::error!("Klaviyo API key is not configured");
        let result = HandlerResponse::failure(&FlowServiceError::MissingApiKey);
        return response::json_with_code(result.status, &result.body);
    }

    let body = match Limited::new(req.into_body(), MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            tracing::warn!(limit = MAX_BODY_BYTES, "Request body too large");
            return response::payload_too_large(MAX_BODY_BYTES);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return response::error(
                hyper::StatusCode::BAD_REQUEST,
                "Failed to read request body.",
            );
        }
    };

    let result = handler.handle(&body).await;
    response::json_with_code(result.status, &result.body)
}
