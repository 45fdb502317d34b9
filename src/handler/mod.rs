pub mod error;

pub use error::FlowServiceError;

use serde_json::{json, Value};
use tracing::instrument;

use crate::config::FlowServiceConfig;
use crate::flow::{
    build_create_flow_request, normalize_submission, validate_flow_request, CreateFlowRequest,
    FlowSubmission,
};
use crate::klaviyo::{DynFlowsApi, ProviderResponse};

/// 处理器返回给 HTTP 层的统一响应
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Value,
}

impl HandlerResponse {
    pub fn success(response: ProviderResponse) -> Self {
        Self {
            status: response.status,
            body: json!({ "data": response.body }),
        }
    }

    pub fn failure(error: &FlowServiceError) -> Self {
        Self {
            status: error.status(),
            body: error.to_body(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 流程提交处理器
///
/// 解析 → 规范化 → 校验 → 构建 → 调用 Klaviyo，每条路径只尝试一次。
pub struct FlowRequestHandler {
    config: FlowServiceConfig,
    api: DynFlowsApi,
}

impl FlowRequestHandler {
    pub fn new(config: FlowServiceConfig, api: DynFlowsApi) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &FlowServiceConfig {
        &self.config
    }

    pub async fn handle(&self, body: &[u8]) -> HandlerResponse {
        match self.submit(body).await {
            Ok(response) => HandlerResponse::success(response),
            Err(error) => HandlerResponse::failure(&error),
        }
    }

    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn submit(&self, body: &[u8]) -> Result<ProviderResponse, FlowServiceError> {
        // 缺少 Key 时不解析请求体
        let Some(api_key) = self.config.api_key() else {
            tracing::error!("Klaviyo API key is not configured");
            return Err(FlowServiceError::MissingApiKey);
        };

        let submission = parse_submission(body).inspect_err(log_client_error)?;
        let request = prepare_create_flow(&submission).inspect_err(log_client_error)?;

        tracing::info!(
            flow = %request.name(),
            actions = request.definition().actions.len(),
            "Submitting flow to Klaviyo"
        );

        match self.api.create_flow(api_key, &request).await {
            Ok(response) => {
                tracing::info!(status = response.status, "Flow created");
                Ok(response)
            }
            Err(error) => {
                let error = FlowServiceError::from(error);
                match &error {
                    FlowServiceError::Gateway(cause) => {
                        tracing::error!(cause = %cause, "Klaviyo unreachable")
                    }
                    other => tracing::warn!(status = other.status(), "Klaviyo rejected flow"),
                }
                Err(error)
            }
        }
    }
}

pub fn parse_submission(body: &[u8]) -> Result<FlowSubmission, FlowServiceError> {
    serde_json::from_slice(body).map_err(|e| FlowServiceError::InvalidJson(e.to_string()))
}

/// 规范化、校验并构建 Flows API 请求体，不产生任何副作用
pub fn prepare_create_flow(
    submission: &FlowSubmission,
) -> Result<CreateFlowRequest, FlowServiceError> {
    let request = normalize_submission(submission);
    validate_flow_request(&request)?;
    Ok(build_create_flow_request(&request)?)
}

fn log_client_error(error: &FlowServiceError) {
    tracing::warn!(status = error.status(), error = %error, "Rejected flow submission");
}
