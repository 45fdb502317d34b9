use serde_json::{json, Value};
use thiserror::Error;

use crate::flow::{BuildError, ValidationError};
use crate::klaviyo::ProviderError;

/// 请求处理的终止错误，每种都对应固定的 HTTP 状态码
#[derive(Debug, Clone, Error)]
pub enum FlowServiceError {
    #[error("Missing KLAVIYO_API_KEY environment variable.")]
    MissingApiKey,
    #[error("Invalid JSON payload.")]
    InvalidJson(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Klaviyo API request failed.")]
    Provider { status: u16, details: Value },
    #[error("Failed to reach Klaviyo.")]
    Gateway(String),
}

impl FlowServiceError {
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingApiKey => 500,
            Self::InvalidJson(_) | Self::Validation(_) | Self::Build(_) => 400,
            Self::Provider { status, .. } => *status,
            Self::Gateway(_) => 502,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            Self::InvalidJson(message) | Self::Gateway(message) => Some(json!(message)),
            Self::Provider { details, .. } => Some(details.clone()),
            _ => None,
        }
    }

    /// `{ error, details? }`
    pub fn to_body(&self) -> Value {
        let mut body = json!({ "error": self.to_string() });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        body
    }
}

impl From<ProviderError> for FlowServiceError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Rejected { status, body } => Self::Provider {
                status,
                details: body,
            },
            ProviderError::Unreachable(message) => Self::Gateway(message),
        }
    }
}
