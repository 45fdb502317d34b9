use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;

use crate::flow::CreateFlowRequest;

/// Flows API 调用失败的两类情况
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// 服务端返回了非 2xx 状态码，原样转发状态码和诊断内容
    #[error("Klaviyo responded with status {status}")]
    Rejected { status: u16, body: Value },
    /// 网络层失败（无法连接、DNS 等）
    #[error("Klaviyo is unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

/// 创建流程的窄接口：一次调用，一次结果，不重试
#[async_trait]
pub trait FlowsApi: Send + Sync {
    async fn create_flow(
        &self,
        api_key: &str,
        request: &CreateFlowRequest,
    ) -> Result<ProviderResponse, ProviderError>;
}

pub type DynFlowsApi = Arc<dyn FlowsApi>;

/// 记录每次调用并按顺序回放预设结果的本地实现
///
/// 预设结果用完后返回 201 和一个回显了流程名称的响应体。
#[derive(Default, Clone)]
pub struct RecordingFlowsApi {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    replies: Arc<Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>>,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api_key: String,
    pub request: CreateFlowRequest,
}

impl RecordingFlowsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: Result<ProviderResponse, ProviderError>) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl FlowsApi for RecordingFlowsApi {
    async fn create_flow(
        &self,
        api_key: &str,
        request: &CreateFlowRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.lock().push(RecordedCall {
            api_key: api_key.to_string(),
            request: request.clone(),
        });

        if let Some(reply) = self.replies.lock().pop_front() {
            return reply;
        }

        let count = self.calls.lock().len();
        Ok(ProviderResponse {
            status: 201,
            body: serde_json::json!({
                "data": {
                    "type": "flow",
                    "id": format!("LOCAL{count}"),
                    "attributes": {
                        "name": request.name(),
                        "status": "draft"
                    }
                }
            }),
        })
    }
}
