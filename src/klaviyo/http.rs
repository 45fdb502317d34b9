use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use super::client::{FlowsApi, ProviderError, ProviderResponse};
use crate::config::FlowServiceConfig;
use crate::error::{FlowBuilderError, Result};
use crate::flow::CreateFlowRequest;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// 基于 reqwest 的 Klaviyo Flows API 客户端
#[derive(Clone)]
pub struct KlaviyoClient {
    client: reqwest::Client,
    endpoint: String,
    revision: String,
}

impl KlaviyoClient {
    /// 连接池与超时均使用 reqwest 默认值
    pub fn new<S1, S2>(base_url: S1, revision: S2) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let client = reqwest::Client::builder()
            .user_agent(concat!("klaviyo-flow-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FlowBuilderError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: flows_endpoint(&base_url.into()),
            revision: revision.into(),
        })
    }

    pub fn from_config(config: &FlowServiceConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.revision.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FlowsApi for KlaviyoClient {
    #[instrument(skip(self, api_key, request), fields(endpoint = %self.endpoint, flow = %request.name()))]
    async fn create_flow(
        &self,
        api_key: &str,
        request: &CreateFlowRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| ProviderError::Unreachable(format!("failed to encode request: {e}")))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Klaviyo-API-Key {api_key}"))
            .header("accept", JSON_API_MEDIA_TYPE)
            .header("content-type", JSON_API_MEDIA_TYPE)
            .header("revision", &self.revision)
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("failed to read response: {e}")))?;
        let body = parse_body(&text);

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Klaviyo rejected flow");
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Klaviyo accepted flow");
        Ok(ProviderResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// `{base}/flows/`，容忍末尾斜杠和已包含 `/flows` 的地址
pub fn flows_endpoint(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/flows") {
        format!("{base}/")
    } else {
        format!("{base}/flows/")
    }
}

/// 响应体优先按 JSON 解析，否则保留原始文本，空响应为 null
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_targets_flows_endpoint() {
        let client = KlaviyoClient::new("http://127.0.0.1:9000/api/", "2024-10-15.pre").unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9000/api/flows/");
    }

    #[test]
    fn endpoint_normalization() {
        assert_eq!(
            flows_endpoint("https://a.klaviyo.com/api"),
            "https://a.klaviyo.com/api/flows/"
        );
        assert_eq!(
            flows_endpoint("https://a.klaviyo.com/api/"),
            "https://a.klaviyo.com/api/flows/"
        );
        assert_eq!(
            flows_endpoint("http://localhost:9000/api/flows/"),
            "http://localhost:9000/api/flows/"
        );
    }

    #[test]
    fn body_parsing_falls_back_to_text() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({ "a": 1 }));
        assert_eq!(parse_body("Bad Gateway"), json!("Bad Gateway"));
    }
}
