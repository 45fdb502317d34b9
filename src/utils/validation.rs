use crate::error::{FlowBuilderError, Result};

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证 API Key 格式
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FlowBuilderError::Config("API key must not be empty".to_string()));
        }

        if api_key.starts_with("your_") || api_key.starts_with('<') {
            return Err(FlowBuilderError::Config(
                "API key looks like a placeholder; provide a real Klaviyo private key".to_string(),
            ));
        }

        if !api_key.starts_with("pk_") {
            tracing::warn!("Klaviyo private API keys normally start with `pk_`");
        }

        Ok(())
    }

    /// 验证 URL 格式
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(FlowBuilderError::Config("URL must not be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FlowBuilderError::Config(format!(
                "URL `{url}` must start with http:// or https://"
            )));
        }

        Ok(())
    }
}
