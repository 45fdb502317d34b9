use crate::klaviyo::{DEFAULT_BASE_URL, DEFAULT_REVISION};

use super::env::{EnvConfig, API_KEY_VAR, BASE_URL_VAR, REVISION_VAR};

/// 请求处理器的配置
///
/// 在进程启动时构造一次并注入处理器，之后只读。API Key 缺失不会阻止启动，
/// 而是在每个请求上报告为配置错误。
#[derive(Clone)]
pub struct FlowServiceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub revision: String,
}

impl FlowServiceConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            revision: DEFAULT_REVISION.to_string(),
        }
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(Some(api_key.into()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(EnvConfig::get_env_optional(API_KEY_VAR));
        if let Some(base_url) = EnvConfig::get_env_optional(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(revision) = EnvConfig::get_env_optional(REVISION_VAR) {
            config.revision = revision;
        }
        config
    }

    /// 空白的 Key 与未配置同等对待
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl std::fmt::Debug for FlowServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowServiceConfig")
            .field("api_key", &self.api_key().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("revision", &self.revision)
            .finish()
    }
}
