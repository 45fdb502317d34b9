use std::env;

use crate::error::{FlowBuilderError, Result};

pub const API_KEY_VAR: &str = "KLAVIYO_API_KEY";
pub const BASE_URL_VAR: &str = "KLAVIYO_API_BASE_URL";
pub const REVISION_VAR: &str = "KLAVIYO_API_REVISION";
pub const HOST_VAR: &str = "FLOW_BUILDER_HOST";
pub const PORT_VAR: &str = "FLOW_BUILDER_PORT";
pub const DEBUG_VAR: &str = "FLOW_BUILDER_DEBUG";

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 加载当前目录下的 `.env` 文件（不存在时忽略）
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
        }
    }

    /// 获取可选的环境变量，空白值视为未设置
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 获取端口等可解析的环境变量
    pub fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
        match Self::get_env_optional(key) {
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                FlowBuilderError::Config(format!("environment variable '{key}' has invalid value `{raw}`"))
            }),
            None => Ok(None),
        }
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var(DEBUG_VAR).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_optional_ignores_blank() {
        env::set_var("FLOW_BUILDER_TEST_BLANK", "   ");
        assert_eq!(EnvConfig::get_env_optional("FLOW_BUILDER_TEST_BLANK"), None);
        env::remove_var("FLOW_BUILDER_TEST_BLANK");
    }

    #[test]
    fn test_get_env_optional_missing() {
        assert_eq!(EnvConfig::get_env_optional("FLOW_BUILDER_TEST_MISSING"), None);
    }

    #[test]
    fn test_get_env_parsed() {
        env::set_var("FLOW_BUILDER_TEST_PORT", "8081");
        let port: Option<u16> = EnvConfig::get_env_parsed("FLOW_BUILDER_TEST_PORT").unwrap();
        assert_eq!(port, Some(8081));

        env::set_var("FLOW_BUILDER_TEST_PORT", "eighty");
        assert!(EnvConfig::get_env_parsed::<u16>("FLOW_BUILDER_TEST_PORT").is_err());
        env::remove_var("FLOW_BUILDER_TEST_PORT");
    }
}
