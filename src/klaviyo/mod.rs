pub mod client;
pub mod http;

pub use client::{
    DynFlowsApi, FlowsApi, ProviderError, ProviderResponse, RecordedCall, RecordingFlowsApi,
};
pub use http::{flows_endpoint, parse_body, KlaviyoClient, JSON_API_MEDIA_TYPE};

/// 固定的 Flows API 版本
pub const DEFAULT_REVISION: &str = "2024-10-15.pre";
pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com/api";
