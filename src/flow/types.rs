use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TIMEZONE: &str = "profile";

/// 客户端提交的原始载荷
///
/// 字段都是宽松的：缺失的字段取默认值，`smartSendingEnabled`、`status`、
/// `delay` 和 `customTracking` 接受任意 JSON 值，交给规范化阶段处理。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSubmission {
    #[serde(default)]
    pub flow_name: Option<String>,
    #[serde(default)]
    pub trigger: Option<TriggerSubmission>,
    #[serde(default)]
    pub steps: Option<Vec<StepSubmission>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerSubmission {
    #[serde(rename = "type", default)]
    pub trigger_type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSubmission {
    #[serde(default)]
    pub internal_name: Option<String>,
    #[serde(default)]
    pub subject_line: Option<String>,
    #[serde(default)]
    pub preview_text: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub reply_to_email: Option<String>,
    #[serde(default)]
    pub cc_email: Option<String>,
    #[serde(default)]
    pub bcc_email: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub smart_sending_enabled: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub delay: Value,
    #[serde(default)]
    pub custom_tracking: Value,
}

/// 延迟字段；非对象的 `delay` 视为未启用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelaySubmission {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub unit: Value,
    #[serde(default)]
    pub timezone: Value,
}

impl DelaySubmission {
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| object.get(name).cloned().unwrap_or(Value::Null);
        Some(Self {
            value: field("value"),
            unit: field("unit"),
            timezone: field("timezone"),
        })
    }
}

/// 规范化后的流程请求
///
/// 序列化结果与 [`FlowSubmission`] 的线上格式一致，因此可以再次规范化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRequest {
    pub flow_name: String,
    pub trigger: Trigger,
    pub steps: Vec<EmailStep>,
}

/// 触发器类型在规范化阶段只做裁剪，是否受支持由校验阶段判断
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub trigger_type: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    List,
    Segment,
}

impl TriggerKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "list" => Some(Self::List),
            "segment" => Some(Self::Segment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Segment => "segment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStep {
    pub internal_name: String,
    pub subject_line: String,
    pub preview_text: String,
    pub from_email: String,
    pub from_name: String,
    pub reply_to_email: String,
    pub cc_email: String,
    pub bcc_email: String,
    pub template_id: String,
    pub smart_sending_enabled: bool,
    pub status: StepStatus,
    pub delay: Option<Delay>,
    pub custom_tracking: Vec<TrackingParam>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Draft,
    Live,
    Manual,
    Disabled,
}

impl StepStatus {
    /// 未知或缺失的状态回退为 `draft`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("live") => Self::Live,
            Some("manual") => Self::Manual,
            Some("disabled") => Self::Disabled,
            _ => Self::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Live => "live",
            Self::Manual => "manual",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delay {
    pub value: u64,
    pub unit: DelayUnit,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Minutes,
    Hours,
    #[default]
    Days,
}

impl DelayUnit {
    /// 未知或缺失的单位回退为 `days`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("minutes") => Self::Minutes,
            Some("hours") => Self::Hours,
            _ => Self::Days,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingParam {
    pub param: String,
    pub value: String,
}
