use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{EmailStep, FlowRequest, TriggerKind};

pub const SEND_EMAIL_ACTION: &str = "send-email";
pub const TIME_DELAY_ACTION: &str = "time-delay";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Unsupported trigger type `{0}`.")]
    UnsupportedTrigger(String),
    #[error("A flow definition needs at least one email step.")]
    NoActions,
    #[error("Step {step}: tracking parameter `{param}` is defined more than once.")]
    DuplicateTrackingParam { step: usize, param: String },
    #[error("Step {step}: delay value {value} exceeds the supported range.")]
    DelayOutOfRange { step: usize, value: u64 },
}

/// Klaviyo 流程定义
///
/// 触发器列表 + 通过 `links.next` 串联的动作列表，`entry_action_id` 指向第一个动作。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub triggers: Vec<TriggerNode>,
    pub profile_filter: Option<serde_json::Value>,
    pub actions: Vec<FlowAction>,
    pub entry_action_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerNode {
    #[serde(rename = "type")]
    pub trigger_type: TriggerKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAction {
    pub temporary_id: String,
    #[serde(flatten)]
    pub kind: ActionKind,
    pub links: ActionLinks,
}

impl FlowAction {
    pub fn action_type(&self) -> &'static str {
        match self.kind {
            ActionKind::TimeDelay { .. } => TIME_DELAY_ACTION,
            ActionKind::SendEmail { .. } => SEND_EMAIL_ACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ActionKind {
    TimeDelay(TimeDelayData),
    SendEmail(SendEmailData),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLinks {
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDelayData {
    pub unit: String,
    pub value: u32,
    pub secondary_value: Option<u32>,
    pub timezone: String,
    pub delay_until_time: Option<String>,
    pub delay_until_weekdays: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendEmailData {
    pub message: EmailMessage,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub name: String,
    pub from_email: String,
    pub from_label: String,
    pub reply_to_email: Option<String>,
    pub cc_email: Option<String>,
    pub bcc_email: Option<String>,
    pub subject_line: String,
    pub preview_text: Option<String>,
    pub template_id: Option<String>,
    pub smart_sending_enabled: bool,
    pub transactional: bool,
    pub add_tracking_params: bool,
    pub custom_tracking_params: Vec<CustomTrackingParam>,
    pub additional_filters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTrackingParam {
    pub param: String,
    pub value: String,
}

/// 发往 Flows API 的请求体：`{ data: { type: "flow", attributes: { name, definition } } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlowRequest {
    pub data: CreateFlowData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlowData {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub attributes: CreateFlowAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlowAttributes {
    pub name: String,
    pub definition: FlowDefinition,
}

impl CreateFlowRequest {
    pub fn new(name: impl Into<String>, definition: FlowDefinition) -> Self {
        Self {
            data: CreateFlowData {
                resource_type: "flow".to_string(),
                attributes: CreateFlowAttributes {
                    name: name.into(),
                    definition,
                },
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.data.attributes.name
    }

    pub fn definition(&self) -> &FlowDefinition {
        &self.data.attributes.definition
    }
}

/// 将规范化后的请求映射为 Klaviyo 流程定义
///
/// 每个步骤依次产出一个可选的 `time-delay` 动作和一个 `send-email` 动作，
/// 临时 ID 按产出顺序从 "1" 开始编号。
pub fn build_flow_definition(request: &FlowRequest) -> Result<FlowDefinition, BuildError> {
    let trigger_type = TriggerKind::parse(&request.trigger.trigger_type)
        .ok_or_else(|| BuildError::UnsupportedTrigger(request.trigger.trigger_type.clone()))?;
    if request.steps.is_empty() {
        return Err(BuildError::NoActions);
    }

    let mut kinds = Vec::with_capacity(request.steps.len() * 2);
    for (index, step) in request.steps.iter().enumerate() {
        let position = index + 1;
        if let Some(delay) = &step.delay {
            let value = u32::try_from(delay.value).map_err(|_| BuildError::DelayOutOfRange {
                step: position,
                value: delay.value,
            })?;
            kinds.push(ActionKind::TimeDelay(TimeDelayData {
                unit: delay.unit.as_str().to_string(),
                value,
                secondary_value: None,
                timezone: delay.timezone.clone(),
                delay_until_time: None,
                delay_until_weekdays: None,
            }));
        }
        kinds.push(ActionKind::SendEmail(send_email_data(position, step)?));
    }

    let total = kinds.len();
    let actions: Vec<FlowAction> = kinds
        .into_iter()
        .enumerate()
        .map(|(index, kind)| FlowAction {
            temporary_id: (index + 1).to_string(),
            kind,
            links: ActionLinks {
                next: (index + 1 < total).then(|| (index + 2).to_string()),
            },
        })
        .collect();

    Ok(FlowDefinition {
        triggers: vec![TriggerNode {
            trigger_type,
            id: request.trigger.id.clone(),
        }],
        profile_filter: None,
        entry_action_id: actions[0].temporary_id.clone(),
        actions,
    })
}

/// 构建完整的 Flows API 请求体
pub fn build_create_flow_request(request: &FlowRequest) -> Result<CreateFlowRequest, BuildError> {
    let definition = build_flow_definition(request)?;
    Ok(CreateFlowRequest::new(request.flow_name.clone(), definition))
}

fn send_email_data(position: usize, step: &EmailStep) -> Result<SendEmailData, BuildError> {
    let mut seen = HashSet::new();
    for row in &step.custom_tracking {
        if !seen.insert(row.param.as_str()) {
            return Err(BuildError::DuplicateTrackingParam {
                step: position,
                param: row.param.clone(),
            });
        }
    }

    let name = if step.internal_name.is_empty() {
        format!("Email {position}")
    } else {
        step.internal_name.clone()
    };

    Ok(SendEmailData {
        message: EmailMessage {
            name,
            from_email: step.from_email.clone(),
            from_label: step.from_name.clone(),
            reply_to_email: non_blank(&step.reply_to_email),
            cc_email: non_blank(&step.cc_email),
            bcc_email: non_blank(&step.bcc_email),
            subject_line: step.subject_line.clone(),
            preview_text: non_blank(&step.preview_text),
            template_id: non_blank(&step.template_id),
            smart_sending_enabled: step.smart_sending_enabled,
            transactional: false,
            add_tracking_params: !step.custom_tracking.is_empty(),
            custom_tracking_params: step
                .custom_tracking
                .iter()
                .map(|row| CustomTrackingParam {
                    param: row.param.clone(),
                    value: row.value.clone(),
                })
                .collect(),
            additional_filters: None,
        },
        status: step.status.as_str().to_string(),
    })
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
