use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::Result;
use crate::flow::{DelayUnit, StepStatus, TriggerKind, DEFAULT_TIMEZONE};

/// 本地预校验失败，只报告第一处
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Flow name is required.")]
    MissingFlowName,
    #[error("Trigger ID is required.")]
    MissingTriggerId,
    #[error("At least one email step is required.")]
    NoSteps,
    #[error("Step {step}: subject line, from email and from name are required.")]
    IncompleteStep { step: usize },
}

/// 表单的可编辑状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub flow_name: String,
    pub trigger_type: TriggerKind,
    pub trigger_id: String,
    pub steps: Vec<StepForm>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            flow_name: String::new(),
            trigger_type: TriggerKind::List,
            trigger_id: String::new(),
            steps: vec![StepForm::default()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepForm {
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
    pub delay_enabled: bool,
    pub delay: DelayForm,
    pub tracking_enabled: bool,
    pub tracking: Vec<TrackingRow>,
}

impl Default for StepForm {
    fn default() -> Self {
        Self {
            internal_name: String::new(),
            subject_line: String::new(),
            preview_text: String::new(),
            from_email: String::new(),
            from_name: String::new(),
            reply_to_email: String::new(),
            cc_email: String::new(),
            bcc_email: String::new(),
            template_id: String::new(),
            smart_sending_enabled: true,
            status: StepStatus::Draft,
            delay_enabled: false,
            delay: DelayForm::default(),
            tracking_enabled: false,
            tracking: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayForm {
    pub value: f64,
    pub unit: DelayUnit,
    pub timezone: String,
}

impl Default for DelayForm {
    fn default() -> Self {
        Self {
            value: 1.0,
            unit: DelayUnit::Days,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingRow {
    pub param: String,
    pub value: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件读取表单，缺失字段取默认值；空的步骤列表会被拒绝
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let form: Self = serde_json::from_str(&raw)?;
        if form.steps.is_empty() {
            return Err(FormError::NoSteps.into());
        }
        Ok(form)
    }

    pub fn add_step(&mut self) {
        self.steps.push(StepForm::default());
    }

    /// 至少保留一个步骤；越界或只剩一个步骤时不做任何事
    pub fn remove_step(&mut self, index: usize) -> bool {
        if self.steps.len() <= 1 || index >= self.steps.len() {
            return false;
        }
        self.steps.remove(index);
        true
    }

    pub fn add_tracking_row(&mut self, step: usize) {
        if let Some(step) = self.steps.get_mut(step) {
            step.tracking.push(TrackingRow::default());
        }
    }

    pub fn remove_tracking_row(&mut self, step: usize, row: usize) -> bool {
        match self.steps.get_mut(step) {
            Some(step) if row < step.tracking.len() => {
                step.tracking.remove(row);
                true
            }
            _ => false,
        }
    }

    /// 关闭延迟时保留已填写的值，提交时才丢弃
    pub fn toggle_delay(&mut self, step: usize) {
        if let Some(step) = self.steps.get_mut(step) {
            step.delay_enabled = !step.delay_enabled;
        }
    }

    /// 关闭追踪会清空所有行，开启时补一行空白
    pub fn toggle_tracking(&mut self, step: usize) {
        if let Some(step) = self.steps.get_mut(step) {
            step.tracking_enabled = !step.tracking_enabled;
            if step.tracking_enabled {
                if step.tracking.is_empty() {
                    step.tracking.push(TrackingRow::default());
                }
            } else {
                step.tracking.clear();
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), FormError> {
        if self.flow_name.trim().is_empty() {
            return Err(FormError::MissingFlowName);
        }
        if self.trigger_id.trim().is_empty() {
            return Err(FormError::MissingTriggerId);
        }
        if self.steps.is_empty() {
            return Err(FormError::NoSteps);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if step.subject_line.trim().is_empty()
                || step.from_email.trim().is_empty()
                || step.from_name.trim().is_empty()
            {
                return Err(FormError::IncompleteStep { step: index + 1 });
            }
        }
        Ok(())
    }

    /// 序列化为服务端接受的载荷
    pub fn to_submission(&self) -> Value {
        json!({
            "flowName": self.flow_name.trim(),
            "trigger": {
                "type": self.trigger_type.as_str(),
                "id": self.trigger_id.trim(),
            },
            "steps": self.steps.iter().map(StepForm::to_submission).collect::<Vec<_>>(),
        })
    }
}

impl StepForm {
    fn to_submission(&self) -> Value {
        let reply_to = if self.reply_to_email.trim().is_empty() {
            self.from_email.trim()
        } else {
            self.reply_to_email.trim()
        };

        let delay = if self.delay_enabled {
            json!({
                "value": self.delay.value,
                "unit": self.delay.unit.as_str(),
                "timezone": self.delay.timezone.trim(),
            })
        } else {
            Value::Null
        };

        let tracking: Vec<Value> = if self.tracking_enabled {
            self.tracking
                .iter()
                .map(|row| json!({ "param": row.param.trim(), "value": row.value.trim() }))
                .collect()
        } else {
            Vec::new()
        };

        json!({
            "internalName": self.internal_name.trim(),
            "subjectLine": self.subject_line.trim(),
            "previewText": self.preview_text.trim(),
            "fromEmail": self.from_email.trim(),
            "fromName": self.from_name.trim(),
            "replyToEmail": reply_to,
            "ccEmail": self.cc_email.trim(),
            "bccEmail": self.bcc_email.trim(),
            "templateId": self.template_id.trim(),
            "smartSendingEnabled": self.smart_sending_enabled,
            "status": self.status.as_str(),
            "delay": delay,
            "customTracking": tracking,
        })
    }
}
