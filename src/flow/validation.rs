use thiserror::Error;

use super::types::{FlowRequest, TriggerKind};

/// 校验失败只报告第一处违规
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Flow name is required.")]
    MissingFlowName,
    #[error("Trigger type must be either \"list\" or \"segment\".")]
    UnsupportedTriggerType(String),
    #[error("Trigger ID is required.")]
    MissingTriggerId,
    #[error("At least one email step is required.")]
    NoSteps,
    #[error("Step {step}: {field} is required.")]
    MissingStepField { step: usize, field: StepField },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    SubjectLine,
    FromEmail,
    FromName,
}

impl std::fmt::Display for StepField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SubjectLine => "subject line",
            Self::FromEmail => "from email",
            Self::FromName => "from name",
        };
        f.write_str(label)
    }
}

impl ValidationError {
    /// 出错步骤的位置（从 1 开始）
    pub fn step(&self) -> Option<usize> {
        match self {
            Self::MissingStepField { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// 校验规范化后的请求
pub fn validate_flow_request(request: &FlowRequest) -> Result<(), ValidationError> {
    if request.flow_name.is_empty() {
        return Err(ValidationError::MissingFlowName);
    }
    if TriggerKind::parse(&request.trigger.trigger_type).is_none() {
        return Err(ValidationError::UnsupportedTriggerType(
            request.trigger.trigger_type.clone(),
        ));
    }
    if request.trigger.id.is_empty() {
        return Err(ValidationError::MissingTriggerId);
    }
    if request.steps.is_empty() {
        return Err(ValidationError::NoSteps);
    }

    for (index, step) in request.steps.iter().enumerate() {
        let missing = if step.subject_line.is_empty() {
            Some(StepField::SubjectLine)
        } else if step.from_email.is_empty() {
            Some(StepField::FromEmail)
        } else if step.from_name.is_empty() {
            Some(StepField::FromName)
        } else {
            None
        };
        if let Some(field) = missing {
            return Err(ValidationError::MissingStepField {
                step: index + 1,
                field,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_field_messages() {
        let err = ValidationError::MissingStepField {
            step: 2,
            field: StepField::FromEmail,
        };
        assert_eq!(err.to_string(), "Step 2: from email is required.");
        assert_eq!(err.step(), Some(2));
        assert_eq!(ValidationError::NoSteps.step(), None);
    }
}
