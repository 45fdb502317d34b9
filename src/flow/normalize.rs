use serde_json::Value;

use super::types::{
    Delay, DelaySubmission, DelayUnit, EmailStep, FlowRequest, FlowSubmission, StepStatus,
    StepSubmission, TrackingParam, Trigger, DEFAULT_TIMEZONE,
};

/// 规范化客户端载荷
///
/// 纯函数且幂等：对已经规范化的载荷再次规范化得到相同结果。
pub fn normalize_submission(submission: &FlowSubmission) -> FlowRequest {
    let trigger = submission.trigger.as_ref();
    FlowRequest {
        flow_name: trimmed(submission.flow_name.as_deref()),
        trigger: Trigger {
            trigger_type: trimmed(trigger.and_then(|t| t.trigger_type.as_deref())),
            id: trimmed(trigger.and_then(|t| t.id.as_deref())),
        },
        steps: submission
            .steps
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(normalize_step)
            .collect(),
    }
}

pub fn normalize_step(step: &StepSubmission) -> EmailStep {
    EmailStep {
        internal_name: trimmed(step.internal_name.as_deref()),
        subject_line: trimmed(step.subject_line.as_deref()),
        preview_text: trimmed(step.preview_text.as_deref()),
        from_email: trimmed(step.from_email.as_deref()),
        from_name: trimmed(step.from_name.as_deref()),
        reply_to_email: trimmed(step.reply_to_email.as_deref()),
        cc_email: trimmed(step.cc_email.as_deref()),
        bcc_email: trimmed(step.bcc_email.as_deref()),
        template_id: trimmed(step.template_id.as_deref()),
        smart_sending_enabled: is_truthy(&step.smart_sending_enabled),
        status: StepStatus::parse_lenient(step.status.as_str()),
        delay: DelaySubmission::from_value(&step.delay)
            .as_ref()
            .and_then(normalize_delay),
        custom_tracking: normalize_tracking(&step.custom_tracking),
    }
}

/// 只有数值大于零的延迟才会保留，四舍五入后为零的同样丢弃
pub fn normalize_delay(delay: &DelaySubmission) -> Option<Delay> {
    let value = numeric_value(&delay.value)?;
    if value <= 0.0 {
        return None;
    }
    let rounded = value.round();
    if rounded < 1.0 {
        return None;
    }

    let timezone = trimmed(delay.timezone.as_str());
    Some(Delay {
        // `as` saturates for values beyond u64::MAX
        value: rounded as u64,
        unit: DelayUnit::parse_lenient(delay.unit.as_str()),
        timezone: if timezone.is_empty() {
            DEFAULT_TIMEZONE.to_string()
        } else {
            timezone
        },
    })
}

/// 仅保留 param 与 value 裁剪后都非空的行；非数组输入得到空序列
pub fn normalize_tracking(value: &Value) -> Vec<TrackingParam> {
    let Some(rows) = value.as_array() else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let param = row.get("param").and_then(Value::as_str).unwrap_or("").trim();
            let value = row.get("value").and_then(Value::as_str).unwrap_or("").trim();
            if param.is_empty() || value.is_empty() {
                None
            } else {
                Some(TrackingParam {
                    param: param.to_string(),
                    value: value.to_string(),
                })
            }
        })
        .collect()
}

/// 布尔强制转换：null、false、0、非有限数值与空字符串为假，其余为真
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .map(|n| n != 0.0 && n.is_finite())
            .unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_form_semantics() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn delay_accepts_numeric_strings() {
        let delay = DelaySubmission {
            value: json!(" 2.6 "),
            unit: json!("Hours"),
            timezone: json!("  "),
        };
        let normalized = normalize_delay(&delay).unwrap();
        assert_eq!(normalized.value, 3);
        assert_eq!(normalized.unit, DelayUnit::Hours);
        assert_eq!(normalized.timezone, "profile");
    }

    #[test]
    fn delay_rounding_to_zero_is_dropped() {
        let delay = DelaySubmission {
            value: json!(0.4),
            unit: Value::Null,
            timezone: Value::Null,
        };
        assert!(normalize_delay(&delay).is_none());
    }

    #[test]
    fn non_string_unit_falls_back_to_days() {
        let delay = DelaySubmission {
            value: json!(2),
            unit: json!(7),
            timezone: json!(false),
        };
        let normalized = normalize_delay(&delay).unwrap();
        assert_eq!(normalized.unit, DelayUnit::Days);
        assert_eq!(normalized.timezone, "profile");
    }

    #[test]
    fn non_object_delay_is_absent() {
        assert!(DelaySubmission::from_value(&json!(false)).is_none());
        assert!(DelaySubmission::from_value(&json!(3)).is_none());
        assert!(DelaySubmission::from_value(&Value::Null).is_none());
        assert!(DelaySubmission::from_value(&json!({ "value": 1 })).is_some());
    }

    #[test]
    fn tracking_rows_must_be_objects() {
        let rows = normalize_tracking(&json!([
            "utm_source",
            { "param": "utm_source", "value": "klaviyo" },
            { "param": 3, "value": "x" }
        ]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].param, "utm_source");
    }
}
