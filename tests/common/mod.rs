#![allow(dead_code)]

use serde_json::{json, Value};

use klaviyo_flow_builder::{FlowSubmission, FormState, StepForm};

pub fn welcome_payload() -> Value {
    json!({
        "flowName": "Welcome",
        "trigger": { "type": "list", "id": "ABC" },
        "steps": [
            { "subjectLine": "Hi", "fromEmail": "a@b.com", "fromName": "Team" }
        ]
    })
}

pub fn submission(value: Value) -> FlowSubmission {
    serde_json::from_value(value).expect("fixture should be a valid submission")
}

pub fn two_step_payload() -> Value {
    json!({
        "flowName": "  Onboarding  ",
        "trigger": { "type": "segment", "id": " SEG123 " },
        "steps": [
            {
                "internalName": "Welcome email",
                "subjectLine": " Welcome! ",
                "previewText": "Glad you're here",
                "fromEmail": "hello@shop.test",
                "fromName": "Shop",
                "replyToEmail": "",
                "smartSendingEnabled": true,
                "status": "live",
                "delay": null,
                "customTracking": [
                    { "param": "utm_source", "value": "klaviyo" },
                    { "param": "utm_medium", "value": "  " }
                ]
            },
            {
                "subjectLine": "Still there?",
                "fromEmail": "hello@shop.test",
                "fromName": "Shop",
                "templateId": "TPL9",
                "smartSendingEnabled": "yes",
                "status": "paused",
                "delay": { "value": 2, "unit": "weeks", "timezone": "" },
                "customTracking": "none"
            }
        ]
    })
}

pub fn filled_form() -> FormState {
    let mut form = FormState::new();
    form.flow_name = "Welcome".to_string();
    form.trigger_id = "ABC".to_string();
    form.steps[0] = StepForm {
        subject_line: "Hi".to_string(),
        from_email: "a@b.com".to_string(),
        from_name: "Team".to_string(),
        ..StepForm::default()
    };
    form
}
