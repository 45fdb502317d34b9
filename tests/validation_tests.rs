mod common;

use serde_json::json;

use klaviyo_flow_builder::flow::StepField;
use klaviyo_flow_builder::{normalize_submission, validate_flow_request, ValidationError};

use common::{submission, welcome_payload};

fn validate(payload: serde_json::Value) -> Result<(), ValidationError> {
    validate_flow_request(&normalize_submission(&submission(payload)))
}

#[test]
fn welcome_scenario_passes() {
    assert_eq!(validate(welcome_payload()), Ok(()));
}

#[test]
fn zero_steps_are_rejected_even_when_everything_else_is_valid() {
    let mut payload = welcome_payload();
    payload["steps"] = json!([]);

    let err = validate(payload).unwrap_err();
    assert_eq!(err, ValidationError::NoSteps);
    assert_eq!(err.to_string(), "At least one email step is required.");

    let mut payload = welcome_payload();
    payload.as_object_mut().unwrap().remove("steps");
    assert_eq!(validate(payload), Err(ValidationError::NoSteps));
}

#[test]
fn whitespace_flow_name_is_missing() {
    let mut payload = welcome_payload();
    payload["flowName"] = json!("   ");
    assert_eq!(validate(payload), Err(ValidationError::MissingFlowName));
}

#[test]
fn trigger_type_is_restricted() {
    let mut payload = welcome_payload();
    payload["trigger"]["type"] = json!("metric");
    let err = validate(payload).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Trigger type must be either \"list\" or \"segment\"."
    );

    let mut payload = welcome_payload();
    payload["trigger"]["type"] = json!(" segment ");
    assert_eq!(validate(payload), Ok(()));
}

#[test]
fn trigger_id_is_required() {
    let mut payload = welcome_payload();
    payload["trigger"]["id"] = json!(" ");
    assert_eq!(validate(payload), Err(ValidationError::MissingTriggerId));
}

#[test]
fn reports_first_invalid_step_by_position() {
    let payload = json!({
        "flowName": "Welcome",
        "trigger": { "type": "list", "id": "ABC" },
        "steps": [
            { "subjectLine": "Hi", "fromEmail": "a@b.com", "fromName": "Team" },
            { "subjectLine": "Again", "fromEmail": "   ", "fromName": "Team" },
            { "subjectLine": "", "fromEmail": "a@b.com", "fromName": "Team" }
        ]
    });

    let err = validate(payload).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingStepField {
            step: 2,
            field: StepField::FromEmail
        }
    );
    assert_eq!(err.step(), Some(2));
    assert_eq!(err.to_string(), "Step 2: from email is required.");
}

#[test]
fn checks_fields_in_order_within_a_step() {
    let mut payload = welcome_payload();
    payload["steps"] = json!([{ "fromName": "" }]);
    assert_eq!(
        validate(payload).unwrap_err().to_string(),
        "Step 1: subject line is required."
    );

    let mut payload = welcome_payload();
    payload["steps"] = json!([{ "subjectLine": "Hi", "fromEmail": "a@b.com" }]);
    assert_eq!(
        validate(payload).unwrap_err().to_string(),
        "Step 1: from name is required."
    );
}

#[test]
fn flow_level_errors_win_over_step_errors() {
    let payload = json!({
        "flowName": "",
        "trigger": { "type": "list", "id": "" },
        "steps": [{}]
    });
    assert_eq!(validate(payload), Err(ValidationError::MissingFlowName));
}
