mod common;

use serde_json::json;

use klaviyo_flow_builder::{
    normalize_submission, DelayUnit, FlowSubmission, StepStatus, TrackingParam,
};

use common::{submission, two_step_payload};

#[test]
fn trims_strings_and_applies_defaults() {
    let request = normalize_submission(&submission(two_step_payload()));

    assert_eq!(request.flow_name, "Onboarding");
    assert_eq!(request.trigger.trigger_type, "segment");
    assert_eq!(request.trigger.id, "SEG123");
    assert_eq!(request.steps.len(), 2);

    let first = &request.steps[0];
    assert_eq!(first.subject_line, "Welcome!");
    assert_eq!(first.status, StepStatus::Live);
    assert!(first.smart_sending_enabled);
    assert!(first.delay.is_none());
    assert_eq!(
        first.custom_tracking,
        vec![TrackingParam {
            param: "utm_source".to_string(),
            value: "klaviyo".to_string()
        }]
    );

    let second = &request.steps[1];
    assert_eq!(second.status, StepStatus::Draft);
    assert!(second.smart_sending_enabled);
    assert!(second.custom_tracking.is_empty());
    let delay = second.delay.as_ref().expect("delay should survive");
    assert_eq!(delay.value, 2);
    assert_eq!(delay.unit, DelayUnit::Days);
    assert_eq!(delay.timezone, "profile");
}

#[test]
fn normalization_is_idempotent() {
    let once = normalize_submission(&submission(two_step_payload()));
    let reparsed: FlowSubmission = serde_json::from_value(serde_json::to_value(&once).unwrap())
        .expect("normalized output is a valid submission");
    let twice = normalize_submission(&reparsed);

    assert_eq!(once, twice);
}

#[test]
fn non_positive_or_non_numeric_delays_are_absent() {
    for value in [json!(0), json!(-3), json!("abc"), json!(null), json!(true), json!("")] {
        let payload = json!({
            "steps": [{ "delay": { "value": value, "unit": "hours" } }]
        });
        let request = normalize_submission(&submission(payload));
        assert!(
            request.steps[0].delay.is_none(),
            "delay with value {value} should be dropped"
        );
    }
}

#[test]
fn delay_values_round_to_nearest_integer() {
    let payload = json!({
        "steps": [
            { "delay": { "value": 1.5, "unit": "minutes", "timezone": " America/New_York " } },
            { "delay": { "value": "4.2", "unit": "HOURS" } }
        ]
    });
    let request = normalize_submission(&submission(payload));

    let first = request.steps[0].delay.as_ref().unwrap();
    assert_eq!(first.value, 2);
    assert_eq!(first.unit, DelayUnit::Minutes);
    assert_eq!(first.timezone, "America/New_York");

    let second = request.steps[1].delay.as_ref().unwrap();
    assert_eq!(second.value, 4);
    assert_eq!(second.unit, DelayUnit::Hours);
}

#[test]
fn tracking_rows_survive_only_when_both_sides_are_filled() {
    let payload = json!({
        "steps": [{
            "customTracking": [
                { "param": "a", "value": "1" },
                { "param": "", "value": "2" },
                { "param": "c", "value": "" },
                { "param": "  ", "value": "  " },
                { "param": " d ", "value": " 4 " },
                { "value": "5" }
            ]
        }]
    });
    let request = normalize_submission(&submission(payload));
    let params: Vec<_> = request.steps[0]
        .custom_tracking
        .iter()
        .map(|row| (row.param.as_str(), row.value.as_str()))
        .collect();

    assert_eq!(params, vec![("a", "1"), ("d", "4")]);
}

#[test]
fn unknown_status_and_unit_fall_back() {
    let payload = json!({
        "steps": [
            { "status": "archived", "delay": { "value": 1, "unit": "fortnights" } },
            { "status": " Manual " },
            {}
        ]
    });
    let request = normalize_submission(&submission(payload));

    assert_eq!(request.steps[0].status, StepStatus::Draft);
    assert_eq!(request.steps[0].delay.as_ref().unwrap().unit, DelayUnit::Days);
    assert_eq!(request.steps[1].status, StepStatus::Manual);
    assert_eq!(request.steps[2].status, StepStatus::Draft);
    assert!(!request.steps[2].smart_sending_enabled);
}

#[test]
fn non_string_status_and_unit_fall_back() {
    let payload = json!({
        "steps": [
            { "status": 1, "delay": { "value": 2, "unit": 7, "timezone": 5 } },
            { "status": ["live"], "delay": false },
            { "delay": "3 days" }
        ]
    });
    let request = normalize_submission(&submission(payload));

    assert_eq!(request.steps[0].status, StepStatus::Draft);
    let delay = request.steps[0].delay.as_ref().expect("object delay is kept");
    assert_eq!(delay.value, 2);
    assert_eq!(delay.unit, DelayUnit::Days);
    assert_eq!(delay.timezone, "profile");

    assert_eq!(request.steps[1].status, StepStatus::Draft);
    assert!(request.steps[1].delay.is_none());
    assert!(request.steps[2].delay.is_none());
}

#[test]
fn missing_sections_normalize_to_empty_values() {
    let request = normalize_submission(&FlowSubmission::default());

    assert!(request.flow_name.is_empty());
    assert!(request.trigger.trigger_type.is_empty());
    assert!(request.trigger.id.is_empty());
    assert!(request.steps.is_empty());
}
