// crates/fitruntime/tests/config_test.rs

use fitcore::{FitError, Stage};
use fitruntime::{ControllerConfig, StageSchedule, StageStep, MAX_EVENT_BUFFER};
use std::time::Duration;

#[test]
fn test_default_timing() {
    let config = ControllerConfig::default();
    assert_eq!(config.minimum_duration(), Duration::from_millis(3000));

    let steps = config.schedule.steps();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0], StageStep::new(1000, Stage::ExtractingSkills));
    assert_eq!(steps[1], StageStep::new(2500, Stage::Evaluating));
    assert_eq!(steps[2], StageStep::new(4500, Stage::BuildingScorecards));
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = ControllerConfig::from_json_str(
        r#"{
            "schedule": [
                { "offset_ms": 200, "stage": "ExtractingSkills" },
                { "offset_ms": 300, "stage": "Evaluating" },
                { "offset_ms": 400, "stage": "BuildingScorecards" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(config.schedule.steps().len(), 3);
    assert_eq!(config.minimum_duration_ms, 3000);
    assert_eq!(config.event_buffer_size, 1000);
}

#[test]
fn test_schedule_rejects_out_of_order_offsets() {
    let result = StageSchedule::new(vec![
        StageStep::new(2000, Stage::ExtractingSkills),
        StageStep::new(1000, Stage::Evaluating),
    ]);
    assert!(matches!(result, Err(FitError::Config(_))));
}

#[test]
fn test_schedule_rejects_revisited_stage() {
    let result = StageSchedule::new(vec![
        StageStep::new(1000, Stage::Evaluating),
        StageStep::new(2000, Stage::ExtractingSkills),
    ]);
    assert!(matches!(result, Err(FitError::Config(_))));

    let parsing_again = StageSchedule::new(vec![StageStep::new(1000, Stage::Parsing)]);
    assert!(parsing_again.is_err(), "Parsing is entered at start, never scheduled");
}

#[test]
fn test_invalid_json_schedule_is_rejected() {
    let result = ControllerConfig::from_json_str(
        r#"{ "schedule": [ { "offset_ms": 10, "stage": "Evaluating" }, { "offset_ms": 10, "stage": "BuildingScorecards" } ] }"#,
    );
    assert!(matches!(result, Err(FitError::Config(_))));

    let zero_buffer = ControllerConfig::from_json_str(r#"{ "event_buffer_size": 0 }"#);
    assert!(zero_buffer.is_err());
}

#[test]
fn test_config_round_trips_through_json() {
    let config = ControllerConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_schedule_rejects_skipped_stage() {
    let result = ControllerConfig::from_json_str(
        r#"{ "schedule": [ { "offset_ms": 1000, "stage": "BuildingScorecards" } ] }"#,
    );
    assert!(matches!(result, Err(FitError::Config(_))));

    let missing_middle = StageSchedule::new(vec![
        StageStep::new(1000, Stage::ExtractingSkills),
        StageStep::new(2000, Stage::BuildingScorecards),
    ]);
    assert!(missing_middle.is_err());
}

#[test]
fn test_schedule_must_reach_last_stage() {
    let empty = ControllerConfig::from_json_str(r#"{ "schedule": [] }"#);
    assert!(matches!(empty, Err(FitError::Config(_))));

    let truncated = StageSchedule::new(vec![
        StageStep::new(1000, Stage::ExtractingSkills),
        StageStep::new(2000, Stage::Evaluating),
    ]);
    assert!(truncated.is_err());
}

#[test]
fn test_event_buffer_size_is_bounded() {
    let huge = ControllerConfig::from_json_str(r#"{ "event_buffer_size": 18446744073709551615 }"#);
    assert!(matches!(huge, Err(FitError::Config(_))));

    let just_over = ControllerConfig::from_json_str(&format!(
        r#"{{ "event_buffer_size": {} }}"#,
        MAX_EVENT_BUFFER + 1
    ));
    assert!(just_over.is_err());

    let at_limit = ControllerConfig::from_json_str(&format!(
        r#"{{ "event_buffer_size": {} }}"#,
        MAX_EVENT_BUFFER
    ))
    .unwrap();
    assert_eq!(at_limit.event_buffer_size, MAX_EVENT_BUFFER);
}

#[test]
fn test_unchecked_buffer_size_is_clamped() {
    let config = ControllerConfig {
        event_buffer_size: usize::MAX,
        ..ControllerConfig::default()
    };
    assert_eq!(config.effective_event_buffer(), MAX_EVENT_BUFFER);

    let zero = ControllerConfig {
        event_buffer_size: 0,
        ..ControllerConfig::default()
    };
    assert_eq!(zero.effective_event_buffer(), 1);
}
