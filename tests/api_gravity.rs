//! API 60°F 게이트와 실험실 온도 편차 검사.
mod common;

use common::assert_close;
use lab_sample_engine::analysis::api_gravity::evaluate_api_inputs;
use lab_sample_engine::analysis::temperature_drift::check_lab_drift_readings;
use lab_sample_engine::analysis::{check_lab_drift, evaluate_api_gate, ApiGate, DriftCheck};
use lab_sample_engine::model::ApiAnalysisInputs;
use lab_sample_engine::quantity::TemperatureReading;
use lab_sample_engine::units::TemperatureUnit;

#[test]
fn spread_above_half_degree_blocks_request() {
    match evaluate_api_gate("100.0", "100.6", "f", "35.2") {
        ApiGate::SpreadExceeded { diff_f } => assert_close("diff", diff_f, 0.6, 1e-9),
        other => panic!("expected spread error, got {other:?}"),
    }
}

#[test]
fn spread_within_tolerance_builds_averaged_request() {
    match evaluate_api_gate("100.0", "100.4", "f", "35.2") {
        ApiGate::Ready(req) => {
            assert_close("avg", req.avg_temperature_fahrenheit, 100.2, 1e-9);
            assert_close("reading", req.raw_api_reading, 35.2, 1e-12);
        }
        other => panic!("expected request, got {other:?}"),
    }
}

#[test]
fn spread_is_measured_in_fahrenheit() {
    // 0.3 °C = 0.54 °F > 0.5 °F
    assert!(matches!(
        evaluate_api_gate("20.0", "20.3", "c", "30"),
        ApiGate::SpreadExceeded { .. }
    ));
    // 0.25 °C = 0.45 °F
    match evaluate_api_gate("20.0", "20.25", "C", "30") {
        ApiGate::Ready(req) => assert_close("avg", req.avg_temperature_fahrenheit, 68.225, 1e-9),
        other => panic!("expected request, got {other:?}"),
    }
}

#[test]
fn incomplete_inputs_clear_without_error() {
    assert_eq!(evaluate_api_gate("", "100", "f", "35"), ApiGate::Incomplete);
    assert_eq!(evaluate_api_gate("100", "x", "f", "35"), ApiGate::Incomplete);
    assert_eq!(evaluate_api_gate("100", "100", "bogus", "35"), ApiGate::Incomplete);
    assert_eq!(evaluate_api_gate("100", "100.2", "f", ""), ApiGate::Incomplete);
    assert_eq!(evaluate_api_gate("100", "100.2", "f", "0"), ApiGate::Incomplete);
    assert_eq!(evaluate_api_gate("100", "100.2", "f", "-3"), ApiGate::Incomplete);
}

#[test]
fn spread_error_takes_precedence_over_missing_reading() {
    assert!(matches!(
        evaluate_api_gate("100.0", "101.0", "f", ""),
        ApiGate::SpreadExceeded { .. }
    ));
}

#[test]
fn typed_inputs_follow_the_same_gate() {
    let inputs = ApiAnalysisInputs {
        temp_obs_start: TemperatureReading::new(100.0, TemperatureUnit::Fahrenheit),
        temp_obs_end: TemperatureReading::new(100.4, TemperatureUnit::Fahrenheit),
        lectura_api: 35.2,
    };
    assert!(matches!(evaluate_api_inputs(&inputs), ApiGate::Ready(_)));
}

#[test]
fn lab_drift_above_five_degrees_is_flagged() {
    match check_lab_drift("100", "100", "f", "106", "f") {
        DriftCheck::Exceeded { diff_f } => assert_close("diff", diff_f, 6.0, 1e-9),
        other => panic!("expected drift error, got {other:?}"),
    }
    match check_lab_drift("100", "100", "f", "104", "f") {
        DriftCheck::Within { diff_f } => assert_close("diff", diff_f, 4.0, 1e-9),
        other => panic!("expected within, got {other:?}"),
    }
}

#[test]
fn lab_drift_uses_its_own_unit() {
    // 40 °C = 104 °F
    assert!(!check_lab_drift("100", "100", "f", "40", "c").is_exceeded());
    // 42 °C = 107.6 °F
    assert!(check_lab_drift("100", "100", "f", "42", "c").is_exceeded());
    let start = TemperatureReading::new(37.0, TemperatureUnit::Celsius);
    let lab = TemperatureReading::new(310.15, TemperatureUnit::Kelvin);
    assert!(!check_lab_drift_readings(start, start, lab).is_exceeded());
}

#[test]
fn lab_drift_incomplete_when_any_value_missing() {
    assert_eq!(check_lab_drift("100", "100", "f", "", "f"), DriftCheck::Incomplete);
    assert_eq!(check_lab_drift("", "100", "f", "100", "f"), DriftCheck::Incomplete);
    assert_eq!(check_lab_drift("100", "100", "f", "100", "?"), DriftCheck::Incomplete);
}
