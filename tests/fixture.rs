use lab_sample_engine::analysis::kf_factor::resolve_mean_factor;
use lab_sample_engine::analysis::KfResolution;
use lab_sample_engine::collaborator::{
    ApiCorrectionRequest, ApiCorrectionService, CollaboratorError, EquipmentDirectory,
};
use lab_sample_engine::fixture::{LabFixture, OfflineApiCorrection};
use lab_sample_engine::quantity::Measure;

const DATA: &str = r#"
[[equipment]]
id = 7
name = "KF titrator"
equipment_type_id = 3

[[equipment]]
id = 1
name = "Thermometer"
equipment_type_id = 1
measure_specs = [{ measure = "temperature", min_value = 10.0, max_value = 40.0 }]

[[verification_types]]
equipment_type_id = 3
id = 10
name = "Monthly"
frequency_days = 30

[[verification_types]]
equipment_type_id = 3
id = 11
name = "Daily"
frequency_days = 1

[[verifications]]
equipment_id = 7
id = 1
verification_type_id = 11
verified_at = "2026-10-17T08:00:00Z"
notes = "Factor promedio: 1,2345"

[[verifications]]
equipment_id = 7
id = 2
verification_type_id = 11
verified_at = "2026-10-18T08:00:00Z"
notes = "titulación OK"
mean_factor = 4.9876

[[verifications]]
equipment_id = 7
id = 3
verification_type_id = 10
verified_at = "2026-10-19T08:00:00Z"
notes = "Factor promedio: 9.9999"
"#;

#[test]
fn fixture_serves_directory_lookups() {
    let fixture = LabFixture::from_toml(DATA).expect("fixture parses");
    let thermometer = fixture.equipment(1).expect("thermometer");
    let spec = thermometer.spec_for(Measure::Temperature).expect("spec");
    assert_eq!(spec.max_value, Some(40.0));
    assert_eq!(fixture.verification_types(3).unwrap().len(), 2);
    assert_eq!(fixture.verification_history(7).unwrap().len(), 3);
    assert!(matches!(
        fixture.equipment(99),
        Err(CollaboratorError::NotFound(_))
    ));
}

#[test]
fn fixture_resolves_latest_daily_factor() {
    let fixture = LabFixture::from_toml(DATA).expect("fixture parses");
    assert_eq!(
        resolve_mean_factor(&fixture, 7, None),
        KfResolution::Resolved(4.9876)
    );
}

#[test]
fn offline_correction_is_unavailable() {
    let request = ApiCorrectionRequest {
        avg_temperature_fahrenheit: 80.0,
        raw_api_reading: 35.0,
    };
    assert!(matches!(
        OfflineApiCorrection.correct_to_60f(request),
        Err(CollaboratorError::Unavailable(_))
    ));
}

#[test]
fn malformed_fixture_is_an_error() {
    assert!(LabFixture::from_toml("[[equipment]]\nid = \"seven\"").is_err());
}
