//! Karl-Fischer 수분 함량 계산.
mod common;

use common::assert_close;
use lab_sample_engine::analysis::water_content::{water_percent_from_inputs, water_percent_value};
use lab_sample_engine::analysis::compute_water_percent;
use lab_sample_engine::model::WaterAnalysisInputs;
use lab_sample_engine::quantity::{MassReading, VolumeReading};
use lab_sample_engine::units::{MassUnit, VolumeUnit};

#[test]
fn reference_case_in_ml_and_grams() {
    assert_eq!(compute_water_percent("10", "mL", "5.0", "2", "g"), "2.5000");
    let v = water_percent_value(10.0, VolumeUnit::Milliliter, 5.0, 2.0, MassUnit::Gram).unwrap();
    assert_close("percent", v, 2.5, 1e-12);
}

#[test]
fn liters_and_milligrams_scale_by_thousand() {
    // 0.01 L → 10, 2000 mg → 2000
    assert_eq!(compute_water_percent("0.01", "L", "5", "2000", "mg"), "2.5000");
}

#[test]
fn zero_or_missing_inputs_return_empty() {
    assert_eq!(compute_water_percent("10", "mL", "5.0", "0", "g"), "");
    assert_eq!(compute_water_percent("0", "mL", "5.0", "2", "g"), "");
    assert_eq!(compute_water_percent("10", "mL", "", "2", "g"), "");
    assert_eq!(compute_water_percent("10", "mL", "-1", "2", "g"), "");
    assert_eq!(compute_water_percent("10", "mL", "abc", "2", "g"), "");
    assert_eq!(compute_water_percent("10", "gal", "5", "2", "g"), "");
}

#[test]
fn typed_inputs_keep_unrounded_value() {
    let inputs = WaterAnalysisInputs {
        water_sample_weight: MassReading::new(3.0, MassUnit::Gram),
        water_volume_consumed: VolumeReading::new(1.0, VolumeUnit::Milliliter),
        kf_factor_avg: 1.0,
    };
    let v = water_percent_from_inputs(&inputs).unwrap();
    assert_close("unrounded", v, 1.0 / 30.0, 1e-12);
}
