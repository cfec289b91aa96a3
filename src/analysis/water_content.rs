//! Karl-Fischer 적정 입력으로 질량 기준 수분 함량(%)을 계산한다.
//!
//! 정규화 규칙: 체적은 L이면 ×1000(mL), 질량은 g이면 ×1000(mg). 어느 단위 조합이든 mL와 mg
//! 기준으로 맞춰지므로 KF 팩터는 적정액 1 mL당 물 mg으로 간주한다.

use crate::conversion::{parse_mass_unit, parse_number, parse_volume_unit};
use crate::model::WaterAnalysisInputs;
use crate::units::{MassUnit, VolumeUnit};

/// 표시용 소수 자릿수.
pub const PERCENT_DECIMALS: usize = 4;

fn normalized_volume(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::Liter => value * 1000.0,
        VolumeUnit::Milliliter => value,
    }
}

fn normalized_weight(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Gram => value * 1000.0,
        MassUnit::Milligram => value,
    }
}

/// 반올림하지 않은 수분 %를 계산한다. 입력 중 하나라도 NaN 이거나 0 이하이면 `None`.
pub fn water_percent_value(
    volume: f64,
    volume_unit: VolumeUnit,
    kf_factor: f64,
    weight: f64,
    weight_unit: MassUnit,
) -> Option<f64> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(volume) || !positive(kf_factor) || !positive(weight) {
        return None;
    }
    let v = normalized_volume(volume, volume_unit);
    let w = normalized_weight(weight, weight_unit);
    Some(v * kf_factor / w * 100.0)
}

pub fn water_percent_from_inputs(inputs: &WaterAnalysisInputs) -> Option<f64> {
    water_percent_value(
        inputs.water_volume_consumed.value,
        inputs.water_volume_consumed.unit,
        inputs.kf_factor_avg,
        inputs.water_sample_weight.value,
        inputs.water_sample_weight.unit,
    )
}

/// 폼 문자열 입력으로 계산해 표시 문자열을 돌려준다. 계산할 수 없으면 빈 문자열.
pub fn compute_water_percent(
    volume: &str,
    volume_unit: &str,
    kf_factor: &str,
    weight: &str,
    weight_unit: &str,
) -> String {
    let (Ok(vu), Ok(wu)) = (parse_volume_unit(volume_unit), parse_mass_unit(weight_unit)) else {
        return String::new();
    };
    let value = match (parse_number(volume), parse_number(kf_factor), parse_number(weight)) {
        (Some(v), Some(k), Some(w)) => water_percent_value(v, vu, k, w, wu),
        _ => None,
    };
    value.map(format_percent).unwrap_or_default()
}

pub fn format_percent(value: f64) -> String {
    format!("{:.*}", PERCENT_DECIMALS, value)
}
