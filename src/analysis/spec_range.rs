//! 장비 측정 범위 준수 검사와 저장 전 검증 게이트.

use thiserror::Error;

use crate::model::{Equipment, EquipmentMeasureSpec};
use crate::quantity::{MassReading, Measure, TemperatureReading};

/// 값이 사양 범위를 벗어났는지 판단한다.
///
/// 값이 없거나 NaN 이면, 또는 사양이 정의되지 않았으면 제약이 없으므로 `false`.
pub fn is_outside_spec_range(value: Option<f64>, spec: Option<&EquipmentMeasureSpec>) -> bool {
    let (Some(v), Some(spec)) = (value, spec) else {
        return false;
    };
    if v.is_nan() {
        return false;
    }
    spec.min_value.is_some_and(|min| v < min) || spec.max_value.is_some_and(|max| v > max)
}

/// 저장을 막는 첫 번째 위반 사유.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveBlocked {
    #[error("observed temperatures differ by more than 0.5 °F")]
    TemperatureSpread,
    #[error("lab temperature must be within 5 °F of field average")]
    LabTemperatureDrift,
    #[error("observed temperature {value_c:.2} °C is outside the thermometer range")]
    ObservedTemperatureOutOfRange { value_c: f64 },
    #[error("API reading {value:.2} is outside the hydrometer range")]
    ApiReadingOutOfRange { value: f64 },
    #[error("relative humidity {value:.1} % is outside the thermohygrometer range")]
    RelativeHumidityOutOfRange { value: f64 },
    #[error("lab temperature {value_c:.2} °C is outside the thermohygrometer range")]
    LabTemperatureOutOfRange { value_c: f64 },
    #[error("sample weight {value_g:.4} g is outside the balance range")]
    SampleWeightOutOfRange { value_g: f64 },
}

/// 저장 시점에 선택되어 있는 장비들.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedEquipment<'a> {
    pub thermometer: Option<&'a Equipment>,
    pub hydrometer: Option<&'a Equipment>,
    pub thermohygrometer: Option<&'a Equipment>,
    pub balance: Option<&'a Equipment>,
}

/// 저장 검증 대상 값. 해석되지 않은 필드는 `None`이며 범위 검사를 통과한다.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveCandidate {
    pub temp_obs_start: Option<TemperatureReading>,
    pub temp_obs_end: Option<TemperatureReading>,
    pub lectura_api: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub lab_temperature: Option<TemperatureReading>,
    pub water_sample_weight: Option<MassReading>,
    /// 반응형으로 계산된 온도차 오류가 남아 있는지
    pub temperature_spread_pending: bool,
    /// 반응형으로 계산된 실험실 온도 편차 오류가 남아 있는지
    pub lab_drift_pending: bool,
}

fn spec<'a>(equipment: Option<&'a Equipment>, measure: Measure) -> Option<&'a EquipmentMeasureSpec> {
    equipment.and_then(|e| e.spec_for(measure))
}

/// 저장 전 검사를 순서대로 수행하고 첫 위반에서 중단한다.
pub fn validate_for_save(
    candidate: &SaveCandidate,
    equipment: &SelectedEquipment<'_>,
) -> Result<(), SaveBlocked> {
    if candidate.temperature_spread_pending {
        return Err(SaveBlocked::TemperatureSpread);
    }
    if candidate.lab_drift_pending {
        return Err(SaveBlocked::LabTemperatureDrift);
    }

    let thermometer = spec(equipment.thermometer, Measure::Temperature);
    for reading in [candidate.temp_obs_start, candidate.temp_obs_end]
        .into_iter()
        .flatten()
    {
        let value_c = reading.celsius();
        if is_outside_spec_range(Some(value_c), thermometer) {
            return Err(SaveBlocked::ObservedTemperatureOutOfRange { value_c });
        }
    }

    if let Some(value) = candidate.lectura_api {
        if is_outside_spec_range(Some(value), spec(equipment.hydrometer, Measure::Api)) {
            return Err(SaveBlocked::ApiReadingOutOfRange { value });
        }
    }

    if let Some(value) = candidate.relative_humidity {
        let rh = spec(equipment.thermohygrometer, Measure::RelativeHumidity);
        if is_outside_spec_range(Some(value), rh) {
            return Err(SaveBlocked::RelativeHumidityOutOfRange { value });
        }
    }

    if let Some(lab) = candidate.lab_temperature {
        let value_c = lab.celsius();
        let t = spec(equipment.thermohygrometer, Measure::Temperature);
        if is_outside_spec_range(Some(value_c), t) {
            return Err(SaveBlocked::LabTemperatureOutOfRange { value_c });
        }
    }

    if let Some(weight) = candidate.water_sample_weight {
        let value_g = weight.grams();
        if is_outside_spec_range(Some(value_g), spec(equipment.balance, Measure::Weight)) {
            return Err(SaveBlocked::SampleWeightOutOfRange { value_g });
        }
    }

    Ok(())
}
