//! 시료 분석 계산에 필요한 도메인 엔티티.
//!
//! 모든 엔티티는 요청/응답 페이로드에서 한 번 읽히고 버려진다. 이 크레이트는 어떤 것도 저장하지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quantity::{Measure, MassReading, TemperatureReading, VolumeReading};

pub type EquipmentId = u64;
pub type EquipmentTypeId = u64;
pub type VerificationTypeId = u64;
pub type SampleId = u64;

/// 장비 한 대가 측정하는 물리량 하나의 유효 운전 범위.
///
/// 온도 사양은 섭씨, 질량 사양은 g 기준으로 저장된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentMeasureSpec {
    pub measure: Measure,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

/// 장비 디렉터리에서 조회되는 장비.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    #[serde(default)]
    pub name: String,
    pub equipment_type_id: EquipmentTypeId,
    #[serde(default)]
    pub measure_specs: Vec<EquipmentMeasureSpec>,
}

impl Equipment {
    /// 주어진 물리량의 사양을 찾는다. 없으면 제약이 없는 것으로 본다.
    pub fn spec_for(&self, measure: Measure) -> Option<&EquipmentMeasureSpec> {
        self.measure_specs.iter().find(|s| s.measure == measure)
    }
}

/// 장비 유형별 검증 종류 정의. `frequency_days == 1` 이면 일일 검증이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTypeDefinition {
    pub id: VerificationTypeId,
    #[serde(default)]
    pub name: String,
    pub frequency_days: u32,
}

impl VerificationTypeDefinition {
    pub fn is_daily(&self) -> bool {
        self.frequency_days == 1
    }
}

/// 장비 검증 이력 한 건.
///
/// 평균 KF 팩터는 원래 `notes` 자유 텍스트에 `Factor promedio: <숫자>` 형태로만 기록되었다.
/// `mean_factor`는 구조화 필드로 옮겨가기 위한 자리이며, 비어 있으면 notes 파싱으로 폴백한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: u64,
    pub verification_type_id: VerificationTypeId,
    pub verified_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub mean_factor: Option<f64>,
}

/// API 비중 분석 입력. 시작/종료 관측 온도는 허용 오차 안에서 일치해야 한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiAnalysisInputs {
    pub temp_obs_start: TemperatureReading,
    pub temp_obs_end: TemperatureReading,
    pub lectura_api: f64,
}

/// Karl-Fischer 적정 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterAnalysisInputs {
    pub water_sample_weight: MassReading,
    pub water_volume_consumed: VolumeReading,
    pub kf_factor_avg: f64,
}

/// 저장 시 서버로 보내는 원시값 + 파생값. 수치는 반올림하지 않은 값이다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleResultsPayload {
    pub temp_obs_start: Option<f64>,
    pub temp_obs_end: Option<f64>,
    pub temp_unit: Option<String>,
    pub lectura_api: Option<f64>,
    pub api_60f: Option<f64>,
    pub lab_temperature: Option<f64>,
    pub lab_temperature_unit: Option<String>,
    pub relative_humidity: Option<f64>,
    pub water_sample_weight: Option<f64>,
    pub water_sample_weight_unit: Option<String>,
    pub water_volume_consumed: Option<f64>,
    pub water_volume_unit: Option<String>,
    pub kf_factor_avg: Option<f64>,
    pub percent_water: Option<f64>,
    pub thermometer_id: Option<EquipmentId>,
    pub hydrometer_id: Option<EquipmentId>,
    pub thermohygrometer_id: Option<EquipmentId>,
    pub balance_id: Option<EquipmentId>,
    pub kf_equipment_id: Option<EquipmentId>,
}
