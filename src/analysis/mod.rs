//! 시료 결과 폼의 파생값 계산기와 교차 검증 규칙 모음.

pub mod api_gravity;
pub mod kf_factor;
pub mod spec_range;
pub mod temperature_drift;
pub mod water_content;

pub use api_gravity::{evaluate_api_gate, ApiGate, MAX_TEMPERATURE_SPREAD_F};
pub use kf_factor::{KfNotFound, KfResolution};
pub use spec_range::{is_outside_spec_range, validate_for_save, SaveBlocked};
pub use temperature_drift::{check_lab_drift, DriftCheck, MAX_LAB_DRIFT_F};
pub use water_content::compute_water_percent;

use thiserror::Error;

/// 필드 단위로 표시되는 검증/협력자 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// 시작/종료 관측 온도 차가 허용치를 넘음
    #[error("temperature difference {diff_f:.2} °F exceeds 0.5 °F")]
    TemperatureSpread { diff_f: f64 },
    /// 실험실 온도가 현장 평균과 허용치 이상 차이남
    #[error("lab temperature differs {diff_f:.2} °F from field average")]
    LabTemperatureDrift { diff_f: f64 },
    /// ASTM 보정 서비스 실패 상세
    #[error("{0}")]
    ApiCorrectionFailed(String),
}
