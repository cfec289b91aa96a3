//! 실험실 주변 온도와 현장 관측 평균 온도의 차이 검사.

use crate::conversion;
use crate::quantity::TemperatureReading;

/// 실험실 온도와 현장 평균의 최대 허용 차이(°F).
pub const MAX_LAB_DRIFT_F: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriftCheck {
    /// 값이 모자라거나 해석 불가. 오류를 비운다.
    Incomplete,
    Within { diff_f: f64 },
    Exceeded { diff_f: f64 },
}

impl DriftCheck {
    pub fn is_exceeded(&self) -> bool {
        matches!(self, DriftCheck::Exceeded { .. })
    }
}

/// 폼 문자열 입력으로 검사한다. 실험실 온도는 자체 단위를 가진다.
pub fn check_lab_drift(
    start: &str,
    end: &str,
    unit: &str,
    lab: &str,
    lab_unit: &str,
) -> DriftCheck {
    match (
        conversion::to_fahrenheit(start, unit),
        conversion::to_fahrenheit(end, unit),
        conversion::to_fahrenheit(lab, lab_unit),
    ) {
        (Some(s), Some(e), Some(l)) => classify(s, e, l),
        _ => DriftCheck::Incomplete,
    }
}

pub fn check_lab_drift_readings(
    start: TemperatureReading,
    end: TemperatureReading,
    lab: TemperatureReading,
) -> DriftCheck {
    classify(start.fahrenheit(), end.fahrenheit(), lab.fahrenheit())
}

fn classify(start_f: f64, end_f: f64, lab_f: f64) -> DriftCheck {
    let avg_field_f = (start_f + end_f) / 2.0;
    let diff_f = (lab_f - avg_field_f).abs();
    if diff_f > MAX_LAB_DRIFT_F {
        DriftCheck::Exceeded { diff_f }
    } else {
        DriftCheck::Within { diff_f }
    }
}
