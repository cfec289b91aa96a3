//! 관측 API 값을 60°F 기준으로 보정하기 위한 입력 게이트.
//!
//! 보정표 조회 자체는 외부 ASTM 보정 서비스가 맡는다. 여기서는 두 관측 온도의 일치 여부를
//! 검사하고 평균 화씨 온도를 담은 요청을 만든다.

use crate::collaborator::ApiCorrectionRequest;
use crate::conversion::{self, parse_number};
use crate::model::ApiAnalysisInputs;

/// 시작/종료 관측 온도의 최대 허용 차이(°F).
pub const MAX_TEMPERATURE_SPREAD_F: f64 = 0.5;

/// 게이트 평가 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApiGate {
    /// 입력 미완성. 결과와 오류를 모두 비운다.
    Incomplete,
    /// 온도 차 초과. 보정 요청을 보내지 않는다.
    SpreadExceeded { diff_f: f64 },
    /// 보정 서비스에 보낼 요청
    Ready(ApiCorrectionRequest),
}

/// 폼 문자열 입력으로 게이트를 평가한다. 두 관측 온도는 같은 단위(`unit`)를 쓴다.
pub fn evaluate_api_gate(start: &str, end: &str, unit: &str, lectura_api: &str) -> ApiGate {
    let (Some(start_f), Some(end_f)) = (
        conversion::to_fahrenheit(start, unit),
        conversion::to_fahrenheit(end, unit),
    ) else {
        return ApiGate::Incomplete;
    };
    gate(start_f, end_f, parse_number(lectura_api))
}

/// 타입이 지정된 입력으로 게이트를 평가한다.
pub fn evaluate_api_inputs(inputs: &ApiAnalysisInputs) -> ApiGate {
    let start_f = inputs.temp_obs_start.fahrenheit();
    let end_f = inputs.temp_obs_end.fahrenheit();
    if !start_f.is_finite() || !end_f.is_finite() {
        return ApiGate::Incomplete;
    }
    gate(start_f, end_f, Some(inputs.lectura_api))
}

fn gate(start_f: f64, end_f: f64, reading: Option<f64>) -> ApiGate {
    let diff_f = (start_f - end_f).abs();
    if diff_f > MAX_TEMPERATURE_SPREAD_F {
        return ApiGate::SpreadExceeded { diff_f };
    }
    match reading {
        Some(r) if r.is_finite() && r > 0.0 => ApiGate::Ready(ApiCorrectionRequest {
            avg_temperature_fahrenheit: (start_f + end_f) / 2.0,
            raw_api_reading: r,
        }),
        _ => ApiGate::Incomplete,
    }
}
