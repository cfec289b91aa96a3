//! 폼 입력(문자열)을 숫자/단위로 해석하고 변환하는 계층.
//!
//! 폼 값은 문자열로 들어오므로 해석 실패는 오류가 아니라 "계산 불가"(`None`)로 다룬다.
//! 호출자는 `None`을 0으로 취급하지 말고 의존 필드를 비워야 한다.

use thiserror::Error;

use crate::quantity::Measure;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
    /// 숫자로 해석할 수 없는 값
    #[error("숫자가 아닌 값: {0}")]
    InvalidNumber(String),
    /// 지원하지 않는 물리량
    #[error("지원하지 않는 물리량: {0:?}")]
    UnsupportedQuantity(Measure),
}

/// 폼 문자열을 유한한 실수로 해석한다. 쉼표 소수점도 허용한다.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 온도 단위 태그를 해석한다. 대소문자를 구분하지 않는다.
pub fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "f" | "fahrenheit" | "°f" => Ok(TemperatureUnit::Fahrenheit),
        "c" | "celsius" | "°c" => Ok(TemperatureUnit::Celsius),
        "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
        "r" | "rankine" | "°r" => Ok(TemperatureUnit::Rankine),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_mass_unit(s: &str) -> Result<MassUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "g" | "gram" => Ok(MassUnit::Gram),
        "mg" | "milligram" => Ok(MassUnit::Milligram),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_volume_unit(s: &str) -> Result<VolumeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "ml" | "milliliter" | "millilitre" => Ok(VolumeUnit::Milliliter),
        "l" | "liter" | "litre" => Ok(VolumeUnit::Liter),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_pair(value: &str, unit: &str) -> Option<(f64, TemperatureUnit)> {
    let v = parse_number(value)?;
    let u = parse_temperature_unit(unit).ok()?;
    Some((v, u))
}

/// 폼 값을 화씨로 변환한다. 값이나 단위를 해석할 수 없으면 `None`.
pub fn to_fahrenheit(value: &str, unit: &str) -> Option<f64> {
    let (v, u) = parse_pair(value, unit)?;
    Some(temperature::to_fahrenheit(v, u))
}

/// 화씨 값을 지정 단위로 변환한다. 값이나 단위를 해석할 수 없으면 `None`.
pub fn from_fahrenheit(value: &str, unit: &str) -> Option<f64> {
    let (v, u) = parse_pair(value, unit)?;
    Some(temperature::from_fahrenheit(v, u))
}

/// 폼 값을 섭씨로 변환한다. 값이나 단위를 해석할 수 없으면 `None`.
pub fn to_celsius(value: &str, unit: &str) -> Option<f64> {
    let (v, u) = parse_pair(value, unit)?;
    Some(temperature::to_celsius(v, u))
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `F`, `C`, `K`, `R`, `g`, `mg`, `mL`, `L` 이다.
pub fn convert(
    measure: Measure,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    match measure {
        Measure::Temperature => {
            let from = parse_temperature_unit(from_unit_str)?;
            let to = parse_temperature_unit(to_unit_str)?;
            Ok(convert_temperature(value, from, to))
        }
        Measure::Weight => {
            let from = parse_mass_unit(from_unit_str)?;
            let to = parse_mass_unit(to_unit_str)?;
            Ok(convert_mass(value, from, to))
        }
        Measure::Volume => {
            let from = parse_volume_unit(from_unit_str)?;
            let to = parse_volume_unit(to_unit_str)?;
            Ok(convert_volume(value, from, to))
        }
        other => Err(ConversionError::UnsupportedQuantity(other)),
    }
}
