use serde::{Deserialize, Serialize};

/// 온도 단위를 정의한다. 폼에서는 `f`/`c`/`k`/`r` 태그로 주고받는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "f", alias = "F")]
    Fahrenheit,
    #[serde(rename = "c", alias = "C")]
    Celsius,
    #[serde(rename = "k", alias = "K")]
    Kelvin,
    #[serde(rename = "r", alias = "R")]
    Rankine,
}

impl TemperatureUnit {
    /// 폼/서버에 기록되는 단위 태그.
    pub fn tag(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "f",
            TemperatureUnit::Celsius => "c",
            TemperatureUnit::Kelvin => "k",
            TemperatureUnit::Rankine => "r",
        }
    }
}

/// 주어진 값을 화씨로 변환한다. 내부 기준은 화씨이다.
pub fn to_fahrenheit(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Fahrenheit => value,
        TemperatureUnit::Celsius => value * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Kelvin => (value - 273.15) * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Rankine => value - 459.67,
    }
}

/// 화씨 값을 원하는 단위로 변환한다.
pub fn from_fahrenheit(value_f: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Fahrenheit => value_f,
        TemperatureUnit::Celsius => (value_f - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Kelvin => (value_f - 32.0) * 5.0 / 9.0 + 273.15,
        TemperatureUnit::Rankine => value_f + 459.67,
    }
}

/// 주어진 값을 섭씨로 변환한다. 장비 사양의 온도 범위는 섭씨로 저장된다.
pub fn to_celsius(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Kelvin => value - 273.15,
        other => from_fahrenheit(to_fahrenheit(value, other), TemperatureUnit::Celsius),
    }
}

/// 온도를 서로 다른 단위로 변환한다.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    let f = to_fahrenheit(value, from);
    from_fahrenheit(f, to)
}
