use serde::{Deserialize, Serialize};

use crate::units::{
    temperature, to_grams, to_milliliters, MassUnit, TemperatureUnit, VolumeUnit,
};

/// 장비 사양이 다루는 물리량 종류를 나타낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Temperature,
    RelativeHumidity,
    Api,
    Weight,
    Volume,
    Pressure,
}

/// 단위가 붙은 온도 측정값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub value: f64,
    pub unit: TemperatureUnit,
}

impl TemperatureReading {
    pub fn new(value: f64, unit: TemperatureUnit) -> Self {
        Self { value, unit }
    }

    pub fn fahrenheit(&self) -> f64 {
        temperature::to_fahrenheit(self.value, self.unit)
    }

    pub fn celsius(&self) -> f64 {
        temperature::to_celsius(self.value, self.unit)
    }
}

/// 단위가 붙은 질량 측정값. 값은 0 이상이어야 한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassReading {
    pub value: f64,
    pub unit: MassUnit,
}

impl MassReading {
    pub fn new(value: f64, unit: MassUnit) -> Self {
        Self { value, unit }
    }

    pub fn grams(&self) -> f64 {
        to_grams(self.value, self.unit)
    }
}

/// 단위가 붙은 체적 측정값. 값은 0 이상이어야 한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeReading {
    pub value: f64,
    pub unit: VolumeUnit,
}

impl VolumeReading {
    pub fn new(value: f64, unit: VolumeUnit) -> Self {
        Self { value, unit }
    }

    pub fn milliliters(&self) -> f64 {
        to_milliliters(self.value, self.unit)
    }
}
