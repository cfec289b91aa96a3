use serde::{Deserialize, Serialize};

/// 체적 단위. 내부 기준은 mL이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeUnit {
    #[serde(rename = "mL", alias = "ml")]
    Milliliter,
    #[serde(rename = "L", alias = "l")]
    Liter,
}

impl VolumeUnit {
    pub fn tag(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "mL",
            VolumeUnit::Liter => "L",
        }
    }
}

pub fn to_milliliters(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::Milliliter => value,
        VolumeUnit::Liter => value * 1000.0,
    }
}

fn from_milliliters(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::Milliliter => value,
        VolumeUnit::Liter => value / 1000.0,
    }
}

/// 체적을 변환한다.
pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> f64 {
    let ml = to_milliliters(value, from);
    from_milliliters(ml, to)
}
