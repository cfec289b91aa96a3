use serde::{Deserialize, Serialize};

/// 질량 단위. 내부 기준은 g이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MassUnit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "mg")]
    Milligram,
}

impl MassUnit {
    pub fn tag(self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Milligram => "mg",
        }
    }
}

/// 질량을 g으로 환산한다. 저울 사양 비교에 사용한다.
pub fn to_grams(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Gram => value,
        MassUnit::Milligram => value / 1000.0,
    }
}

fn from_grams(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Gram => value,
        MassUnit::Milligram => value * 1000.0,
    }
}

/// 질량을 변환한다.
pub fn convert_mass(value: f64, from: MassUnit, to: MassUnit) -> f64 {
    let base = to_grams(value, from);
    from_grams(base, to)
}
