//! 단위 정의 및 변환 모듈 모음. 시료 분석 폼에서 쓰는 온도·질량·체적만 다룬다.

pub mod mass;
pub mod temperature;
pub mod volume;

pub use mass::{convert_mass, to_grams, MassUnit};
pub use temperature::{convert_temperature, TemperatureUnit};
pub use volume::{convert_volume, to_milliliters, VolumeUnit};
