use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::collaborator::CollaboratorError;
use crate::config::{Config, ConfigError};
use crate::conversion::ConversionError;
use crate::fixture::FixtureError;
use crate::i18n::Translator;
use crate::quantity::Measure;
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 데이터 파일 오류
    #[error("데이터 파일 오류: {0}")]
    Fixture(#[from] FixtureError),
    /// 결과 폼 파일 파싱 오류
    #[error("폼 파일 파싱 오류: {0}")]
    Form(#[from] toml::de::Error),
    /// 페이로드 직렬화 오류
    #[error("페이로드 직렬화 오류: {0}")]
    Payload(#[from] toml::ser::Error),
    /// 단위 변환 오류
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] ConversionError),
    /// 협력자 호출 오류
    #[error("협력자 오류: {0}")]
    Collaborator(#[from] CollaboratorError),
    /// 저장 검증 실패 (사용자 메시지 포함)
    #[error("{0}")]
    SaveBlocked(String),
}

/// 변환 가능한 물리량.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuantityArg {
    Temperature,
    Weight,
    Volume,
}

impl From<QuantityArg> for Measure {
    fn from(value: QuantityArg) -> Self {
        match value {
            QuantityArg::Temperature => Measure::Temperature,
            QuantityArg::Weight => Measure::Weight,
            QuantityArg::Volume => Measure::Volume,
        }
    }
}

/// 사양 범위 검사 대상 물리량.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeasureArg {
    Temperature,
    RelativeHumidity,
    Api,
    Weight,
}

impl From<MeasureArg> for Measure {
    fn from(value: MeasureArg) -> Self {
        match value {
            MeasureArg::Temperature => Measure::Temperature,
            MeasureArg::RelativeHumidity => Measure::RelativeHumidity,
            MeasureArg::Api => Measure::Api,
            MeasureArg::Weight => Measure::Weight,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lab_sample_engine_cli")]
#[command(about = "Lab sample calculations: API gravity and Karl-Fischer water content")]
pub struct Cli {
    /// 출력 언어 (auto, ko, en)
    #[arg(long, default_value = "auto")]
    pub lang: String,

    /// 언어팩 디렉터리
    #[arg(long)]
    pub locales: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a temperature, weight or volume value
    Convert {
        #[arg(value_enum)]
        quantity: QuantityArg,
        #[arg(allow_negative_numbers = true)]
        value: String,
        from: String,
        to: String,
    },
    /// Percent water by mass from Karl-Fischer titration inputs
    Water {
        #[arg(long)]
        volume: String,
        #[arg(long, default_value = "mL")]
        volume_unit: String,
        #[arg(long)]
        factor: String,
        #[arg(long)]
        weight: String,
        #[arg(long, default_value = "g")]
        weight_unit: String,
    },
    /// Check observed temperatures and build the API 60°F correction request
    Api {
        #[arg(long, allow_negative_numbers = true)]
        start: String,
        #[arg(long, allow_negative_numbers = true)]
        end: String,
        #[arg(long, default_value = "f")]
        unit: String,
        #[arg(long, allow_negative_numbers = true)]
        reading: String,
    },
    /// Compare lab ambient temperature with the field average
    Drift {
        #[arg(long, allow_negative_numbers = true)]
        start: String,
        #[arg(long, allow_negative_numbers = true)]
        end: String,
        #[arg(long, default_value = "f")]
        unit: String,
        #[arg(long, allow_negative_numbers = true)]
        lab: String,
        #[arg(long, default_value = "f")]
        lab_unit: String,
    },
    /// Check a value against an equipment measure range
    Range {
        #[arg(value_enum)]
        measure: MeasureArg,
        #[arg(allow_negative_numbers = true)]
        value: String,
        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,
    },
    /// Resolve the mean KF factor from daily verification history
    KfFactor {
        #[arg(long)]
        equipment: u64,
        /// TOML data file with equipment, verification types and history
        #[arg(long)]
        data: PathBuf,
    },
    /// Run the results form through all pipelines and the save checks
    Validate {
        /// TOML file with the results form fields
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        data: PathBuf,
        #[arg(long, default_value_t = 0)]
        sample: u64,
    },
}

/// 서브커맨드를 실행한다.
pub fn run(cli: Cli, config: &Config, tr: &Translator) -> Result<(), AppError> {
    match cli.command {
        Command::Convert {
            quantity,
            value,
            from,
            to,
        } => ui_cli::handle_convert(tr, config, quantity.into(), &value, &from, &to),
        Command::Water {
            volume,
            volume_unit,
            factor,
            weight,
            weight_unit,
        } => {
            ui_cli::handle_water(tr, &volume, &volume_unit, &factor, &weight, &weight_unit);
            Ok(())
        }
        Command::Api {
            start,
            end,
            unit,
            reading,
        } => {
            ui_cli::handle_api(tr, config, &start, &end, &unit, &reading);
            Ok(())
        }
        Command::Drift {
            start,
            end,
            unit,
            lab,
            lab_unit,
        } => {
            ui_cli::handle_drift(tr, config, &start, &end, &unit, &lab, &lab_unit);
            Ok(())
        }
        Command::Range {
            measure,
            value,
            min,
            max,
        } => {
            ui_cli::handle_range(tr, measure.into(), &value, min, max);
            Ok(())
        }
        Command::KfFactor { equipment, data } => {
            ui_cli::handle_kf_factor(tr, config, equipment, &data)
        }
        Command::Validate { form, data, sample } => {
            ui_cli::handle_validate(tr, config, sample, &form, &data)
        }
    }
}
