use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::pipeline::SessionSettings;

const CONFIG_PATH: &str = "config.toml";

/// 화면 표시용 소수 자릿수. 계산에는 영향을 주지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPrecision {
    pub temperature: usize,
    pub api: usize,
    pub factor: usize,
    pub percent: usize,
    /// 질량 변환 결과
    pub mass: usize,
    /// 체적 변환 결과
    pub volume: usize,
}

impl Default for DisplayPrecision {
    fn default() -> Self {
        Self {
            temperature: 2,
            api: 2,
            factor: 4,
            percent: 4,
            mass: 4,
            volume: 3,
        }
    }
}

/// KF 평균 팩터 조회 옵션.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KfFactorSettings {
    /// 오늘(UTC) 수행된 일일 검증만 사용할지 여부
    pub same_day_only: bool,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `auto`, `ko`, `en`
    pub language: String,
    /// 로그를 JSON 한 줄 형식으로 출력할지 여부
    pub log_json: bool,
    pub display: DisplayPrecision,
    pub kf_factor: KfFactorSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            log_json: false,
            display: DisplayPrecision::default(),
            kf_factor: KfFactorSettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_create(Path::new(CONFIG_PATH))
}

/// 지정 경로에서 설정을 로드한다. 파일이 없으면 기본값을 저장하고 돌려준다.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 결과 입력 세션 옵션을 만든다.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            kf_same_day: self
                .kf_factor
                .same_day_only
                .then(|| Utc::now().date_naive()),
        }
    }
}
