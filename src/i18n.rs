use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::analysis::{FieldError, KfNotFound, KfResolution, SaveBlocked};
use crate::collaborator::CollaboratorError;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";

    pub const FIELD_TEMPERATURE_SPREAD: &str = "field.temperature_spread";
    pub const FIELD_LAB_DRIFT: &str = "field.lab_drift";
    pub const FIELD_API_CORRECTION_FAILED: &str = "field.api_correction_failed";

    pub const SAVE_TEMPERATURE_SPREAD: &str = "save.temperature_spread";
    pub const SAVE_LAB_DRIFT: &str = "save.lab_drift";
    pub const SAVE_OBSERVED_TEMPERATURE_RANGE: &str = "save.observed_temperature_range";
    pub const SAVE_API_RANGE: &str = "save.api_range";
    pub const SAVE_HUMIDITY_RANGE: &str = "save.humidity_range";
    pub const SAVE_LAB_TEMPERATURE_RANGE: &str = "save.lab_temperature_range";
    pub const SAVE_WEIGHT_RANGE: &str = "save.weight_range";

    pub const KF_RESOLVING: &str = "kf.resolving";
    pub const KF_RESOLVED: &str = "kf.resolved";
    pub const KF_NO_DAILY_TYPE: &str = "kf.no_daily_type";
    pub const KF_NO_DAILY_VERIFICATIONS: &str = "kf.no_daily_verifications";
    pub const KF_NO_MEAN_FACTOR: &str = "kf.no_mean_factor";
    pub const KF_FETCH_ERROR: &str = "kf.fetch_error";

    pub const CLI_RESULT: &str = "cli.result";
    pub const CLI_INCOMPLETE: &str = "cli.incomplete";
    pub const CLI_API_REQUEST: &str = "cli.api_request";
    pub const CLI_DRIFT_OK: &str = "cli.drift_ok";
    pub const CLI_RANGE_INSIDE: &str = "cli.range_inside";
    pub const CLI_RANGE_OUTSIDE: &str = "cli.range_outside";
    pub const CLI_SAVE_OK: &str = "cli.save_ok";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 → 영어 순으로 찾는다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let builtin = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        builtin.unwrap_or("[missing translation]").to_string()
    }

    /// `{name}` 자리표시자를 채운 번역을 가져온다.
    pub fn t_with(&self, key: &str, args: &[(&str, String)]) -> String {
        args.iter().fold(self.t(key), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
    }
}

/// 사용자에게 보여줄 문장으로 바꿀 수 있는 값.
pub trait UserMessage {
    fn message(&self, tr: &Translator) -> String;
}

impl UserMessage for FieldError {
    fn message(&self, tr: &Translator) -> String {
        match self {
            FieldError::TemperatureSpread { .. } => tr.t(keys::FIELD_TEMPERATURE_SPREAD),
            FieldError::LabTemperatureDrift { .. } => tr.t(keys::FIELD_LAB_DRIFT),
            FieldError::ApiCorrectionFailed(detail) => tr.t_with(
                keys::FIELD_API_CORRECTION_FAILED,
                &[("detail", detail.clone())],
            ),
        }
    }
}

impl UserMessage for SaveBlocked {
    fn message(&self, tr: &Translator) -> String {
        let value = |v: f64, d: usize| vec![("value", format!("{v:.d$}"))];
        match *self {
            SaveBlocked::TemperatureSpread => tr.t(keys::SAVE_TEMPERATURE_SPREAD),
            SaveBlocked::LabTemperatureDrift => tr.t(keys::SAVE_LAB_DRIFT),
            SaveBlocked::ObservedTemperatureOutOfRange { value_c } => {
                tr.t_with(keys::SAVE_OBSERVED_TEMPERATURE_RANGE, &value(value_c, 2))
            }
            SaveBlocked::ApiReadingOutOfRange { value: v } => {
                tr.t_with(keys::SAVE_API_RANGE, &value(v, 2))
            }
            SaveBlocked::RelativeHumidityOutOfRange { value: v } => {
                tr.t_with(keys::SAVE_HUMIDITY_RANGE, &value(v, 1))
            }
            SaveBlocked::LabTemperatureOutOfRange { value_c } => {
                tr.t_with(keys::SAVE_LAB_TEMPERATURE_RANGE, &value(value_c, 2))
            }
            SaveBlocked::SampleWeightOutOfRange { value_g } => {
                tr.t_with(keys::SAVE_WEIGHT_RANGE, &value(value_g, 4))
            }
        }
    }
}

impl UserMessage for KfNotFound {
    fn message(&self, tr: &Translator) -> String {
        match self {
            KfNotFound::NoDailyType => tr.t(keys::KF_NO_DAILY_TYPE),
            KfNotFound::NoDailyVerifications => tr.t(keys::KF_NO_DAILY_VERIFICATIONS),
            KfNotFound::NoMeanFactor => tr.t(keys::KF_NO_MEAN_FACTOR),
        }
    }
}

impl UserMessage for KfResolution {
    /// KF 팩터 필드 아래에 표시할 안내 문구. Idle 상태면 빈 문자열.
    fn message(&self, tr: &Translator) -> String {
        match self {
            KfResolution::Idle => String::new(),
            KfResolution::Resolving => tr.t(keys::KF_RESOLVING),
            KfResolution::Resolved(v) => tr.t_with(
                keys::KF_RESOLVED,
                &[("value", crate::analysis::kf_factor::format_factor(*v))],
            ),
            KfResolution::NotFound(reason) => reason.message(tr),
            KfResolution::FetchError(_) => tr.t(keys::KF_FETCH_ERROR),
        }
    }
}

impl UserMessage for CollaboratorError {
    fn message(&self, tr: &Translator) -> String {
        format!("{}: {}", tr.t(keys::ERROR_PREFIX), self.detail())
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        FIELD_TEMPERATURE_SPREAD => "관측 온도 차이는 0.5 °F 이하여야 합니다.",
        FIELD_LAB_DRIFT => "실험실 온도는 현장 평균과 5 °F 이내여야 합니다.",
        FIELD_API_CORRECTION_FAILED => "API 60°F 보정 실패: {detail}",
        SAVE_TEMPERATURE_SPREAD => "시작/종료 관측 온도 차이가 0.5 °F를 넘어 저장할 수 없습니다.",
        SAVE_LAB_DRIFT => "실험실 온도가 현장 평균과 5 °F 넘게 차이나 저장할 수 없습니다.",
        SAVE_OBSERVED_TEMPERATURE_RANGE => "관측 온도 {value} °C가 온도계 측정 범위를 벗어났습니다.",
        SAVE_API_RANGE => "API 판독값 {value}이(가) 비중계 측정 범위를 벗어났습니다.",
        SAVE_HUMIDITY_RANGE => "상대습도 {value} %가 온습도계 측정 범위를 벗어났습니다.",
        SAVE_LAB_TEMPERATURE_RANGE => "실험실 온도 {value} °C가 온습도계 측정 범위를 벗어났습니다.",
        SAVE_WEIGHT_RANGE => "시료 질량 {value} g이(가) 저울 측정 범위를 벗어났습니다.",
        KF_RESOLVING => "평균 KF 팩터를 불러오는 중...",
        KF_RESOLVED => "일일 검증의 평균 KF 팩터: {value}",
        KF_NO_DAILY_TYPE => "이 장비 유형에는 일일 검증 종류가 설정되어 있지 않습니다.",
        KF_NO_DAILY_VERIFICATIONS => "이 장비의 일일 검증 기록이 없습니다.",
        KF_NO_MEAN_FACTOR => "일일 검증에서 평균 팩터를 찾지 못했습니다.",
        KF_FETCH_ERROR => "평균 KF 팩터를 불러오지 못했습니다.",
        CLI_RESULT => "결과:",
        CLI_INCOMPLETE => "입력이 부족하여 계산하지 않았습니다.",
        CLI_API_REQUEST => "보정 요청:",
        CLI_DRIFT_OK => "실험실 온도 편차가 허용 범위 안에 있습니다.",
        CLI_RANGE_INSIDE => "사양 범위 안입니다.",
        CLI_RANGE_OUTSIDE => "사양 범위를 벗어났습니다.",
        CLI_SAVE_OK => "저장 검증을 통과했습니다. 페이로드:",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        FIELD_TEMPERATURE_SPREAD => "Temperature difference must be ≤ 0.5 °F.",
        FIELD_LAB_DRIFT => "Lab temperature must be within 5 °F of field average.",
        FIELD_API_CORRECTION_FAILED => "API 60°F correction failed: {detail}",
        SAVE_TEMPERATURE_SPREAD => "Observed start/end temperatures differ by more than 0.5 °F.",
        SAVE_LAB_DRIFT => "Lab temperature must be within 5 °F of field average.",
        SAVE_OBSERVED_TEMPERATURE_RANGE => {
            "Observed temperature {value} °C is outside the thermometer range."
        }
        SAVE_API_RANGE => "API reading {value} is outside the hydrometer range.",
        SAVE_HUMIDITY_RANGE => "Relative humidity {value} % is outside the thermohygrometer range.",
        SAVE_LAB_TEMPERATURE_RANGE => {
            "Lab temperature {value} °C is outside the thermohygrometer range."
        }
        SAVE_WEIGHT_RANGE => "Sample weight {value} g is outside the balance range.",
        KF_RESOLVING => "Loading mean KF factor...",
        KF_RESOLVED => "Mean KF factor from daily verification: {value}",
        KF_NO_DAILY_TYPE => "No daily verification type configured for this equipment type.",
        KF_NO_DAILY_VERIFICATIONS => "No daily verifications recorded for this equipment.",
        KF_NO_MEAN_FACTOR => "No mean factor found in daily verification.",
        KF_FETCH_ERROR => "Could not load mean KF factor.",
        CLI_RESULT => "Result:",
        CLI_INCOMPLETE => "Incomplete input; nothing computed.",
        CLI_API_REQUEST => "Correction request:",
        CLI_DRIFT_OK => "Lab temperature drift is within tolerance.",
        CLI_RANGE_INSIDE => "Inside spec range.",
        CLI_RANGE_OUTSIDE => "Outside spec range.",
        CLI_SAVE_OK => "Save checks passed. Payload:",
        _ => return None,
    })
}
