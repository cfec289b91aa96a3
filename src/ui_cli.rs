use std::fs;
use std::path::Path;

use crate::analysis::kf_factor::{self, KfResolution};
use crate::analysis::{
    check_lab_drift, compute_water_percent, evaluate_api_gate, is_outside_spec_range, ApiGate,
    DriftCheck,
};
use crate::app::AppError;
use crate::config::Config;
use crate::conversion::{self, parse_number};
use crate::fixture::{DryRunSink, LabFixture, OfflineApiCorrection};
use crate::i18n::{keys, Translator, UserMessage};
use crate::model::EquipmentMeasureSpec;
use crate::pipeline::{ResultsForm, SampleSession, SaveError};
use crate::quantity::Measure;

/// 단위 변환을 처리한다.
pub fn handle_convert(
    tr: &Translator,
    cfg: &Config,
    measure: Measure,
    value: &str,
    from_unit: &str,
    to_unit: &str,
) -> Result<(), AppError> {
    let v = parse_number(value)
        .ok_or_else(|| conversion::ConversionError::InvalidNumber(value.to_string()))?;
    let result = conversion::convert(measure, v, from_unit, to_unit)?;
    let decimals = match measure {
        Measure::Weight => cfg.display.mass,
        Measure::Volume => cfg.display.volume,
        _ => cfg.display.temperature,
    };
    println!("{} {result:.decimals$} {}", tr.t(keys::CLI_RESULT), to_unit.trim());
    Ok(())
}

/// 수분 함량 계산 결과를 출력한다.
pub fn handle_water(
    tr: &Translator,
    volume: &str,
    volume_unit: &str,
    factor: &str,
    weight: &str,
    weight_unit: &str,
) {
    let percent = compute_water_percent(volume, volume_unit, factor, weight, weight_unit);
    if percent.is_empty() {
        println!("{}", tr.t(keys::CLI_INCOMPLETE));
    } else {
        println!("{} {percent} %", tr.t(keys::CLI_RESULT));
    }
}

/// API 60°F 게이트를 평가하고 보정 요청을 출력한다.
pub fn handle_api(
    tr: &Translator,
    cfg: &Config,
    start: &str,
    end: &str,
    unit: &str,
    reading: &str,
) {
    match evaluate_api_gate(start, end, unit, reading) {
        ApiGate::Incomplete => println!("{}", tr.t(keys::CLI_INCOMPLETE)),
        ApiGate::SpreadExceeded { diff_f } => {
            let decimals = cfg.display.temperature;
            println!(
                "{} (Δ {diff_f:.decimals$} °F)",
                tr.t(keys::FIELD_TEMPERATURE_SPREAD)
            )
        }
        ApiGate::Ready(request) => println!(
            "{} avg {:.p$} °F, API {:.a$}",
            tr.t(keys::CLI_API_REQUEST),
            request.avg_temperature_fahrenheit,
            request.raw_api_reading,
            p = cfg.display.temperature,
            a = cfg.display.api
        ),
    }
}

/// 실험실 온도 편차를 출력한다.
pub fn handle_drift(
    tr: &Translator,
    cfg: &Config,
    start: &str,
    end: &str,
    unit: &str,
    lab: &str,
    lab_unit: &str,
) {
    let decimals = cfg.display.temperature;
    match check_lab_drift(start, end, unit, lab, lab_unit) {
        DriftCheck::Incomplete => println!("{}", tr.t(keys::CLI_INCOMPLETE)),
        DriftCheck::Within { diff_f } => {
            println!("{} (Δ {diff_f:.decimals$} °F)", tr.t(keys::CLI_DRIFT_OK))
        }
        DriftCheck::Exceeded { diff_f } => {
            println!("{} (Δ {diff_f:.decimals$} °F)", tr.t(keys::FIELD_LAB_DRIFT))
        }
    }
}

/// 사양 범위 검사 결과를 출력한다.
pub fn handle_range(
    tr: &Translator,
    measure: Measure,
    value: &str,
    min_value: Option<f64>,
    max_value: Option<f64>,
) {
    let spec = EquipmentMeasureSpec {
        measure,
        min_value,
        max_value,
    };
    if is_outside_spec_range(parse_number(value), Some(&spec)) {
        println!("{}", tr.t(keys::CLI_RANGE_OUTSIDE));
    } else {
        println!("{}", tr.t(keys::CLI_RANGE_INSIDE));
    }
}

/// 데이터 파일로 평균 KF 팩터를 조회한다.
pub fn handle_kf_factor(
    tr: &Translator,
    cfg: &Config,
    equipment_id: u64,
    data: &Path,
) -> Result<(), AppError> {
    let fixture = LabFixture::load(data)?;
    let settings = cfg.session_settings();
    let resolution = kf_factor::resolve_mean_factor(&fixture, equipment_id, settings.kf_same_day);
    println!("{}", resolution.message(tr));
    if let KfResolution::Resolved(value) = resolution {
        let decimals = cfg.display.factor;
        println!("{value:.decimals$}");
    }
    Ok(())
}

/// 폼 파일을 세션에 넣어 모든 파이프라인을 돌린 뒤 저장 검증을 수행한다.
pub fn handle_validate(
    tr: &Translator,
    cfg: &Config,
    sample_id: u64,
    form_path: &Path,
    data: &Path,
) -> Result<(), AppError> {
    let fixture = LabFixture::load(data)?;
    let form: ResultsForm = toml::from_str(&fs::read_to_string(form_path)?)?;
    let mut session = SampleSession::open(sample_id, form, cfg.session_settings());
    session.pump(&fixture, &OfflineApiCorrection);

    let derived = session.derived();
    let errors = [&derived.api_error, &derived.lab_drift_error];
    for err in errors.into_iter().flatten() {
        println!("- {}", err.message(tr));
    }
    let helper = derived.kf_factor.message(tr);
    if !helper.is_empty() {
        println!("- {helper}");
    }
    if !derived.percent_water.is_empty() {
        println!("{} {} %", tr.t(keys::CLI_RESULT), derived.percent_water);
    }

    match session.save(&fixture, &DryRunSink) {
        Ok(payload) => {
            println!("{}", tr.t(keys::CLI_SAVE_OK));
            println!("{}", toml::to_string_pretty(&payload)?);
            Ok(())
        }
        Err(SaveError::Blocked(blocked)) => {
            Err(AppError::SaveBlocked(blocked.message(tr)))
        }
        Err(SaveError::Collaborator(err)) => Err(err.into()),
    }
}
