//! 일일 검증 이력에서 Karl-Fischer 평균 팩터를 찾아 폼에 미리 채운다.
//!
//! 조회 순서: 장비 → 장비 유형 → 검증 종류(주기 1일) → 해당 장비의 검증 이력 → 최신 기록 →
//! notes 안의 `Factor promedio: <숫자>`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::collaborator::{CollaboratorError, EquipmentDirectory};
use crate::conversion::parse_number;
use crate::model::{EquipmentId, VerificationRecord, VerificationTypeDefinition, VerificationTypeId};

/// 표시용 소수 자릿수.
pub const FACTOR_DECIMALS: usize = 4;

static MEAN_FACTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)factor\s+promedio\s*:\s*([-+]?\d+(?:[.,]\d+)?)").expect("regex mean factor")
});

/// 팩터를 찾지 못한 사유. 정보성 안내이며 오류 대화상자가 아니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KfNotFound {
    /// 장비 유형에 주기 1일 검증 종류가 없음
    NoDailyType,
    /// 일일 검증 기록이 없음
    NoDailyVerifications,
    /// 최신 일일 검증에 평균 팩터가 없음
    NoMeanFactor,
}

/// KF 장비 선택 하나에 대한 조회 상태.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum KfResolution {
    #[default]
    Idle,
    Resolving,
    Resolved(f64),
    NotFound(KfNotFound),
    FetchError(CollaboratorError),
}

/// notes 자유 텍스트에서 평균 팩터를 추출한다. 레이블은 대소문자를 가리지 않고 소수점은 `,`/`.` 모두 허용한다.
pub fn extract_mean_factor(notes: &str) -> Option<f64> {
    let caps = MEAN_FACTOR_RE.captures(notes)?;
    parse_number(caps.get(1)?.as_str())
}

/// 기록의 평균 팩터. 구조화 필드를 우선하고, 없으면 notes 파싱으로 폴백한다.
pub fn record_mean_factor(record: &VerificationRecord) -> Option<f64> {
    record
        .mean_factor
        .filter(|v| v.is_finite())
        .or_else(|| extract_mean_factor(&record.notes))
}

/// 일일 검증 종류를 고른다. 둘 이상이면 첫 번째를 쓴다.
pub fn select_daily_type(
    types: &[VerificationTypeDefinition],
) -> Result<VerificationTypeId, KfNotFound> {
    let mut daily = types.iter().filter(|t| t.is_daily());
    let first = daily.next().ok_or(KfNotFound::NoDailyType)?;
    if daily.next().is_some() {
        warn!(type_id = first.id, "multiple daily verification types, using the first");
    }
    Ok(first.id)
}

/// 일일 검증 기록 중 가장 최근 것을 고른다. 시각이 같으면 id가 큰 기록을 택한다.
///
/// `same_day`가 주어지면 그 날짜(UTC)에 수행된 기록만 후보로 삼는다.
pub fn latest_daily_record(
    history: &[VerificationRecord],
    daily_type_id: VerificationTypeId,
    same_day: Option<NaiveDate>,
) -> Option<&VerificationRecord> {
    history
        .iter()
        .filter(|r| r.verification_type_id == daily_type_id)
        .filter(|r| same_day.is_none_or(|d| r.verified_at.date_naive() == d))
        .max_by_key(|r| (r.verified_at, r.id))
}

/// 이력에서 평균 팩터를 구한다.
pub fn factor_from_history(
    history: &[VerificationRecord],
    daily_type_id: VerificationTypeId,
    same_day: Option<NaiveDate>,
) -> Result<f64, KfNotFound> {
    let record = latest_daily_record(history, daily_type_id, same_day)
        .ok_or(KfNotFound::NoDailyVerifications)?;
    debug!(record_id = record.id, verified_at = %record.verified_at, "latest daily verification");
    record_mean_factor(record).ok_or(KfNotFound::NoMeanFactor)
}

/// 조회 단계를 한 번에 동기적으로 수행한다. CLI와 배치 검증에서 쓴다.
pub fn resolve_mean_factor<D: EquipmentDirectory + ?Sized>(
    directory: &D,
    equipment_id: EquipmentId,
    same_day: Option<NaiveDate>,
) -> KfResolution {
    let run = || -> Result<Result<f64, KfNotFound>, CollaboratorError> {
        let equipment = directory.equipment(equipment_id)?;
        let types = directory.verification_types(equipment.equipment_type_id)?;
        let daily_type_id = match select_daily_type(&types) {
            Ok(id) => id,
            Err(reason) => return Ok(Err(reason)),
        };
        let history = directory.verification_history(equipment_id)?;
        Ok(factor_from_history(&history, daily_type_id, same_day))
    };
    match run() {
        Ok(Ok(value)) => KfResolution::Resolved(value),
        Ok(Err(reason)) => KfResolution::NotFound(reason),
        Err(err) => {
            warn!(equipment_id, error = %err, "mean KF factor lookup failed");
            KfResolution::FetchError(err)
        }
    }
}

pub fn format_factor(value: f64) -> String {
    format!("{:.*}", FACTOR_DECIMALS, value)
}

/// 필드가 비어 있을 때만 팩터를 채운다. 채웠으면 `true`.
pub fn prefill_factor(field: &mut String, value: f64) -> bool {
    if !field.trim().is_empty() {
        return false;
    }
    *field = format_factor(value);
    true
}
