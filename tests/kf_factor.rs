//! 일일 검증 이력에서 평균 KF 팩터를 찾는 조회 단계.
mod common;

use common::{assert_close, at, equipment, record, verification_type, FakeDirectory};
use lab_sample_engine::analysis::kf_factor::{
    extract_mean_factor, factor_from_history, format_factor, latest_daily_record,
    prefill_factor, record_mean_factor, resolve_mean_factor, select_daily_type,
};
use lab_sample_engine::analysis::{KfNotFound, KfResolution};
use lab_sample_engine::collaborator::CollaboratorError;

#[test]
fn notes_pattern_accepts_comma_dot_and_any_case() {
    assert_eq!(extract_mean_factor("Factor promedio: 1.2345"), Some(1.2345));
    assert_eq!(extract_mean_factor("ok. FACTOR PROMEDIO:1,5"), Some(1.5));
    assert_eq!(
        extract_mean_factor("Titulación 1: 4.9\nfactor promedio : 5.0123 mg/mL"),
        Some(5.0123)
    );
    assert_eq!(extract_mean_factor("Factor: 1.2"), None);
    assert_eq!(extract_mean_factor("Factor promedio: n/a"), None);
    assert_eq!(extract_mean_factor(""), None);
}

#[test]
fn structured_field_wins_over_notes() {
    let mut r = record(1, 11, at(1, 8), "Factor promedio: 1.1111");
    assert_eq!(record_mean_factor(&r), Some(1.1111));
    r.mean_factor = Some(2.2222);
    assert_eq!(record_mean_factor(&r), Some(2.2222));
}

#[test]
fn daily_type_is_frequency_one() {
    let types = vec![verification_type(10, 30), verification_type(11, 1)];
    assert_eq!(select_daily_type(&types), Ok(11));
    assert_eq!(
        select_daily_type(&[verification_type(10, 7)]),
        Err(KfNotFound::NoDailyType)
    );
    assert_eq!(select_daily_type(&[]), Err(KfNotFound::NoDailyType));
}

#[test]
fn most_recent_record_is_selected() {
    let history = vec![
        record(1, 11, at(1, 8), "Factor promedio: 1.2345"),
        record(2, 11, at(2, 8), "Factor promedio: 1.5000"),
        record(3, 10, at(3, 8), "Factor promedio: 9.9999"),
    ];
    assert_eq!(latest_daily_record(&history, 11, None).map(|r| r.id), Some(2));
    assert_eq!(factor_from_history(&history, 11, None), Ok(1.5));
}

#[test]
fn equal_timestamps_break_on_highest_id() {
    let history = vec![
        record(8, 11, at(2, 8), "Factor promedio: 1.0"),
        record(9, 11, at(2, 8), "Factor promedio: 2.0"),
        record(7, 11, at(2, 8), "Factor promedio: 3.0"),
    ];
    assert_eq!(latest_daily_record(&history, 11, None).map(|r| r.id), Some(9));
}

#[test]
fn same_day_restriction_filters_older_records() {
    let history = vec![record(1, 11, at(1, 8), "Factor promedio: 1.2")];
    let today = at(2, 0).date_naive();
    assert_eq!(
        factor_from_history(&history, 11, Some(today)),
        Err(KfNotFound::NoDailyVerifications)
    );
    assert_eq!(factor_from_history(&history, 11, Some(at(1, 0).date_naive())), Ok(1.2));
}

#[test]
fn latest_record_without_factor_is_reported() {
    let history = vec![
        record(1, 11, at(1, 8), "Factor promedio: 1.2"),
        record(2, 11, at(2, 8), "sin observaciones"),
    ];
    assert_eq!(
        factor_from_history(&history, 11, None),
        Err(KfNotFound::NoMeanFactor)
    );
}

#[test]
fn prefill_only_touches_empty_field() {
    let mut empty = String::from("  ");
    assert!(prefill_factor(&mut empty, 1.5));
    assert_eq!(empty, "1.5000");
    let mut typed = String::from("1.1");
    assert!(!prefill_factor(&mut typed, 1.5));
    assert_eq!(typed, "1.1");
    assert_eq!(format_factor(1.23456), "1.2346");
}

fn directory() -> FakeDirectory {
    FakeDirectory::default()
        .with_equipment(equipment(7, 3, vec![]))
        .with_equipment(equipment(8, 4, vec![]))
        .with_types(3, vec![verification_type(10, 30), verification_type(11, 1)])
        .with_types(4, vec![verification_type(12, 90)])
        .with_history(
            7,
            vec![
                record(1, 11, at(1, 8), "Factor promedio: 1.2345"),
                record(2, 11, at(2, 8), "Factor promedio: 1.5000"),
            ],
        )
}

#[test]
fn cascade_resolves_latest_daily_factor() {
    let dir = directory();
    match resolve_mean_factor(&dir, 7, None) {
        KfResolution::Resolved(v) => assert_close("factor", v, 1.5, 1e-12),
        other => panic!("expected resolved, got {other:?}"),
    }
    assert_eq!(
        *dir.calls.borrow(),
        vec!["equipment/7", "types/3", "history/7"]
    );
}

#[test]
fn cascade_stops_when_no_daily_type() {
    let dir = directory();
    assert_eq!(
        resolve_mean_factor(&dir, 8, None),
        KfResolution::NotFound(KfNotFound::NoDailyType)
    );
    assert_eq!(dir.call_count(), 2, "history must not be fetched");
}

#[test]
fn cascade_reports_fetch_failures() {
    let mut dir = directory();
    dir.failing_history.insert(7);
    assert!(matches!(
        resolve_mean_factor(&dir, 7, None),
        KfResolution::FetchError(CollaboratorError::Unavailable(_))
    ));
    assert!(matches!(
        resolve_mean_factor(&dir, 99, None),
        KfResolution::FetchError(CollaboratorError::NotFound(_))
    ));
}
