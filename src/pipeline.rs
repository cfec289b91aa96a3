//! 결과 입력 대화상자 하나의 반응형 파이프라인.
//!
//! 파생값마다 세대(generation) 카운터를 두고, 입력이 바뀔 때마다 명시적으로 재계산한다.
//! 외부 호출은 [`Task`]로 큐에 쌓이고, 실행 결과는 [`Completion`]으로 되돌아온다.
//! 발급 세대가 현재 세대와 다르면 결과를 버린다. 진행 중인 I/O를 끊지는 않는다.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::kf_factor::{self, KfNotFound, KfResolution};
use crate::analysis::spec_range::{self, SaveBlocked, SaveCandidate, SelectedEquipment};
use crate::analysis::water_content;
use crate::analysis::{evaluate_api_gate, check_lab_drift, ApiGate, DriftCheck, FieldError};
use crate::collaborator::{
    ApiCorrection, ApiCorrectionRequest, ApiCorrectionService, CollaboratorError,
    EquipmentDirectory, SampleResultsSink,
};
use crate::conversion::{parse_mass_unit, parse_number, parse_temperature_unit, parse_volume_unit};
use crate::model::{
    Equipment, EquipmentId, EquipmentTypeId, SampleId, SampleResultsPayload, VerificationRecord,
    VerificationTypeDefinition, VerificationTypeId,
};
use crate::quantity::{MassReading, TemperatureReading};

/// 단조 증가하는 세대 카운터.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    /// 세대를 올리고 새 값을 돌려준다. 이전 세대로 발급된 작업은 모두 무효가 된다.
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

/// 결과 폼의 입력 필드. 값은 사용자가 입력한 문자열 그대로 보관한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsForm {
    pub temp_obs_start: String,
    pub temp_obs_end: String,
    pub temp_unit: String,
    pub lectura_api: String,
    pub lab_temperature: String,
    pub lab_temperature_unit: String,
    pub relative_humidity: String,
    pub water_sample_weight: String,
    pub water_sample_weight_unit: String,
    pub water_volume_consumed: String,
    pub water_volume_unit: String,
    pub kf_factor_avg: String,
    pub thermometer_id: Option<EquipmentId>,
    pub hydrometer_id: Option<EquipmentId>,
    pub thermohygrometer_id: Option<EquipmentId>,
    pub balance_id: Option<EquipmentId>,
    pub kf_equipment_id: Option<EquipmentId>,
}

impl Default for ResultsForm {
    fn default() -> Self {
        Self {
            temp_obs_start: String::new(),
            temp_obs_end: String::new(),
            temp_unit: "f".into(),
            lectura_api: String::new(),
            lab_temperature: String::new(),
            lab_temperature_unit: "f".into(),
            relative_humidity: String::new(),
            water_sample_weight: String::new(),
            water_sample_weight_unit: "g".into(),
            water_volume_consumed: String::new(),
            water_volume_unit: "mL".into(),
            kf_factor_avg: String::new(),
            thermometer_id: None,
            hydrometer_id: None,
            thermohygrometer_id: None,
            balance_id: None,
            kf_equipment_id: None,
        }
    }
}

/// 문자열 입력 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    TempObsStart,
    TempObsEnd,
    TempUnit,
    LecturaApi,
    LabTemperature,
    LabTemperatureUnit,
    RelativeHumidity,
    WaterSampleWeight,
    WaterSampleWeightUnit,
    WaterVolumeConsumed,
    WaterVolumeUnit,
    KfFactorAvg,
}

/// 장비 선택 슬롯.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentRole {
    Thermometer,
    Hydrometer,
    Thermohygrometer,
    Balance,
    KarlFischer,
}

impl ResultsForm {
    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::TempObsStart => &mut self.temp_obs_start,
            FormField::TempObsEnd => &mut self.temp_obs_end,
            FormField::TempUnit => &mut self.temp_unit,
            FormField::LecturaApi => &mut self.lectura_api,
            FormField::LabTemperature => &mut self.lab_temperature,
            FormField::LabTemperatureUnit => &mut self.lab_temperature_unit,
            FormField::RelativeHumidity => &mut self.relative_humidity,
            FormField::WaterSampleWeight => &mut self.water_sample_weight,
            FormField::WaterSampleWeightUnit => &mut self.water_sample_weight_unit,
            FormField::WaterVolumeConsumed => &mut self.water_volume_consumed,
            FormField::WaterVolumeUnit => &mut self.water_volume_unit,
            FormField::KfFactorAvg => &mut self.kf_factor_avg,
        }
    }

    fn equipment_mut(&mut self, role: EquipmentRole) -> &mut Option<EquipmentId> {
        match role {
            EquipmentRole::Thermometer => &mut self.thermometer_id,
            EquipmentRole::Hydrometer => &mut self.hydrometer_id,
            EquipmentRole::Thermohygrometer => &mut self.thermohygrometer_id,
            EquipmentRole::Balance => &mut self.balance_id,
            EquipmentRole::KarlFischer => &mut self.kf_equipment_id,
        }
    }

    fn sample_weight(&self) -> Option<MassReading> {
        let v = parse_number(&self.water_sample_weight)?;
        let u = parse_mass_unit(&self.water_sample_weight_unit).ok()?;
        Some(MassReading::new(v, u))
    }

    fn percent_water_value(&self) -> Option<f64> {
        let vu = parse_volume_unit(&self.water_volume_unit).ok()?;
        let wu = parse_mass_unit(&self.water_sample_weight_unit).ok()?;
        water_content::water_percent_value(
            parse_number(&self.water_volume_consumed)?,
            vu,
            parse_number(&self.kf_factor_avg)?,
            parse_number(&self.water_sample_weight)?,
            wu,
        )
    }
}

fn temperature_reading(value: &str, unit: &str) -> Option<TemperatureReading> {
    let v = parse_number(value)?;
    let u = parse_temperature_unit(unit).ok()?;
    Some(TemperatureReading::new(v, u))
}

/// 폼에 표시되는 파생값과 필드 오류.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedResults {
    pub api_60f: Option<f64>,
    pub api_pending: bool,
    pub api_error: Option<FieldError>,
    pub lab_drift_error: Option<FieldError>,
    /// 4자리 표시 문자열. 계산 불가면 빈 문자열.
    pub percent_water: String,
    pub kf_factor: KfResolution,
}

/// 큐에 쌓이는 외부 호출 작업. 발급 당시의 세대를 함께 들고 다닌다.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    CorrectApi {
        generation: u64,
        request: ApiCorrectionRequest,
    },
    LoadKfEquipment {
        generation: u64,
        equipment_id: EquipmentId,
    },
    LoadKfVerificationTypes {
        generation: u64,
        equipment_id: EquipmentId,
        equipment_type_id: EquipmentTypeId,
    },
    LoadKfHistory {
        generation: u64,
        equipment_id: EquipmentId,
        daily_type_id: VerificationTypeId,
    },
}

/// 작업 실행 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    ApiCorrected {
        generation: u64,
        result: Result<ApiCorrection, CollaboratorError>,
    },
    KfEquipmentLoaded {
        generation: u64,
        result: Result<Equipment, CollaboratorError>,
    },
    KfVerificationTypesLoaded {
        generation: u64,
        equipment_id: EquipmentId,
        result: Result<Vec<VerificationTypeDefinition>, CollaboratorError>,
    },
    KfHistoryLoaded {
        generation: u64,
        daily_type_id: VerificationTypeId,
        result: Result<Vec<VerificationRecord>, CollaboratorError>,
    },
}

/// 작업 하나를 협력자에 대해 실행한다.
pub fn perform<D, A>(task: Task, directory: &D, api: &A) -> Completion
where
    D: EquipmentDirectory + ?Sized,
    A: ApiCorrectionService + ?Sized,
{
    match task {
        Task::CorrectApi {
            generation,
            request,
        } => Completion::ApiCorrected {
            generation,
            result: api.correct_to_60f(request),
        },
        Task::LoadKfEquipment {
            generation,
            equipment_id,
        } => Completion::KfEquipmentLoaded {
            generation,
            result: directory.equipment(equipment_id),
        },
        Task::LoadKfVerificationTypes {
            generation,
            equipment_id,
            equipment_type_id,
        } => Completion::KfVerificationTypesLoaded {
            generation,
            equipment_id,
            result: directory.verification_types(equipment_type_id),
        },
        Task::LoadKfHistory {
            generation,
            equipment_id,
            daily_type_id,
        } => Completion::KfHistoryLoaded {
            generation,
            daily_type_id,
            result: directory.verification_history(equipment_id),
        },
    }
}

/// 세션 동작 옵션.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    /// 주어지면 이 날짜에 수행된 일일 검증만 KF 팩터 후보로 삼는다.
    pub kf_same_day: Option<NaiveDate>,
}

/// 저장 실패.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error(transparent)]
    Blocked(#[from] SaveBlocked),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// 시료 한 건의 결과 입력 세션.
#[derive(Debug)]
pub struct SampleSession {
    sample_id: SampleId,
    settings: SessionSettings,
    form: ResultsForm,
    derived: DerivedResults,
    api_generation: Generation,
    kf_generation: Generation,
    queue: VecDeque<Task>,
    open: bool,
}

impl SampleSession {
    /// 대화상자를 연 상태로 세션을 만든다. 초기 폼 기준으로 모든 파이프라인을 한 번 돌린다.
    pub fn open(sample_id: SampleId, form: ResultsForm, settings: SessionSettings) -> Self {
        let mut session = Self {
            sample_id,
            settings,
            form,
            derived: DerivedResults::default(),
            api_generation: Generation::default(),
            kf_generation: Generation::default(),
            queue: VecDeque::new(),
            open: true,
        };
        session.recompute_all();
        session
    }

    pub fn sample_id(&self) -> SampleId {
        self.sample_id
    }

    pub fn form(&self) -> &ResultsForm {
        &self.form
    }

    pub fn derived(&self) -> &DerivedResults {
        &self.derived
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// 대화상자를 닫는다. 진행 중인 모든 요청 결과는 도착해도 버려진다.
    pub fn close(&mut self) {
        self.open = false;
        self.api_generation.advance();
        self.kf_generation.advance();
        self.queue.clear();
        self.derived.api_pending = false;
        self.derived.kf_factor = KfResolution::Idle;
    }

    /// 대화상자를 다시 연다. KF 조회는 Idle로 초기화된 뒤 곧바로 다시 시작된다.
    pub fn reopen(&mut self) {
        self.open = true;
        self.recompute_all();
    }

    /// 입력 필드를 바꾸고 영향을 받는 파이프라인을 재계산한다.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.field_mut(field) = value.into();
        if !self.open {
            return;
        }
        match field {
            FormField::TempObsStart | FormField::TempObsEnd | FormField::TempUnit => {
                self.recompute_api();
                self.recompute_drift();
            }
            FormField::LecturaApi => self.recompute_api(),
            FormField::LabTemperature | FormField::LabTemperatureUnit => self.recompute_drift(),
            FormField::RelativeHumidity => {}
            FormField::WaterSampleWeight
            | FormField::WaterSampleWeightUnit
            | FormField::WaterVolumeConsumed
            | FormField::WaterVolumeUnit
            | FormField::KfFactorAvg => self.recompute_water(),
        }
    }

    /// 장비를 선택한다. KF 장비가 바뀌면 팩터 조회를 처음부터 다시 시작한다.
    pub fn select_equipment(&mut self, role: EquipmentRole, id: Option<EquipmentId>) {
        let slot = self.form.equipment_mut(role);
        let changed = *slot != id;
        *slot = id;
        if role == EquipmentRole::KarlFischer && changed && self.open {
            self.restart_kf();
        }
    }

    /// 다음 작업을 꺼낸다.
    pub fn next_task(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// 큐가 빌 때까지 작업을 실행하고 결과를 반영한다.
    pub fn pump<D, A>(&mut self, directory: &D, api: &A)
    where
        D: EquipmentDirectory + ?Sized,
        A: ApiCorrectionService + ?Sized,
    {
        while let Some(task) = self.next_task() {
            let completion = perform(task, directory, api);
            self.apply(completion);
        }
    }

    /// 작업 결과를 반영한다. 현재 세대가 아니면 무시한다.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::ApiCorrected { generation, result } => {
                if !self.api_generation.is_current(generation) {
                    debug!(generation, "discarding stale API correction");
                    return;
                }
                self.derived.api_pending = false;
                match result {
                    Ok(correction) => {
                        self.derived.api_60f = Some(correction.api_60f);
                        self.derived.api_error = None;
                    }
                    Err(err) => {
                        warn!(error = %err, "API 60°F correction failed");
                        self.derived.api_60f = None;
                        self.derived.api_error =
                            Some(FieldError::ApiCorrectionFailed(err.detail().to_string()));
                    }
                }
            }
            Completion::KfEquipmentLoaded { generation, result } => {
                if !self.kf_is_current(generation) {
                    return;
                }
                match result {
                    Ok(equipment) => self.queue.push_back(Task::LoadKfVerificationTypes {
                        generation,
                        equipment_id: equipment.id,
                        equipment_type_id: equipment.equipment_type_id,
                    }),
                    Err(err) => self.kf_fetch_failed(err),
                }
            }
            Completion::KfVerificationTypesLoaded {
                generation,
                equipment_id,
                result,
            } => {
                if !self.kf_is_current(generation) {
                    return;
                }
                match result {
                    Ok(types) => match kf_factor::select_daily_type(&types) {
                        Ok(daily_type_id) => self.queue.push_back(Task::LoadKfHistory {
                            generation,
                            equipment_id,
                            daily_type_id,
                        }),
                        Err(reason) => self.kf_not_found(reason),
                    },
                    Err(err) => self.kf_fetch_failed(err),
                }
            }
            Completion::KfHistoryLoaded {
                generation,
                daily_type_id,
                result,
            } => {
                if !self.kf_is_current(generation) {
                    return;
                }
                match result {
                    Ok(history) => match kf_factor::factor_from_history(
                        &history,
                        daily_type_id,
                        self.settings.kf_same_day,
                    ) {
                        Ok(value) => self.kf_resolved(value),
                        Err(reason) => self.kf_not_found(reason),
                    },
                    Err(err) => self.kf_fetch_failed(err),
                }
            }
        }
    }

    /// 저장 전 검사를 수행하고 통과하면 페이로드를 만든다.
    pub fn validate_for_save(
        &self,
        equipment: &SelectedEquipment<'_>,
    ) -> Result<SampleResultsPayload, SaveBlocked> {
        let candidate = self.save_candidate();
        spec_range::validate_for_save(&candidate, equipment)?;
        Ok(self.payload())
    }

    /// 선택 장비를 조회해 검사한 뒤 결과를 저장한다. 매 호출마다 모든 검사를 처음부터 다시 한다.
    pub fn save<D, S>(&self, directory: &D, sink: &S) -> Result<SampleResultsPayload, SaveError>
    where
        D: EquipmentDirectory + ?Sized,
        S: SampleResultsSink + ?Sized,
    {
        let fetch = |id: Option<EquipmentId>| id.map(|id| directory.equipment(id)).transpose();
        let thermometer = fetch(self.form.thermometer_id)?;
        let hydrometer = fetch(self.form.hydrometer_id)?;
        let thermohygrometer = fetch(self.form.thermohygrometer_id)?;
        let balance = fetch(self.form.balance_id)?;
        let selected = SelectedEquipment {
            thermometer: thermometer.as_ref(),
            hydrometer: hydrometer.as_ref(),
            thermohygrometer: thermohygrometer.as_ref(),
            balance: balance.as_ref(),
        };
        let payload = self.validate_for_save(&selected)?;
        sink.save_sample_results(self.sample_id, &payload)?;
        info!(sample_id = self.sample_id, "sample results saved");
        Ok(payload)
    }

    fn recompute_all(&mut self) {
        self.recompute_api();
        self.recompute_drift();
        self.recompute_water();
        self.restart_kf();
    }

    fn recompute_api(&mut self) {
        let generation = self.api_generation.advance();
        self.queue.retain(|t| !matches!(t, Task::CorrectApi { .. }));
        self.derived.api_60f = None;
        self.derived.api_pending = false;
        self.derived.api_error = None;
        let form = &self.form;
        match evaluate_api_gate(
            &form.temp_obs_start,
            &form.temp_obs_end,
            &form.temp_unit,
            &form.lectura_api,
        ) {
            ApiGate::Incomplete => {}
            ApiGate::SpreadExceeded { diff_f } => {
                self.derived.api_error = Some(FieldError::TemperatureSpread { diff_f });
            }
            ApiGate::Ready(request) => {
                self.derived.api_pending = true;
                self.queue.push_back(Task::CorrectApi {
                    generation,
                    request,
                });
            }
        }
    }

    fn recompute_drift(&mut self) {
        let form = &self.form;
        let check = check_lab_drift(
            &form.temp_obs_start,
            &form.temp_obs_end,
            &form.temp_unit,
            &form.lab_temperature,
            &form.lab_temperature_unit,
        );
        self.derived.lab_drift_error = match check {
            DriftCheck::Exceeded { diff_f } => Some(FieldError::LabTemperatureDrift { diff_f }),
            DriftCheck::Within { .. } | DriftCheck::Incomplete => None,
        };
    }

    fn recompute_water(&mut self) {
        let form = &self.form;
        self.derived.percent_water = water_content::compute_water_percent(
            &form.water_volume_consumed,
            &form.water_volume_unit,
            &form.kf_factor_avg,
            &form.water_sample_weight,
            &form.water_sample_weight_unit,
        );
    }

    fn restart_kf(&mut self) {
        let generation = self.kf_generation.advance();
        self.queue.retain(|t| matches!(t, Task::CorrectApi { .. }));
        self.derived.kf_factor = KfResolution::Idle;
        if let Some(equipment_id) = self.form.kf_equipment_id {
            debug!(equipment_id, generation, "resolving mean KF factor");
            self.derived.kf_factor = KfResolution::Resolving;
            self.queue.push_back(Task::LoadKfEquipment {
                generation,
                equipment_id,
            });
        }
    }

    fn kf_is_current(&self, generation: u64) -> bool {
        let current = self.kf_generation.is_current(generation);
        if !current {
            debug!(generation, "discarding stale KF cascade response");
        }
        current
    }

    fn kf_resolved(&mut self, value: f64) {
        self.derived.kf_factor = KfResolution::Resolved(value);
        if kf_factor::prefill_factor(&mut self.form.kf_factor_avg, value) {
            info!(value, "prefilled mean KF factor");
            self.recompute_water();
        }
    }

    fn kf_not_found(&mut self, reason: KfNotFound) {
        info!(?reason, "mean KF factor not available");
        self.derived.kf_factor = KfResolution::NotFound(reason);
    }

    fn kf_fetch_failed(&mut self, err: CollaboratorError) {
        warn!(error = %err, "mean KF factor lookup failed");
        self.derived.kf_factor = KfResolution::FetchError(err);
    }

    /// 저장 검사 대상. 온도차와 실험실 편차는 캐시된 필드 오류가 아니라 현재 폼으로 다시 판정한다.
    fn save_candidate(&self) -> SaveCandidate {
        let form = &self.form;
        let spread = evaluate_api_gate(
            &form.temp_obs_start,
            &form.temp_obs_end,
            &form.temp_unit,
            &form.lectura_api,
        );
        let drift = check_lab_drift(
            &form.temp_obs_start,
            &form.temp_obs_end,
            &form.temp_unit,
            &form.lab_temperature,
            &form.lab_temperature_unit,
        );
        SaveCandidate {
            temp_obs_start: temperature_reading(&form.temp_obs_start, &form.temp_unit),
            temp_obs_end: temperature_reading(&form.temp_obs_end, &form.temp_unit),
            lectura_api: parse_number(&form.lectura_api),
            relative_humidity: parse_number(&form.relative_humidity),
            lab_temperature: temperature_reading(
                &form.lab_temperature,
                &form.lab_temperature_unit,
            ),
            water_sample_weight: form.sample_weight(),
            temperature_spread_pending: matches!(spread, ApiGate::SpreadExceeded { .. }),
            lab_drift_pending: drift.is_exceeded(),
        }
    }

    fn payload(&self) -> SampleResultsPayload {
        let form = &self.form;
        let temperature_tag =
            |s: &str| parse_temperature_unit(s).ok().map(|u| u.tag().to_string());
        SampleResultsPayload {
            temp_obs_start: parse_number(&form.temp_obs_start),
            temp_obs_end: parse_number(&form.temp_obs_end),
            temp_unit: temperature_tag(&form.temp_unit),
            lectura_api: parse_number(&form.lectura_api),
            api_60f: self.derived.api_60f,
            lab_temperature: parse_number(&form.lab_temperature),
            lab_temperature_unit: temperature_tag(&form.lab_temperature_unit),
            relative_humidity: parse_number(&form.relative_humidity),
            water_sample_weight: parse_number(&form.water_sample_weight),
            water_sample_weight_unit: parse_mass_unit(&form.water_sample_weight_unit)
                .ok()
                .map(|u| u.tag().to_string()),
            water_volume_consumed: parse_number(&form.water_volume_consumed),
            water_volume_unit: parse_volume_unit(&form.water_volume_unit)
                .ok()
                .map(|u| u.tag().to_string()),
            kf_factor_avg: parse_number(&form.kf_factor_avg),
            percent_water: form.percent_water_value(),
            thermometer_id: form.thermometer_id,
            hydrometer_id: form.hydrometer_id,
            thermohygrometer_id: form.thermohygrometer_id,
            balance_id: form.balance_id,
            kf_equipment_id: form.kf_equipment_id,
        }
    }
}
