#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use lab_sample_engine::collaborator::{
    ApiCorrection, ApiCorrectionRequest, ApiCorrectionService, CollaboratorError,
    EquipmentDirectory, SampleResultsSink,
};
use lab_sample_engine::model::{
    Equipment, EquipmentId, EquipmentMeasureSpec, EquipmentTypeId, SampleId,
    SampleResultsPayload, VerificationRecord, VerificationTypeDefinition,
};
use lab_sample_engine::quantity::Measure;

pub fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.9} got {actual:.9} (diff {diff:.3e}, tol {tol})"
    );
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn spec(measure: Measure, min: Option<f64>, max: Option<f64>) -> EquipmentMeasureSpec {
    EquipmentMeasureSpec {
        measure,
        min_value: min,
        max_value: max,
    }
}

pub fn equipment(id: EquipmentId, type_id: EquipmentTypeId, specs: Vec<EquipmentMeasureSpec>) -> Equipment {
    Equipment {
        id,
        name: format!("equipment-{id}"),
        equipment_type_id: type_id,
        measure_specs: specs,
    }
}

pub fn verification_type(id: u64, frequency_days: u32) -> VerificationTypeDefinition {
    VerificationTypeDefinition {
        id,
        name: format!("every {frequency_days} days"),
        frequency_days,
    }
}

pub fn record(id: u64, type_id: u64, verified_at: DateTime<Utc>, notes: &str) -> VerificationRecord {
    VerificationRecord {
        id,
        verification_type_id: type_id,
        verified_at,
        notes: notes.to_string(),
        mean_factor: None,
    }
}

/// 메모리 기반 장비 디렉터리. 호출 횟수를 기록하고 실패를 주입할 수 있다.
#[derive(Default)]
pub struct FakeDirectory {
    pub equipment: HashMap<EquipmentId, Equipment>,
    pub types: HashMap<EquipmentTypeId, Vec<VerificationTypeDefinition>>,
    pub history: HashMap<EquipmentId, Vec<VerificationRecord>>,
    pub failing_history: HashSet<EquipmentId>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeDirectory {
    pub fn with_equipment(mut self, e: Equipment) -> Self {
        self.equipment.insert(e.id, e);
        self
    }

    pub fn with_types(mut self, type_id: EquipmentTypeId, types: Vec<VerificationTypeDefinition>) -> Self {
        self.types.insert(type_id, types);
        self
    }

    pub fn with_history(mut self, equipment_id: EquipmentId, history: Vec<VerificationRecord>) -> Self {
        self.history.insert(equipment_id, history);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl EquipmentDirectory for FakeDirectory {
    fn equipment(&self, id: EquipmentId) -> Result<Equipment, CollaboratorError> {
        self.calls.borrow_mut().push(format!("equipment/{id}"));
        self.equipment
            .get(&id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("equipment {id}")))
    }

    fn verification_types(
        &self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<Vec<VerificationTypeDefinition>, CollaboratorError> {
        self.calls
            .borrow_mut()
            .push(format!("types/{equipment_type_id}"));
        Ok(self.types.get(&equipment_type_id).cloned().unwrap_or_default())
    }

    fn verification_history(
        &self,
        equipment_id: EquipmentId,
    ) -> Result<Vec<VerificationRecord>, CollaboratorError> {
        self.calls.borrow_mut().push(format!("history/{equipment_id}"));
        if self.failing_history.contains(&equipment_id) {
            return Err(CollaboratorError::Unavailable("history service down".into()));
        }
        Ok(self.history.get(&equipment_id).cloned().unwrap_or_default())
    }
}

/// 요청을 기록하고 단순 선형 보정값을 돌려주는 가짜 ASTM 서비스.
#[derive(Default)]
pub struct RecordingCorrection {
    pub requests: RefCell<Vec<ApiCorrectionRequest>>,
    pub reject_with: Option<String>,
}

impl ApiCorrectionService for RecordingCorrection {
    fn correct_to_60f(
        &self,
        request: ApiCorrectionRequest,
    ) -> Result<ApiCorrection, CollaboratorError> {
        self.requests.borrow_mut().push(request);
        if let Some(detail) = &self.reject_with {
            return Err(CollaboratorError::Rejected(detail.clone()));
        }
        Ok(ApiCorrection {
            api_60f: request.raw_api_reading - 0.05 * (request.avg_temperature_fahrenheit - 60.0),
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub saved: RefCell<Vec<(SampleId, SampleResultsPayload)>>,
}

impl SampleResultsSink for RecordingSink {
    fn save_sample_results(
        &self,
        sample_id: SampleId,
        payload: &SampleResultsPayload,
    ) -> Result<(), CollaboratorError> {
        self.saved.borrow_mut().push((sample_id, payload.clone()));
        Ok(())
    }
}
