//! TOML 파일 기반 협력자 구현. 서버 없이 CLI에서 계산 흐름을 재현할 때 사용한다.
//!
//! ```toml
//! [[equipment]]
//! id = 7
//! name = "KF titrator"
//! equipment_type_id = 3
//!
//! [[verification_types]]
//! equipment_type_id = 3
//! id = 11
//! frequency_days = 1
//!
//! [[verifications]]
//! equipment_id = 7
//! id = 1
//! verification_type_id = 11
//! verified_at = "2026-10-18T08:00:00Z"
//! notes = "Factor promedio: 1,2345"
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::collaborator::{
    ApiCorrection, ApiCorrectionRequest, ApiCorrectionService, CollaboratorError,
    EquipmentDirectory, SampleResultsSink,
};
use crate::model::{
    Equipment, EquipmentId, EquipmentTypeId, SampleId, SampleResultsPayload, VerificationRecord,
    VerificationTypeDefinition, VerificationTypeId,
};

/// 데이터 파일 로드 오류.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("데이터 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("데이터 파일 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureVerificationType {
    equipment_type_id: EquipmentTypeId,
    id: VerificationTypeId,
    #[serde(default)]
    name: String,
    frequency_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureVerification {
    equipment_id: EquipmentId,
    id: u64,
    verification_type_id: VerificationTypeId,
    verified_at: DateTime<Utc>,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    mean_factor: Option<f64>,
}

/// 장비/검증 데이터 묶음.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabFixture {
    equipment: Vec<Equipment>,
    verification_types: Vec<FixtureVerificationType>,
    verifications: Vec<FixtureVerification>,
}

impl LabFixture {
    pub fn from_toml(src: &str) -> Result<Self, FixtureError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

impl EquipmentDirectory for LabFixture {
    fn equipment(&self, id: EquipmentId) -> Result<Equipment, CollaboratorError> {
        self.equipment
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("equipment {id}")))
    }

    fn verification_types(
        &self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<Vec<VerificationTypeDefinition>, CollaboratorError> {
        Ok(self
            .verification_types
            .iter()
            .filter(|t| t.equipment_type_id == equipment_type_id)
            .map(|t| VerificationTypeDefinition {
                id: t.id,
                name: t.name.clone(),
                frequency_days: t.frequency_days,
            })
            .collect())
    }

    fn verification_history(
        &self,
        equipment_id: EquipmentId,
    ) -> Result<Vec<VerificationRecord>, CollaboratorError> {
        Ok(self
            .verifications
            .iter()
            .filter(|v| v.equipment_id == equipment_id)
            .map(|v| VerificationRecord {
                id: v.id,
                verification_type_id: v.verification_type_id,
                verified_at: v.verified_at,
                notes: v.notes.clone(),
                mean_factor: v.mean_factor,
            })
            .collect())
    }
}

/// 오프라인에서는 ASTM 보정 서비스를 쓸 수 없다.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineApiCorrection;

impl ApiCorrectionService for OfflineApiCorrection {
    fn correct_to_60f(
        &self,
        _request: ApiCorrectionRequest,
    ) -> Result<ApiCorrection, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "ASTM correction service is not reachable offline".into(),
        ))
    }
}

/// 저장 요청을 로그로만 남긴다.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

impl SampleResultsSink for DryRunSink {
    fn save_sample_results(
        &self,
        sample_id: SampleId,
        payload: &SampleResultsPayload,
    ) -> Result<(), CollaboratorError> {
        info!(sample_id, percent_water = ?payload.percent_water, "dry run: payload not sent");
        Ok(())
    }
}
