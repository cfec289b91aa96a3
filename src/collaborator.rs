//! 서버 쪽 협력자에 대한 포트(trait) 정의.
//!
//! 계산 코어는 전송 방식을 모른다. 구현체는 HTTP 클라이언트일 수도, 테스트용 메모리 가짜일 수도 있다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Equipment, EquipmentId, EquipmentTypeId, SampleId, SampleResultsPayload, VerificationRecord,
    VerificationTypeDefinition,
};

/// 협력자 호출 실패. 메시지는 사용자에게 그대로 노출될 수 있다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// 대상이 존재하지 않음
    #[error("not found: {0}")]
    NotFound(String),
    /// 서버가 입력을 거부함 (상세 메시지 포함)
    #[error("{0}")]
    Rejected(String),
    /// 네트워크/서비스 장애
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl CollaboratorError {
    /// 실패 사유 상세. API 60°F 필드 오류 메시지로 쓰인다.
    pub fn detail(&self) -> &str {
        match self {
            CollaboratorError::NotFound(d)
            | CollaboratorError::Rejected(d)
            | CollaboratorError::Unavailable(d) => d,
        }
    }
}

/// ASTM 보정 서비스로 보내는 요청.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiCorrectionRequest {
    pub avg_temperature_fahrenheit: f64,
    pub raw_api_reading: f64,
}

/// ASTM 보정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiCorrection {
    pub api_60f: f64,
}

/// 장비 디렉터리와 검증 이력 조회.
pub trait EquipmentDirectory {
    fn equipment(&self, id: EquipmentId) -> Result<Equipment, CollaboratorError>;

    fn verification_types(
        &self,
        equipment_type_id: EquipmentTypeId,
    ) -> Result<Vec<VerificationTypeDefinition>, CollaboratorError>;

    fn verification_history(
        &self,
        equipment_id: EquipmentId,
    ) -> Result<Vec<VerificationRecord>, CollaboratorError>;
}

/// 관측 API 값을 60°F 기준으로 보정하는 서비스.
pub trait ApiCorrectionService {
    fn correct_to_60f(
        &self,
        request: ApiCorrectionRequest,
    ) -> Result<ApiCorrection, CollaboratorError>;
}

/// 분석 결과 저장.
pub trait SampleResultsSink {
    fn save_sample_results(
        &self,
        sample_id: SampleId,
        payload: &SampleResultsPayload,
    ) -> Result<(), CollaboratorError>;
}
