//! 시료 분석 결과 계산 코어. 단위 변환, 파생값 계산, 교차 검증, KF 팩터 조회를 라이브러리로
//! 분리하여 폼 UI와 CLI가 같은 규칙을 쓰도록 한다.

pub mod analysis;
pub mod app;
pub mod collaborator;
pub mod config;
pub mod conversion;
pub mod fixture;
pub mod i18n;
pub mod model;
pub mod pipeline;
pub mod quantity;
pub mod ui_cli;
pub mod units;
