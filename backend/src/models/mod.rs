//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체들을 정의합니다.
//! - `api`: 모든 응답이 공유하는 `{status, data?, message?}` 봉투(envelope)
//! - `doc`: 문서(Doc)와 컬럼/키-값 구조체
//! - `doc_item`: 문서 항목(DocItem)과 요청 본문들
//! - `ids`: 24자리 16진수 식별자 생성/검증
//! - `sheet`: 스프레드시트 쓰기 요청과 가져오기 결과
//! - `source`: 원본 컬렉션(병사 데이터베이스) 레코드

pub mod api;
pub mod doc;
pub mod doc_item;
pub mod ids;
pub mod sheet;
pub mod source;

pub use api::*;
pub use doc::*;
pub use doc_item::*;
pub use ids::*;
pub use sheet::*;
pub use source::*;
