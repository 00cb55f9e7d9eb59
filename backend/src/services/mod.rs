//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 계층 사이의 비즈니스 로직입니다.
//! - `docs`: 문서 생성(원본 컬렉션 스냅샷)과 조회
//! - `doc_items`: 문서 항목 생성/수정/일괄 수정/삭제
//! - `sheet_rows`: 문서 항목 ↔ 표 형식 행 변환 (순수 함수)
//! - `spreadsheet`: 외부 스프레드시트 내보내기/가져오기/다운로드
//! - `google_sheets`: 외부 스프레드시트 제공자 트레이트와 Google API 구현

pub mod doc_items;
pub mod docs;
pub mod google_sheets;
pub mod sheet_rows;
pub mod spreadsheet;

#[cfg(test)]
pub mod fake_sheets;
