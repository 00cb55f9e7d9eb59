//! # 데이터베이스 접근 계층 (Document Store)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `docs`: 문서(Doc) 저장/조회
//! - `doc_items`: 문서 항목(DocItem) 저장/조회/수정/삭제
//! - `soldiers`: 병사 원본 컬렉션 쿼리
//! - `sources`: 컬렉션 이름으로 원본 레코드에 접근하는 공통 입구

pub mod doc_items;
pub mod docs;
pub mod soldiers;
pub mod sources;

pub use doc_items::*;
pub use docs::*;
pub use sources::*;

use crate::error::AppError;

/// `IN (...)` 목록 하나에 바인딩하는 최대 ID 수.
/// SQLite 바인딩 변수 한도(구버전 999, 3.32 이후 32766) 아래로 유지합니다.
pub const ID_CHUNK: usize = 500;

/// 고유 인덱스 위반이면 `Conflict`로, 그 외에는 `Database` 에러로 변환합니다.
pub fn conflict_or(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message())
        }
        _ => AppError::Database(err),
    }
}

/// 마이그레이션이 적용된 인메모리 SQLite 풀.
/// 인메모리 DB는 연결마다 따로 생기므로 연결을 하나로 제한합니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}
