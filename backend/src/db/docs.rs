//! # 문서(Doc) 쿼리 모듈
//!
//! `docs` 테이블의 삽입/조회 함수입니다.
//! 문서 생성은 항목 삽입과 한 트랜잭션으로 묶이므로,
//! 삽입 함수는 풀 대신 연결(`&mut SqliteConnection`)을 받습니다.

use crate::db::conflict_or;
use crate::error::AppError;
use crate::models::*;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

pub struct NewDoc<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub database_model: &'a str,
    pub columns: &'a [Column],
    pub additional_data: &'a [KeyValue],
}

/// 새 문서를 삽입합니다. 같은 제목이 이미 있으면 `Conflict`.
pub async fn insert_doc(conn: &mut SqliteConnection, doc: &NewDoc<'_>) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO docs (id, title, description, database_model, columns, additional_data)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(doc.id)
    .bind(doc.title)
    .bind(doc.description)
    .bind(doc.database_model)
    .bind(Json(doc.columns))
    .bind(Json(doc.additional_data))
    .execute(&mut *conn)
    .await
    .map_err(|e| conflict_or(e, || format!("A doc titled '{}' already exists", doc.title)))?;

    Ok(())
}

/// ID로 문서를 조회합니다. 없으면 `Ok(None)`.
pub async fn get_doc(pool: &SqlitePool, id: &str) -> Result<Option<Doc>, AppError> {
    let doc = sqlx::query_as::<_, Doc>(
        r#"
        SELECT id, title, description, database_model, columns, additional_data,
               created_at, updated_at
        FROM docs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doc)
}
