//! # 문서 항목(DocItem) 쿼리 모듈
//!
//! `doc_items` 테이블의 CRUD 함수입니다.
//! 모든 조회/수정/삭제는 `doc_id`로 범위가 제한됩니다. 다른 문서의 항목 ID를 넘기면
//! 찾지 못한 것으로 처리됩니다.
//!
//! `(doc_id, database_doc_id)` 조합은 고유하며, 위반 시 `Conflict`를 반환합니다.

use crate::db::{conflict_or, ID_CHUNK};
use crate::error::AppError;
use crate::models::*;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// 다중 행 INSERT 한 번에 넣는 최대 행 수 (행당 바인딩 5개)
const INSERT_CHUNK: usize = 100;

#[derive(Debug, Clone)]
pub struct NewDocItem {
    pub id: String,
    pub doc_id: String,
    pub database_model: String,
    pub database_doc_id: String,
    pub additional_data: Vec<KeyValue>,
}

/// 여러 항목을 다중 행 INSERT로 삽입합니다.
///
/// 문서 생성 트랜잭션 안에서 호출되므로 연결을 받습니다.
pub async fn insert_doc_items(
    conn: &mut SqliteConnection,
    items: &[NewDocItem],
) -> Result<(), AppError> {
    for chunk in items.chunks(INSERT_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO doc_items (id, doc_id, database_model, database_doc_id, additional_data) ",
        );
        builder.push_values(chunk, |mut row, item| {
            row.push_bind(&item.id)
                .push_bind(&item.doc_id)
                .push_bind(&item.database_model)
                .push_bind(&item.database_doc_id)
                .push_bind(Json(&item.additional_data));
        });

        builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| conflict_or(e, || "Duplicate source record in doc".to_string()))?;
    }

    Ok(())
}

/// 항목 하나를 삽입하고, 저장된 행을 반환합니다.
pub async fn insert_doc_item(pool: &SqlitePool, item: &NewDocItem) -> Result<DocItemRow, AppError> {
    sqlx::query(
        r#"
        INSERT INTO doc_items (id, doc_id, database_model, database_doc_id, additional_data)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.doc_id)
    .bind(&item.database_model)
    .bind(&item.database_doc_id)
    .bind(Json(&item.additional_data))
    .execute(pool)
    .await
    .map_err(|e| {
        conflict_or(e, || {
            format!(
                "Source record {} is already part of doc {}",
                item.database_doc_id, item.doc_id
            )
        })
    })?;

    get_doc_item(pool, &item.doc_id, &item.id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created doc item".to_string()))
}

/// 문서 범위 안에서 항목 하나를 조회합니다.
pub async fn get_doc_item(
    pool: &SqlitePool,
    doc_id: &str,
    id: &str,
) -> Result<Option<DocItemRow>, AppError> {
    let item = sqlx::query_as::<_, DocItemRow>(
        r#"
        SELECT id, doc_id, database_model, database_doc_id, additional_data, version,
               created_at, updated_at
        FROM doc_items
        WHERE id = ? AND doc_id = ?
        "#,
    )
    .bind(id)
    .bind(doc_id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// 문서의 모든 항목을 생성 순서대로 조회합니다.
pub async fn list_doc_items(pool: &SqlitePool, doc_id: &str) -> Result<Vec<DocItemRow>, AppError> {
    let items = sqlx::query_as::<_, DocItemRow>(
        r#"
        SELECT id, doc_id, database_model, database_doc_id, additional_data, version,
               created_at, updated_at
        FROM doc_items
        WHERE doc_id = ?
        ORDER BY id
        "#,
    )
    .bind(doc_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// 항목의 `additional_data`를 통째로 교체합니다 (병합하지 않음).
///
/// 교체할 때마다 `version`이 1씩 증가합니다.
/// `expected_version`을 주면 저장된 버전이 같을 때만 교체합니다.
///
/// # 반환값
/// - `Ok(Some(row))`: 교체 후의 행
/// - `Ok(None)`: 일치하는 항목이 없거나 버전이 달라 아무 행도 바뀌지 않음
pub async fn replace_additional_data(
    pool: &SqlitePool,
    doc_id: &str,
    id: &str,
    additional_data: &[KeyValue],
    expected_version: Option<i64>,
) -> Result<Option<DocItemRow>, AppError> {
    let mut sql = String::from(
        r#"
        UPDATE doc_items
        SET additional_data = ?, version = version + 1,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND doc_id = ?"#,
    );
    if expected_version.is_some() {
        sql.push_str(" AND version = ?");
    }

    let mut query = sqlx::query(&sql)
        .bind(Json(additional_data))
        .bind(id)
        .bind(doc_id);
    if let Some(version) = expected_version {
        query = query.bind(version);
    }

    let result = query.execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_doc_item(pool, doc_id, id).await
}

/// 문서 범위 안에서 주어진 ID의 항목들을 삭제하고, 실제로 삭제된 개수를 반환합니다.
///
/// ID는 `ID_CHUNK`개씩 나눠 지우며, 전체가 한 트랜잭션입니다.
pub async fn delete_doc_items(
    pool: &SqlitePool,
    doc_id: &str,
    ids: &[String],
) -> Result<u64, AppError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut deleted = 0;

    for chunk in ids.chunks(ID_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM doc_items WHERE doc_id = ");
        builder.push_bind(doc_id);
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        deleted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::services::testing::{create_roster, seed_soldiers};

    #[tokio::test]
    async fn deletes_more_ids_than_one_chunk() {
        let pool = test_pool().await;
        seed_soldiers(&pool, ID_CHUNK + 20).await;
        let doc = create_roster(&pool, vec![]).await;

        let mut ids: Vec<String> = list_doc_items(&pool, &doc.id)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids.len(), ID_CHUNK + 20);
        let kept = ids.pop().unwrap();

        let deleted = delete_doc_items(&pool, &doc.id, &ids).await.unwrap();
        assert_eq!(deleted, (ID_CHUNK + 19) as u64);

        let left = list_doc_items(&pool, &doc.id).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, kept);
    }
}
