//! 컬렉션 이름(`SourceCollection`)으로 원본 레코드를 다루는 공통 입구.
//! 컬렉션별 쿼리 모듈로 분기합니다.

use std::collections::HashMap;

use indexmap::IndexMap;
use sqlx::SqlitePool;

use crate::db::soldiers;
use crate::error::AppError;
use crate::models::{SoldierInput, SourceCollection, SourceRecord};

pub async fn list_records(
    pool: &SqlitePool,
    collection: SourceCollection,
) -> Result<Vec<SourceRecord>, AppError> {
    match collection {
        SourceCollection::Soldiers => Ok(soldiers::list_soldiers(pool)
            .await?
            .into_iter()
            .map(|s| s.into_record())
            .collect()),
    }
}

pub async fn get_record(
    pool: &SqlitePool,
    collection: SourceCollection,
    id: &str,
) -> Result<Option<SourceRecord>, AppError> {
    match collection {
        SourceCollection::Soldiers => Ok(soldiers::get_soldier(pool, id)
            .await?
            .map(|s| s.into_record())),
    }
}

/// ID 목록에 해당하는 레코드들을 ID → 레코드 맵으로 반환합니다.
/// 없는 ID는 맵에 포함되지 않습니다.
pub async fn get_records(
    pool: &SqlitePool,
    collection: SourceCollection,
    ids: &[String],
) -> Result<HashMap<String, SourceRecord>, AppError> {
    let records = match collection {
        SourceCollection::Soldiers => soldiers::get_soldiers_by_ids(pool, ids)
            .await?
            .into_iter()
            .map(|s| s.into_record()),
    };

    Ok(records.map(|r| (r.id.clone(), r)).collect())
}

/// 내부 필드명 기준의 맵 하나를 컬렉션에 업서트합니다.
///
/// 고유 키가 비어 있어 건너뛴 경우 `Ok(false)`.
pub async fn upsert_fields(
    pool: &SqlitePool,
    collection: SourceCollection,
    fields: &IndexMap<String, String>,
) -> Result<bool, AppError> {
    match collection {
        SourceCollection::Soldiers => match SoldierInput::from_fields(fields) {
            Some(input) => {
                soldiers::upsert_soldier(pool, &input).await?;
                Ok(true)
            }
            None => Ok(false),
        },
    }
}
