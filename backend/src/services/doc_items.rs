//! # 문서 항목(DocItem) 서비스
//!
//! 항목 단위의 생성/수정/일괄 수정/삭제와, 항목 목록에 원본 레코드를 채우는
//! `resolve_items`를 제공합니다.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::db::{self, NewDocItem};
use crate::error::AppError;
use crate::models::*;

/// 항목 목록의 원본 참조를 실제 레코드로 채웁니다.
///
/// 컬렉션별로 한 번씩만 조회합니다. 원본 레코드가 사라진 항목은
/// 실패로 처리하지 않고 참조 형태로 남긴 채 경고를 남깁니다.
pub async fn resolve_items(
    pool: &SqlitePool,
    rows: Vec<DocItemRow>,
) -> Result<Vec<DocItem>, AppError> {
    let mut wanted: HashMap<SourceCollection, Vec<String>> = HashMap::new();
    for row in &rows {
        if let Some(collection) = SourceCollection::parse(&row.database_model) {
            wanted
                .entry(collection)
                .or_default()
                .push(row.database_doc_id.clone());
        }
    }

    let mut found: HashMap<SourceCollection, HashMap<String, SourceRecord>> = HashMap::new();
    for (collection, ids) in wanted {
        found.insert(collection, db::get_records(pool, collection, &ids).await?);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let record = SourceCollection::parse(&row.database_model)
                .and_then(|c| found.get(&c))
                .and_then(|records| records.get(&row.database_doc_id).cloned());
            match record {
                Some(record) => row.into_item(SourceRef::Resolved(record)),
                None => {
                    tracing::warn!(
                        doc_item_id = %row.id,
                        source_id = %row.database_doc_id,
                        "Source record missing from {}",
                        row.database_model
                    );
                    row.into_reference()
                }
            }
        })
        .collect())
}

async fn resolve_one(pool: &SqlitePool, row: DocItemRow) -> Result<DocItem, AppError> {
    let mut items = resolve_items(pool, vec![row]).await?;
    items
        .pop()
        .ok_or(AppError::Internal("Failed to resolve doc item".to_string()))
}

/// 기존 문서에 원본 레코드 하나를 항목으로 추가합니다.
///
/// `additional_data`를 생략하면 문서의 기본값을 복사합니다.
/// 같은 원본 레코드가 이미 문서에 있으면 `Conflict`.
pub async fn create_doc_item(
    pool: &SqlitePool,
    doc_id: &str,
    req: &CreateDocItemRequest,
) -> Result<DocItem, AppError> {
    let doc = db::get_doc(pool, doc_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Doc not found for ID: {doc_id}")))?;

    let collection = SourceCollection::parse(&doc.database_model).ok_or_else(|| {
        AppError::Internal(format!("Doc {} has unknown collection {}", doc.id, doc.database_model))
    })?;

    let source_id = req.database_doc_id.trim();
    if !is_valid_id(source_id) {
        return Err(AppError::bad_request("Invalid databaseDocId."));
    }
    if db::get_record(pool, collection, source_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Source record not found for ID: {source_id}"
        )));
    }

    let item = NewDocItem {
        id: new_id(),
        doc_id: doc.id.clone(),
        database_model: collection.as_str().to_string(),
        database_doc_id: source_id.to_string(),
        additional_data: req
            .additional_data
            .clone()
            .unwrap_or_else(|| doc.additional_data.0.clone()),
    };

    let row = db::insert_doc_item(pool, &item).await?;
    tracing::info!(doc_id = %doc.id, doc_item_id = %row.id, "Created doc item");
    Ok(row.into_reference())
}

/// 항목 하나의 `additional_data`를 통째로 교체합니다.
///
/// `expected_version`을 주었는데 저장된 버전과 다르면 `Conflict`.
pub async fn update_doc_item(
    pool: &SqlitePool,
    doc_id: &str,
    doc_item_id: &str,
    additional_data: &[KeyValue],
    expected_version: Option<i64>,
) -> Result<DocItem, AppError> {
    if additional_data.is_empty() {
        return Err(AppError::bad_request("Additional data is required"));
    }

    let updated =
        db::replace_additional_data(pool, doc_id, doc_item_id, additional_data, expected_version)
            .await?;

    let row = match updated {
        Some(row) => row,
        None => {
            // 버전 불일치와 존재하지 않는 항목을 구분
            if expected_version.is_some()
                && db::get_doc_item(pool, doc_id, doc_item_id).await?.is_some()
            {
                return Err(AppError::Conflict(format!(
                    "Doc item {doc_item_id} was modified by another request"
                )));
            }
            return Err(AppError::not_found(format!(
                "Doc item not found for ID: {doc_item_id}"
            )));
        }
    };

    tracing::debug!(doc_id, doc_item_id, version = row.version, "Updated doc item");
    resolve_one(pool, row).await
}

/// 여러 항목에 같은 `additional_data`를 적용합니다.
///
/// 항목별로 순서대로 처리하며, 한 항목의 실패가 나머지를 막지 않습니다.
/// 결과에는 입력된 모든 ID가 성공/실패 목록 중 정확히 한 곳에 들어갑니다.
pub async fn bulk_update_doc_items(
    pool: &SqlitePool,
    doc_id: &str,
    doc_item_ids: &[String],
    additional_data: &[KeyValue],
) -> Result<BulkUpdateOutcome, AppError> {
    if doc_item_ids.is_empty() {
        return Err(AppError::bad_request("docItemIds array is required."));
    }
    if additional_data.is_empty() {
        return Err(AppError::bad_request("additionalData array is required."));
    }

    let mut outcome = BulkUpdateOutcome::default();
    for id in doc_item_ids {
        match db::replace_additional_data(pool, doc_id, id, additional_data, None).await {
            Ok(Some(row)) => outcome.updated_items.push(row.into_reference()),
            Ok(None) => {
                tracing::warn!(doc_id, doc_item_id = %id, "Bulk update: doc item not found");
                outcome.failed_items.push(id.clone());
            }
            Err(e) => {
                tracing::warn!(doc_id, doc_item_id = %id, "Bulk update failed: {}", e);
                outcome.failed_items.push(id.clone());
            }
        }
    }

    tracing::info!(
        doc_id,
        updated = outcome.updated_items.len(),
        failed = outcome.failed_items.len(),
        "Bulk updated doc items"
    );
    Ok(outcome)
}

/// 문서 범위 안의 항목들을 삭제하고 실제로 삭제된 개수를 반환합니다.
/// 없는 ID는 조용히 무시됩니다.
pub async fn delete_doc_items(
    pool: &SqlitePool,
    doc_id: &str,
    item_ids: &[String],
) -> Result<u64, AppError> {
    if item_ids.is_empty() {
        return Err(AppError::bad_request("Invalid or empty itemDocIds array."));
    }

    let deleted = db::delete_doc_items(pool, doc_id, item_ids).await?;
    tracing::info!(doc_id, requested = item_ids.len(), deleted, "Deleted doc items");
    Ok(deleted)
}
