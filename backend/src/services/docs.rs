//! # 문서(Doc) 서비스
//!
//! - `create_doc`: 원본 컬렉션의 모든 레코드를 스냅샷하여 문서와 항목들을 만듭니다.
//! - `get_doc`: 문서와 (원본 레코드가 채워진) 항목 목록을 조회합니다.

use sqlx::SqlitePool;

use crate::catalog::Catalog;
use crate::db::{self, NewDoc, NewDocItem};
use crate::error::AppError;
use crate::models::*;
use crate::services::doc_items::resolve_items;

/// 새 문서를 만듭니다.
///
/// 컬럼 레이아웃은 원본 스키마가 아니라 카탈로그의 고정 설정에서 가져오고,
/// 원본 레코드마다 항목을 하나씩 만들어 문서의 기본 `additional_data`를 복사합니다.
/// 문서 삽입과 항목 삽입은 한 트랜잭션이라 중간에 실패하면 아무것도 남지 않습니다.
///
/// # 에러
/// - `BadRequest`: 제목/설명 누락, 지원하지 않는 컬렉션 이름
/// - `NotFound`: 원본 컬렉션에 레코드가 하나도 없음
/// - `Conflict`: 같은 제목의 문서가 이미 있음
pub async fn create_doc(
    pool: &SqlitePool,
    catalog: &Catalog,
    req: &CreateDocRequest,
) -> Result<Doc, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    let description = req.description.trim();
    if description.is_empty() {
        return Err(AppError::bad_request("Description is required"));
    }

    let collection = SourceCollection::parse(&req.database_model)
        .ok_or_else(|| AppError::bad_request("Invalid collection database name"))?;
    let layout = catalog.layout(collection).ok_or_else(|| {
        AppError::Internal(format!("No layout configured for {}", collection.as_str()))
    })?;

    let records = db::list_records(pool, collection).await?;
    if records.is_empty() {
        return Err(AppError::not_found(format!(
            "No items found for {}",
            collection.as_str()
        )));
    }

    let id = new_id();
    let columns = layout.columns();
    let additional_data = req.additional_data.clone().unwrap_or_default();

    let items: Vec<NewDocItem> = records
        .iter()
        .map(|record| NewDocItem {
            id: new_id(),
            doc_id: id.clone(),
            database_model: collection.as_str().to_string(),
            database_doc_id: record.id.clone(),
            additional_data: additional_data.clone(),
        })
        .collect();

    let mut tx = pool.begin().await?;
    db::insert_doc(
        &mut *tx,
        &NewDoc {
            id: &id,
            title,
            description,
            database_model: collection.as_str(),
            columns: &columns,
            additional_data: &additional_data,
        },
    )
    .await?;
    db::insert_doc_items(&mut *tx, &items).await?;
    tx.commit().await?;

    tracing::info!(
        doc_id = %id,
        collection = collection.as_str(),
        items = items.len(),
        "Created doc '{}'",
        title
    );

    db::get_doc(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created doc".to_string()))
}

/// 문서와 항목 목록을 조회합니다.
///
/// 항목이 하나도 없는 문서는 빈 결과가 아니라 `NotFound`로 취급합니다.
pub async fn get_doc(pool: &SqlitePool, doc_id: &str) -> Result<DocWithItems, AppError> {
    let doc = db::get_doc(pool, doc_id)
        .await?
        .ok_or_else(|| AppError::not_found("Doc not found"))?;

    let rows = db::list_doc_items(pool, doc_id).await?;
    if rows.is_empty() {
        return Err(AppError::not_found("No items found for doc"));
    }

    let doc_items = resolve_items(pool, rows).await?;
    Ok(DocWithItems { doc, doc_items })
}
