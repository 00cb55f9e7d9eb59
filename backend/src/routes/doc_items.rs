//! # 문서 항목(DocItem) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/doc-item/{docId}`              → 항목 추가
//! - `PUT    /api/v1/doc-item/{docId}/bulk-update`  → 여러 항목에 같은 추가 데이터 적용
//! - `PUT    /api/v1/doc-item/{docId}/{docItemId}`  → 항목 하나의 추가 데이터 교체
//! - `DELETE /api/v1/doc-item/{docId}`              → 본문의 ID 목록 삭제
//!
//! `bulk-update`는 고정 경로라서 `{docItemId}`보다 먼저 매칭됩니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::AppJson,
    models::*,
    routes::{ensure_id, AppState},
    services,
};

pub async fn create_doc_item(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    AppJson(req): AppJson<CreateDocItemRequest>,
) -> Result<(StatusCode, ApiResponse<DocItem>), AppError> {
    ensure_id(&doc_id, "Invalid docId.")?;
    let item = services::doc_items::create_doc_item(&state.pool, &doc_id, &req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(item).with_message("Doc item created successfully"),
    ))
}

/// `PUT /doc-item/{docId}/{docItemId}`
///
/// 요청 본문: `{ additionalData, expectedVersion? }`. 추가 데이터는 병합되지 않고 교체됩니다.
pub async fn update_doc_item(
    State(state): State<AppState>,
    Path((doc_id, doc_item_id)): Path<(String, String)>,
    AppJson(req): AppJson<UpdateDocItemRequest>,
) -> Result<ApiResponse<DocItem>, AppError> {
    ensure_id(&doc_id, "Invalid Doc Id.")?;
    ensure_id(&doc_item_id, "Invalid Doc Item Id.")?;

    let item = services::doc_items::update_doc_item(
        &state.pool,
        &doc_id,
        &doc_item_id,
        &req.additional_data,
        req.expected_version,
    )
    .await?;

    Ok(ApiResponse::success(item).with_message("Doc item updated successfully"))
}

/// `PUT /doc-item/{docId}/bulk-update`
///
/// 일부 항목이 실패해도 200이며, 실패한 ID는 `failedItems`와 메시지에 담깁니다.
pub async fn bulk_update_doc_items(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    AppJson(req): AppJson<BulkUpdateDocItemsRequest>,
) -> Result<ApiResponse<BulkUpdateOutcome>, AppError> {
    ensure_id(&doc_id, "Invalid docId.")?;

    let outcome = services::doc_items::bulk_update_doc_items(
        &state.pool,
        &doc_id,
        &req.doc_item_ids,
        &req.additional_data,
    )
    .await?;

    let message = if outcome.failed_items.is_empty() {
        "All items updated successfully".to_string()
    } else {
        format!(
            "Some items failed to update: {}",
            outcome.failed_items.join(", ")
        )
    };
    Ok(ApiResponse::success(outcome).with_message(message))
}

/// `DELETE /doc-item/{docId}` — 요청 본문: `{ itemDocIds }`
pub async fn delete_doc_items(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    AppJson(req): AppJson<DeleteDocItemsRequest>,
) -> Result<ApiResponse<Value>, AppError> {
    ensure_id(&doc_id, "Invalid docId.")?;

    let deleted =
        services::doc_items::delete_doc_items(&state.pool, &doc_id, &req.item_doc_ids).await?;

    Ok(ApiResponse::success(json!({ "deletedCount": deleted }))
        .with_message(format!("Delete Doc Items: {deleted} items deleted successfully")))
}
