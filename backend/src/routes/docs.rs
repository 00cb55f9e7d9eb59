//! # 문서(Doc) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/doc/{docId}` → 문서와 항목 목록 조회
//! - `POST /api/v1/doc`         → 원본 컬렉션으로 새 문서 생성

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    middleware::AppJson,
    models::*,
    routes::{ensure_id, AppState},
    services,
};

/// `GET /doc/{docId}` — 원본 레코드가 채워진 항목과 함께 문서를 조회합니다.
pub async fn get_doc(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<ApiResponse<DocWithItems>, AppError> {
    ensure_id(&doc_id, "Invalid docId.")?;
    let doc = services::docs::get_doc(&state.pool, &doc_id).await?;
    Ok(ApiResponse::success(doc))
}

/// `POST /doc` — 새 문서를 생성합니다.
///
/// 요청 본문: `{ title, description, databaseModel, additionalData? }`
pub async fn create_doc(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateDocRequest>,
) -> Result<(StatusCode, ApiResponse<Doc>), AppError> {
    let doc = services::docs::create_doc(&state.pool, &state.catalog, &req).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(doc).with_message("Doc created successfully"),
    ))
}
