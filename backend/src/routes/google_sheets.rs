//! # 스프레드시트 라우트 핸들러
//!
//! 모든 핸들러는 `GoogleToken` 추출기로 접근 토큰을 받습니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/google-sheet/{docId}`                    → 문서를 새 스프레드시트로 내보내기
//! - `PUT /api/v1/google-sheet/{sheetId}/update`           → 스프레드시트에 행 쓰기
//! - `GET /api/v1/google-sheet/{sheetId}/download?format=` → 파일로 내려받기 (스트리밍)
//! - `GET /api/v1/google-sheet/{sheetId}/load?tab=`        → 탭을 원본 컬렉션으로 가져오기

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    middleware::{AppJson, GoogleToken},
    models::*,
    routes::{ensure_id, AppState},
    services::spreadsheet,
};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoadQuery {
    pub tab: Option<String>,
    pub collection: Option<String>,
}

pub async fn export_doc(
    State(state): State<AppState>,
    GoogleToken(token): GoogleToken,
    Path(doc_id): Path<String>,
) -> Result<ApiResponse<String>, AppError> {
    ensure_id(&doc_id, "Invalid docId.")?;
    let sheet_id =
        spreadsheet::export_doc(&state.pool, state.sheets.as_ref(), &token, &doc_id).await?;
    Ok(ApiResponse::success(sheet_id))
}

pub async fn update_sheet(
    State(state): State<AppState>,
    GoogleToken(token): GoogleToken,
    Path(sheet_id): Path<String>,
    AppJson(req): AppJson<UpdateSheetRequest>,
) -> Result<ApiResponse<()>, AppError> {
    spreadsheet::update_sheet(state.sheets.as_ref(), &token, &sheet_id, &req).await?;
    Ok(ApiResponse::done("Google Sheet updated successfully."))
}

/// 제공자의 내보내기 스트림을 그대로 응답 본문으로 흘려보냅니다.
pub async fn download_sheet(
    State(state): State<AppState>,
    GoogleToken(token): GoogleToken,
    Path(sheet_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let download = spreadsheet::download_sheet(
        state.sheets.as_ref(),
        &token,
        &sheet_id,
        query.format.as_deref(),
    )
    .await?;

    let disposition = format!("attachment; filename=\"{}\"", download.filename);
    Ok((
        [
            (header::CONTENT_TYPE, download.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(download.stream),
    )
        .into_response())
}

pub async fn load_sheet(
    State(state): State<AppState>,
    GoogleToken(token): GoogleToken,
    Path(sheet_id): Path<String>,
    Query(query): Query<LoadQuery>,
) -> Result<ApiResponse<LoadSummary>, AppError> {
    let collection = match query.collection.as_deref() {
        None => SourceCollection::Soldiers,
        Some(name) => SourceCollection::parse(name)
            .ok_or_else(|| AppError::bad_request("Invalid collection database name"))?,
    };
    let tab = query
        .tab
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(state.import_tab.as_str());

    let summary = spreadsheet::load_sheet(
        &state.pool,
        &state.catalog,
        state.sheets.as_ref(),
        &token,
        &sheet_id,
        tab,
        collection,
    )
    .await?;

    let message = format!("Loaded {} rows into {}", summary.upserted, collection.as_str());
    Ok(ApiResponse::success(summary).with_message(message))
}
