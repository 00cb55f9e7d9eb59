//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//! 모든 응답 본문은 `{status, data?, message?}` 봉투 형식입니다.
//!
//! 각 하위 모듈:
//! - `docs`: 문서 생성/조회
//! - `doc_items`: 문서 항목 추가/수정/일괄 수정/삭제
//! - `google_sheets`: 스프레드시트 내보내기/쓰기/다운로드/가져오기
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod doc_items;
pub mod docs;
pub mod google_sheets;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::is_valid_id;
use crate::services::google_sheets::SpreadsheetProvider;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 복제 비용이 작도록 무거운 값은 `Arc`로 공유합니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub catalog: Arc<Catalog>,
    pub sheets: Arc<dyn SpreadsheetProvider>,
    /// 요청 헤더에 토큰이 없을 때 쓰는 기본 Google 접근 토큰
    pub google_access_token: Option<String>,
    /// 스프레드시트 가져오기의 기본 탭 이름
    pub import_tab: String,
}

/// 경로의 ID가 24자리 16진수가 아니면 주어진 메시지로 400을 반환합니다.
pub fn ensure_id(id: &str, message: &str) -> Result<(), AppError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(AppError::bad_request(message))
    }
}

/// `/api/v1` 아래의 전체 API 라우터.
///
/// CORS, 요청 로깅, 정적 파일 서빙은 `main`에서 이 위에 얹습니다.
pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/doc", post(docs::create_doc))
        .route("/doc/{docId}", get(docs::get_doc))
        .route(
            "/doc-item/{docId}",
            post(doc_items::create_doc_item).delete(doc_items::delete_doc_items),
        )
        .route(
            "/doc-item/{docId}/bulk-update",
            put(doc_items::bulk_update_doc_items),
        )
        .route(
            "/doc-item/{docId}/{docItemId}",
            put(doc_items::update_doc_item),
        )
        // 같은 위치의 경로 파라미터는 이름이 같아야 하므로 `{id}`로 통일
        .route("/google-sheet/{id}", get(google_sheets::export_doc))
        .route("/google-sheet/{id}/update", put(google_sheets::update_sheet))
        .route(
            "/google-sheet/{id}/download",
            get(google_sheets::download_sheet),
        )
        .route("/google-sheet/{id}/load", get(google_sheets::load_sheet))
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}
