//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형: 검증/없음/충돌/외부 서비스/DB 에러를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 `{ "status": "error", "message": ... }` 응답으로 변환

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ApiResponse;
use crate::services::google_sheets::SheetsError;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 문서, 항목, 원본 레코드를 찾을 수 없음 (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 식별자 또는 필수 필드 누락 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 고유 인덱스 위반 또는 버전 불일치 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Google 접근 토큰 없음 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 스프레드시트 제공자 실패 (HTTP 500, 상세 내용은 로그에만)
    #[error("Upstream error: {0}")]
    Upstream(#[from] SheetsError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// `?` 연산자로 sqlx::Error가 자동 변환됩니다.
    /// 고유 인덱스 위반은 `db::conflict_or` 로 먼저 `Conflict`가 됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }
}

// `AppJson` 추출기의 거절(rejection) 타입입니다.
// 본문 파싱 실패도 같은 봉투 형식의 400 응답이 됩니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    /// 내부 에러(Upstream, Database, Internal)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Upstream(ref e) => {
                tracing::error!("Spreadsheet provider error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The spreadsheet service request failed".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
        };

        (status, ApiResponse::error(message)).into_response()
    }
}
