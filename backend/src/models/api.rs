//! # API 응답 봉투
//!
//! 성공이든 실패든 모든 응답 본문은 같은 모양입니다:
//! `{ "status": "success" | "error", "data"?: ..., "message"?: "..." }`

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// `data` 없이 메시지만 담은 성공 응답
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Success,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}

// 상태 코드는 핸들러가 (StatusCode, ApiResponse) 튜플로 정합니다.
impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omits_absent_fields() {
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(ok, json!({ "status": "success", "data": 1 }));

        let err = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(err, json!({ "status": "error", "message": "nope" }));

        let done = serde_json::to_value(ApiResponse::done("saved")).unwrap();
        assert_eq!(done, json!({ "status": "success", "message": "saved" }));
    }
}
