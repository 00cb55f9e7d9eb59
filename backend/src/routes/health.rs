//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "success", "data": { "status": "ok" } }`

use serde_json::{json, Value};

use crate::models::ApiResponse;

/// `GET /health` — 서버 상태를 확인합니다. 실패하지 않습니다.
pub async fn health_check() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "status": "ok" }))
}
