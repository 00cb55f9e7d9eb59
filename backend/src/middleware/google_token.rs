use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::routes::AppState;

/// 요청별 Google 접근 토큰을 담는 헤더
pub const GOOGLE_TOKEN_HEADER: &str = "x-google-access-token";

/// 스프레드시트 라우트에서 쓰는 Google OAuth 접근 토큰.
///
/// `X-Google-Access-Token` 헤더를 먼저 보고, 없으면 설정의 `GOOGLE_ACCESS_TOKEN`을 씁니다.
/// 둘 다 없으면 401.
#[derive(Debug, Clone)]
pub struct GoogleToken(pub String);

impl FromRequestParts<AppState> for GoogleToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(GOOGLE_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        from_header
            .or_else(|| state.google_access_token.clone())
            .map(GoogleToken)
            .ok_or_else(|| AppError::Unauthorized("Google access token is required".to_string()))
    }
}
