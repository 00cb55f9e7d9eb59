use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json`과 같지만 거절(rejection) 타입이 `AppError`입니다.
///
/// 잘못된 JSON이나 타입이 맞지 않는 본문은 `{status: "error", message}` 형태의
/// 400 응답이 됩니다.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
