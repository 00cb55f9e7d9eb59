//! # 요청 추출기(Extractor)
//!
//! - `app_json`: 파싱 실패도 공통 응답 봉투로 돌려주는 JSON 본문 추출기
//! - `google_token`: Google 접근 토큰 추출기

pub mod app_json;
pub mod google_token;

pub use app_json::AppJson;
pub use google_token::GoogleToken;
