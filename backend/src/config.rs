//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소와 포트
//! - `GOOGLE_SHEETS_API_URL`, `GOOGLE_DRIVE_API_URL`: Google API 기본 주소
//! - `GOOGLE_ACCESS_TOKEN`: 요청 헤더에 토큰이 없을 때 쓰는 기본 토큰 (선택)
//! - `SHEET_IMPORT_TAB`: 스프레드시트 가져오기의 기본 탭 이름

use std::env;

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_IMPORT_TAB: &str = "תע\"מ 2024";

/// 애플리케이션 전체 설정을 담는 구조체
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/docgrid.db?mode=rwc")
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub sheets_api_url: String,
    pub drive_api_url: String,
    pub google_access_token: Option<String>,
    pub import_tab: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`이 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있습니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            sheets_api_url: env::var("GOOGLE_SHEETS_API_URL")
                .unwrap_or_else(|_| DEFAULT_SHEETS_API_URL.to_string()),
            drive_api_url: env::var("GOOGLE_DRIVE_API_URL")
                .unwrap_or_else(|_| DEFAULT_DRIVE_API_URL.to_string()),
            // 빈 문자열은 설정하지 않은 것으로 취급
            google_access_token: env::var("GOOGLE_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            import_tab: env::var("SHEET_IMPORT_TAB")
                .unwrap_or_else(|_| DEFAULT_IMPORT_TAB.to_string()),
        })
    }
}
