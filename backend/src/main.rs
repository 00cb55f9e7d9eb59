//! # docgrid 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 카탈로그와 스프레드시트 클라이언트로 애플리케이션 상태 구성
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

mod catalog;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use catalog::Catalog;
use config::Config;
use routes::AppState;
use services::google_sheets::GoogleSheetsClient;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 docgrid, tower_http, axum 모듈을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docgrid=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting docgrid server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    if config.google_access_token.is_none() {
        tracing::warn!(
            "GOOGLE_ACCESS_TOKEN is not set; spreadsheet routes require the X-Google-Access-Token header"
        );
    }
    let state = AppState {
        pool: pool.clone(),
        catalog: Arc::new(Catalog::standard()),
        sheets: Arc::new(GoogleSheetsClient::new(
            config.sheets_api_url.clone(),
            config.drive_api_url.clone(),
        )),
        google_access_token: config.google_access_token.clone(),
        import_tab: config.import_tab.clone(),
    };

    // ── 7단계: 라우터와 미들웨어 ──
    // 개발 환경 기준으로 모든 출처/메서드/헤더를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙합니다.
    // SPA이므로 찾을 수 없는 경로는 index.html로 돌려보냅니다.
    let frontend_dist = Path::new("../frontend/dist");
    let app: Router = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from ../frontend/dist");
        let serve_dir = ServeDir::new("../frontend/dist")
            .not_found_service(ServeFile::new("../frontend/dist/index.html"));

        routes::app(state)
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        routes::app(state)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    };

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
