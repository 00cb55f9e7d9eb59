//! # 스프레드시트 제공자
//!
//! 외부 스프레드시트 서비스와의 경계입니다.
//! - `SpreadsheetProvider`: 서비스 계층이 의존하는 트레이트 (테스트에서는 가짜 구현 사용)
//! - `GoogleSheetsClient`: Google Sheets v4 / Drive v3 REST API를 reqwest로 호출하는 구현
//!
//! 모든 호출은 요청마다 전달되는 OAuth 접근 토큰을 Bearer 헤더로 붙입니다.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("request to spreadsheet service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected spreadsheet service response: {0}")]
    Malformed(String),
}

/// 내보낸 파일의 바이트 스트림
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSpreadsheet {
    pub spreadsheet_id: String,
    /// 첫 번째 시트(탭)의 숫자 ID. 서식 요청의 범위에 사용됩니다.
    pub sheet_id: i64,
}

#[async_trait]
pub trait SpreadsheetProvider: Send + Sync {
    async fn create_spreadsheet(
        &self,
        token: &str,
        title: &str,
    ) -> Result<CreatedSpreadsheet, SheetsError>;

    /// `range` 위치부터 `rows`를 원시 값(RAW)으로 씁니다.
    async fn update_values(
        &self,
        token: &str,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError>;

    async fn batch_update(
        &self,
        token: &str,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<(), SheetsError>;

    /// 범위의 값을 행 단위로 읽습니다. 빈 시트는 빈 벡터.
    async fn get_values(
        &self,
        token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsError>;

    async fn export_file(
        &self,
        token: &str,
        file_id: &str,
        mime_type: &str,
    ) -> Result<ByteStream, SheetsError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetResponse {
    spreadsheet_id: String,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct GoogleSheetsClient {
    http: reqwest::Client,
    sheets_api_url: String,
    drive_api_url: String,
}

impl GoogleSheetsClient {
    pub fn new(sheets_api_url: impl Into<String>, drive_api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            sheets_api_url: sheets_api_url.into(),
            drive_api_url: drive_api_url.into(),
        }
    }

    /// 기본 주소 뒤에 경로 조각들을 붙입니다. 각 조각은 퍼센트 인코딩됩니다.
    fn endpoint(base: &str, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = Url::parse(base)
            .map_err(|e| SheetsError::Malformed(format!("invalid base url {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Malformed(format!("base url cannot have a path: {base}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// 2xx가 아니면 응답 본문을 담아 `Status` 에러로 바꿉니다.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SheetsError::Status {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SpreadsheetProvider for GoogleSheetsClient {
    async fn create_spreadsheet(
        &self,
        token: &str,
        title: &str,
    ) -> Result<CreatedSpreadsheet, SheetsError> {
        let url = Self::endpoint(&self.sheets_api_url, &["spreadsheets"])?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .await?;
        let created: SpreadsheetResponse = check(resp).await?.json().await?;

        let sheet_id = created
            .sheets
            .first()
            .map(|s| s.properties.sheet_id)
            .unwrap_or(0);
        tracing::debug!(spreadsheet_id = %created.spreadsheet_id, sheet_id, "Created spreadsheet");

        Ok(CreatedSpreadsheet {
            spreadsheet_id: created.spreadsheet_id,
            sheet_id,
        })
    }

    async fn update_values(
        &self,
        token: &str,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let url = Self::endpoint(
            &self.sheets_api_url,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        let resp = self
            .http
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": range, "majorDimension": "ROWS", "values": rows }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn batch_update(
        &self,
        token: &str,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<(), SheetsError> {
        let target = format!("{spreadsheet_id}:batchUpdate");
        let url = Self::endpoint(&self.sheets_api_url, &["spreadsheets", &target])?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn get_values(
        &self,
        token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = Self::endpoint(
            &self.sheets_api_url,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        let range: ValueRange = check(resp).await?.json().await?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn export_file(
        &self,
        token: &str,
        file_id: &str,
        mime_type: &str,
    ) -> Result<ByteStream, SheetsError> {
        let url = Self::endpoint(&self.drive_api_url, &["files", file_id, "export"])?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("mimeType", mime_type)])
            .send()
            .await?;
        let stream = check(resp).await?.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(stream))
    }
}
