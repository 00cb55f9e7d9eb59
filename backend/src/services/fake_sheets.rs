//! 테스트용 메모리 스프레드시트 제공자

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tokio::sync::Mutex;

use super::google_sheets::{
    ByteStream, CreatedSpreadsheet, SheetsError, SpreadsheetProvider,
};

#[derive(Default)]
pub struct FakeSheets {
    /// 만든 스프레드시트의 제목 (생성 순서)
    pub created: Mutex<Vec<String>>,
    /// (스프레드시트 ID, 범위) → 행
    pub values: Mutex<HashMap<(String, String), Vec<Vec<String>>>>,
    pub batches: Mutex<Vec<(String, Vec<Value>)>>,
    pub exports: Mutex<Vec<(String, String)>>,
    /// 설정하면 모든 호출이 이 상태 코드로 실패합니다.
    pub fail_with: Option<u16>,
}

impl FakeSheets {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub async fn seed(&self, spreadsheet_id: &str, range: &str, rows: Vec<Vec<&str>>) {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.values
            .lock()
            .await
            .insert((spreadsheet_id.to_string(), range.to_string()), rows);
    }

    fn check(&self) -> Result<(), SheetsError> {
        match self.fail_with {
            Some(status) => Err(SheetsError::Status {
                status,
                body: "fake failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SpreadsheetProvider for FakeSheets {
    async fn create_spreadsheet(
        &self,
        _token: &str,
        title: &str,
    ) -> Result<CreatedSpreadsheet, SheetsError> {
        self.check()?;
        let mut created = self.created.lock().await;
        created.push(title.to_string());
        Ok(CreatedSpreadsheet {
            spreadsheet_id: format!("sheet-{}", created.len()),
            sheet_id: 7,
        })
    }

    async fn update_values(
        &self,
        _token: &str,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        self.check()?;
        self.values
            .lock()
            .await
            .insert((spreadsheet_id.to_string(), range.to_string()), rows.to_vec());
        Ok(())
    }

    async fn batch_update(
        &self,
        _token: &str,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<(), SheetsError> {
        self.check()?;
        self.batches
            .lock()
            .await
            .push((spreadsheet_id.to_string(), requests));
        Ok(())
    }

    async fn get_values(
        &self,
        _token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsError> {
        self.check()?;
        Ok(self
            .values
            .lock()
            .await
            .get(&(spreadsheet_id.to_string(), range.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn export_file(
        &self,
        _token: &str,
        file_id: &str,
        mime_type: &str,
    ) -> Result<ByteStream, SheetsError> {
        self.check()?;
        self.exports
            .lock()
            .await
            .push((file_id.to_string(), mime_type.to_string()));

        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from(format!("export:{file_id}:"))),
            Ok(Bytes::from(mime_type.to_string())),
        ];
        Ok(Box::pin(futures_util::stream::iter(chunks)))
    }
}
