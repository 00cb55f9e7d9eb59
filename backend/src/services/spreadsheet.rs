//! # 스프레드시트 연동 서비스
//!
//! - `export_doc`: 문서를 새 스프레드시트로 내보내고 서식을 입힙니다.
//! - `download_sheet`: 스프레드시트를 xlsx/csv/pdf 등으로 내려받습니다.
//! - `update_sheet`: 스프레드시트에 임의의 행을 씁니다.
//! - `load_sheet`: 스프레드시트 탭을 읽어 원본 컬렉션에 업서트합니다.

use sqlx::SqlitePool;

use crate::catalog::Catalog;
use crate::db;
use crate::error::AppError;
use crate::models::{LoadSummary, SourceCollection, UpdateSheetRequest};
use crate::services::docs;
use crate::services::google_sheets::{ByteStream, SpreadsheetProvider};
use crate::services::sheet_rows::{doc_items_to_rows, rows_to_entries, style_requests, to_internal_fields};

const DEFAULT_RANGE: &str = "A1";
const DEFAULT_FORMAT: &str = "xlsx";

pub struct Download {
    pub mime_type: String,
    pub filename: String,
    pub stream: ByteStream,
}

/// 스프레드시트 ID는 영문/숫자/`-`/`_`만 허용합니다.
pub fn is_valid_sheet_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn require_sheet_id(id: &str) -> Result<(), AppError> {
    if is_valid_sheet_id(id) {
        Ok(())
    } else {
        Err(AppError::bad_request("Invalid googleSheetId."))
    }
}

/// 다운로드 형식 → MIME 타입. 모르는 값은 MIME 타입 그대로 사용합니다.
pub fn export_mime(format: &str) -> &str {
    match format {
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        other => other,
    }
}

/// 탭 이름을 A1 표기의 시트 범위로 감쌉니다 (`'탭'`, 내부 작은따옴표는 두 번).
fn tab_range(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// 문서를 새 스프레드시트로 내보내고 스프레드시트 ID를 반환합니다.
pub async fn export_doc(
    pool: &SqlitePool,
    sheets: &dyn SpreadsheetProvider,
    token: &str,
    doc_id: &str,
) -> Result<String, AppError> {
    let doc = docs::get_doc(pool, doc_id).await?;
    let rows = doc_items_to_rows(&doc.doc_items);

    let created = sheets.create_spreadsheet(token, &doc.doc.title).await?;
    sheets
        .update_values(token, &created.spreadsheet_id, DEFAULT_RANGE, &rows)
        .await?;

    let requests = style_requests(created.sheet_id, &rows);
    if !requests.is_empty() {
        sheets
            .batch_update(token, &created.spreadsheet_id, requests)
            .await?;
    }

    tracing::info!(
        doc_id,
        spreadsheet_id = %created.spreadsheet_id,
        rows = rows.len(),
        "Exported doc to spreadsheet"
    );
    Ok(created.spreadsheet_id)
}

pub async fn download_sheet(
    sheets: &dyn SpreadsheetProvider,
    token: &str,
    sheet_id: &str,
    format: Option<&str>,
) -> Result<Download, AppError> {
    require_sheet_id(sheet_id)?;

    let format = format
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FORMAT);
    // 헤더 값으로 그대로 들어가므로 안전한 문자만 허용
    if !format
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/.+-".contains(c))
    {
        return Err(AppError::bad_request("Invalid format."));
    }

    let mime_type = export_mime(format).to_string();
    let stream = sheets.export_file(token, sheet_id, &mime_type).await?;
    tracing::debug!(sheet_id, mime_type = %mime_type, "Streaming spreadsheet export");

    Ok(Download {
        mime_type,
        filename: format!("document.{format}"),
        stream,
    })
}

pub async fn update_sheet(
    sheets: &dyn SpreadsheetProvider,
    token: &str,
    sheet_id: &str,
    req: &UpdateSheetRequest,
) -> Result<(), AppError> {
    require_sheet_id(sheet_id)?;
    if req.values.is_empty() {
        return Err(AppError::bad_request("values array is required."));
    }

    let range = req
        .range
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_RANGE);
    sheets.update_values(token, sheet_id, range, &req.values).await?;
    Ok(())
}

/// 스프레드시트 탭을 읽어 컬렉션에 업서트합니다.
///
/// 헤더는 카탈로그의 현지화된 헤더 표로 내부 필드명이 되고, 모르는 헤더는 무시됩니다.
/// 고유 키가 비어 있는 행은 건너뜁니다.
pub async fn load_sheet(
    pool: &SqlitePool,
    catalog: &Catalog,
    sheets: &dyn SpreadsheetProvider,
    token: &str,
    sheet_id: &str,
    tab: &str,
    collection: SourceCollection,
) -> Result<LoadSummary, AppError> {
    require_sheet_id(sheet_id)?;
    let layout = catalog.layout(collection).ok_or_else(|| {
        AppError::Internal(format!("No layout configured for {}", collection.as_str()))
    })?;

    let rows = sheets.get_values(token, sheet_id, &tab_range(tab)).await?;
    let entries = rows_to_entries(&rows);
    if entries.is_empty() {
        return Err(AppError::not_found("Missing Data in Google Sheet."));
    }

    let mut summary = LoadSummary::default();
    for entry in &entries {
        let fields = to_internal_fields(entry, layout);
        let has_key = fields
            .get(&layout.key_field)
            .is_some_and(|v| !v.trim().is_empty());
        if has_key && db::upsert_fields(pool, collection, &fields).await? {
            summary.upserted += 1;
        } else {
            summary.skipped += 1;
        }
    }

    tracing::info!(
        sheet_id,
        tab,
        collection = collection.as_str(),
        upserted = summary.upserted,
        skipped = summary.skipped,
        "Loaded spreadsheet into collection"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;

    use super::*;
    use crate::config::DEFAULT_IMPORT_TAB;
    use crate::db::soldiers::list_soldiers;
    use crate::db::test_pool;
    use crate::services::fake_sheets::FakeSheets;
    use crate::services::testing::{create_roster, seed_soldiers};
    use crate::models::KeyValue;

    #[tokio::test]
    async fn export_writes_rows_and_styles() {
        let pool = test_pool().await;
        let soldiers = seed_soldiers(&pool, 2).await;
        let doc = create_roster(&pool, vec![KeyValue::new("status", "pending")]).await;
        let fake = FakeSheets::default();

        let id = export_doc(&pool, &fake, "token", &doc.id).await.unwrap();
        assert_eq!(id, "sheet-1");
        assert_eq!(*fake.created.lock().await, vec!["Roster".to_string()]);

        let values = fake.values.lock().await;
        let rows = &values[&("sheet-1".to_string(), "A1".to_string())];
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "_id");
        assert_eq!(rows[0][1], "firstName");
        for soldier in &soldiers {
            assert!(rows[1..].iter().any(|row| row[0] == soldier.id));
        }
        assert_eq!(rows[0].last().unwrap(), "status");
        assert_eq!(rows[1].last().unwrap(), "pending");

        let batches = fake.batches.lock().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1.len(), 2);
        assert_eq!(batches[0].1[0]["updateCells"]["range"]["sheetId"], 7);
    }

    #[tokio::test]
    async fn export_of_unknown_doc_is_not_found() {
        let pool = test_pool().await;
        let fake = FakeSheets::default();

        let err = export_doc(&pool, &fake, "token", "000000000000000000000000")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fake.created.lock().await.is_empty());
    }

    #[tokio::test]
    async fn provider_failures_surface_as_upstream() {
        let pool = test_pool().await;
        seed_soldiers(&pool, 1).await;
        let doc = create_roster(&pool, vec![]).await;
        let fake = FakeSheets::failing(403);

        let err = export_doc(&pool, &fake, "token", &doc.id).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn download_maps_formats() {
        let fake = FakeSheets::default();

        let download = download_sheet(&fake, "token", "abc", Some("csv")).await.unwrap();
        assert_eq!(download.mime_type, "text/csv");
        assert_eq!(download.filename, "document.csv");
        let body: Vec<u8> = download
            .stream
            .map_ok(|chunk| chunk.to_vec())
            .try_concat()
            .await
            .unwrap();
        assert_eq!(body, b"export:abc:text/csv");

        let download = download_sheet(&fake, "token", "abc", None).await.unwrap();
        assert_eq!(download.filename, "document.xlsx");

        let download = download_sheet(&fake, "token", "abc", Some("application/zip"))
            .await
            .unwrap();
        assert_eq!(download.mime_type, "application/zip");
    }

    #[tokio::test]
    async fn download_rejects_bad_ids_and_formats() {
        let fake = FakeSheets::default();

        let err = download_sheet(&fake, "token", "a b", None).await.err().unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = download_sheet(&fake, "token", "abc", Some("x\r\ny"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_defaults_to_first_cell() {
        let fake = FakeSheets::default();
        let req = UpdateSheetRequest {
            range: None,
            values: vec![vec!["a".to_string(), "b".to_string()]],
        };
        update_sheet(&fake, "token", "abc", &req).await.unwrap();

        let values = fake.values.lock().await;
        assert!(values.contains_key(&("abc".to_string(), "A1".to_string())));

        let empty = UpdateSheetRequest {
            range: Some("B2".to_string()),
            values: vec![],
        };
        drop(values);
        let err = update_sheet(&fake, "token", "abc", &empty).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn load_upserts_by_personal_number() {
        let pool = test_pool().await;
        seed_soldiers(&pool, 1).await;
        let fake = FakeSheets::default();
        fake.seed(
            "abc",
            &tab_range(DEFAULT_IMPORT_TAB),
            vec![
                vec!["שם פרטי", "שם משפחה", "מספר אישי", "פלוגה", "לא ידוע"],
                vec!["Avi", "Cohen", "100", "B", "x"],
                vec!["Dana", "Levi", "900", "C", "y"],
                vec!["No", "Key", "", "C", "z"],
            ],
        )
        .await;

        let summary = load_sheet(
            &pool,
            &Catalog::standard(),
            &fake,
            "token",
            "abc",
            DEFAULT_IMPORT_TAB,
            SourceCollection::Soldiers,
        )
        .await
        .unwrap();
        assert_eq!(summary, LoadSummary { upserted: 2, skipped: 1 });

        let soldiers = list_soldiers(&pool).await.unwrap();
        assert_eq!(soldiers.len(), 2);
        let updated = soldiers.iter().find(|s| s.personal_number == "100").unwrap();
        assert_eq!(updated.first_name, "Avi");
        assert_eq!(updated.company, "B");
        assert_eq!(updated.phone, "050-000-0000");
        assert_eq!(updated.department, "1");
    }

    #[tokio::test]
    async fn load_keeps_fields_missing_from_sheet() {
        let pool = test_pool().await;
        seed_soldiers(&pool, 1).await;
        let fake = FakeSheets::default();
        fake.seed(
            "abc",
            &tab_range(DEFAULT_IMPORT_TAB),
            vec![vec!["מספר אישי", "פלוגה"], vec!["100", "B"]],
        )
        .await;

        load_sheet(
            &pool,
            &Catalog::standard(),
            &fake,
            "token",
            "abc",
            DEFAULT_IMPORT_TAB,
            SourceCollection::Soldiers,
        )
        .await
        .unwrap();

        let soldiers = list_soldiers(&pool).await.unwrap();
        assert_eq!(soldiers.len(), 1);
        let soldier = &soldiers[0];
        assert_eq!(soldier.company, "B");
        assert_eq!(soldier.first_name, "First0");
        assert_eq!(soldier.last_name, "Last0");
        assert_eq!(soldier.phone, "050-000-0000");
        assert_eq!(soldier.equipment.as_deref(), Some("M16"));
    }

    #[tokio::test]
    async fn empty_sheet_is_not_found() {
        let pool = test_pool().await;
        let fake = FakeSheets::default();
        fake.seed("abc", &tab_range("tab"), vec![vec!["מספר אישי"]]).await;

        let err = load_sheet(
            &pool,
            &Catalog::standard(),
            &fake,
            "token",
            "abc",
            "tab",
            SourceCollection::Soldiers,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Missing Data in Google Sheet."));
    }

    #[test]
    fn quotes_tab_names() {
        assert_eq!(tab_range("Sheet 1"), "'Sheet 1'");
        assert_eq!(tab_range("it's"), "'it''s'");
    }
}
