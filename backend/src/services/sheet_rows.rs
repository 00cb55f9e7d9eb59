//! # 표 형식 변환
//!
//! 문서 항목 ↔ 스프레드시트 행(`Vec<Vec<String>>`) 변환과 내보내기 서식 요청 생성.
//! 모두 I/O 없는 순수 함수입니다.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Value};

use crate::catalog::CollectionLayout;
use crate::models::DocItem;

/// 헤더 행 + 데이터 행
pub type Rows = Vec<Vec<String>>;

/// 원본 레코드 ID 컬럼의 헤더. 가져오기 시에는 모르는 헤더로 버려집니다.
pub const SOURCE_ID_HEADER: &str = "_id";

/// 문서 항목들을 헤더 행과 항목별 데이터 행으로 바꿉니다.
///
/// 헤더는 모든 항목의 원본 필드 키와 `additional_data` 키의 합집합이며,
/// 처음 등장한 순서를 따릅니다. 원본 레코드가 있는 항목의 `_id` 컬럼에는 레코드 ID가 들어갑니다.
/// 값은 원본 레코드를 먼저 보고, 없으면 `additional_data`, 둘 다 없으면 빈 문자열입니다.
pub fn doc_items_to_rows(items: &[DocItem]) -> Rows {
    let mut headers: IndexSet<String> = IndexSet::new();
    for item in items {
        match item.data.record() {
            Some(record) => {
                headers.insert(SOURCE_ID_HEADER.to_string());
                headers.extend(record.fields.keys().cloned());
            }
            None => tracing::warn!(
                doc_item_id = %item.id,
                "Exporting doc item without its source record"
            ),
        }
        headers.extend(item.additional_data.iter().map(|kv| kv.key.clone()));
    }

    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.push(headers.iter().cloned().collect());

    for item in items {
        // 같은 키가 여러 번 있으면 마지막 값
        let extra: HashMap<&str, &str> = item
            .additional_data
            .iter()
            .map(|kv| (kv.key.as_str(), kv.value.as_str()))
            .collect();

        let row = headers
            .iter()
            .map(|key| {
                let record = item.data.record();
                let from_record = if key == SOURCE_ID_HEADER {
                    record.map(|r| r.id.as_str())
                } else {
                    record.and_then(|r| r.fields.get(key)).map(String::as_str)
                };
                from_record
                    .or_else(|| extra.get(key.as_str()).copied())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        rows.push(row);
    }

    rows
}

/// `doc_items_to_rows`의 역방향: 첫 행을 헤더로 삼아 나머지 행을 헤더 → 값 맵으로 바꿉니다.
///
/// 뒤쪽 빈 셀이 잘린 짧은 행은 빈 문자열로 채우고, 헤더보다 긴 셀은 버립니다.
/// 모든 셀이 빈 행은 건너뜁니다.
pub fn rows_to_entries(rows: &[Vec<String>]) -> Vec<IndexMap<String, String>> {
    let Some((headers, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// 현지화된 헤더 키를 내부 필드명으로 바꿉니다. 모르는 헤더는 버립니다.
pub fn to_internal_fields(
    entry: &IndexMap<String, String>,
    layout: &CollectionLayout,
) -> IndexMap<String, String> {
    entry
        .iter()
        .filter_map(|(header, value)| {
            layout
                .field_for_header(header)
                .map(|field| (field.to_string(), value.clone()))
        })
        .collect()
}

fn solid_borders() -> Value {
    let edge = json!({ "style": "SOLID", "color": { "red": 0, "green": 0, "blue": 0 } });
    json!({ "top": edge, "bottom": edge, "left": edge, "right": edge })
}

fn update_cells(
    sheet_id: i64,
    start_row: usize,
    rows: &[Vec<String>],
    width: usize,
    format: &Value,
    fields: &str,
) -> Value {
    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            let values: Vec<Value> = row
                .iter()
                .map(|cell| {
                    json!({
                        "userEnteredFormat": format,
                        "userEnteredValue": { "stringValue": cell },
                    })
                })
                .collect();
            json!({ "values": values })
        })
        .collect();

    json!({
        "updateCells": {
            "range": {
                "sheetId": sheet_id,
                "startRowIndex": start_row,
                "endRowIndex": start_row + rows.len(),
                "startColumnIndex": 0,
                "endColumnIndex": width,
            },
            "rows": rows,
            "fields": fields,
        }
    })
}

/// 내보낸 시트의 서식 요청.
///
/// 헤더 행: 연녹색 배경, 굵게, 왼쪽→오른쪽 텍스트, 오른쪽 정렬, 실선 테두리.
/// 데이터 행: 오른쪽→왼쪽 텍스트, 오른쪽 정렬, 실선 테두리.
/// 데이터 행이 없으면 헤더 요청만, 행 자체가 없으면 빈 목록.
pub fn style_requests(sheet_id: i64, rows: &[Vec<String>]) -> Vec<Value> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let width = header.len();

    let header_format = json!({
        "backgroundColor": { "red": 0.8509804, "green": 0.91764706, "blue": 0.827451 },
        "textFormat": { "fontSize": 11, "bold": true },
        "textDirection": "LEFT_TO_RIGHT",
        "horizontalAlignment": "RIGHT",
        "borders": solid_borders(),
    });
    let row_format = json!({
        "textFormat": { "fontSize": 11 },
        "textDirection": "RIGHT_TO_LEFT",
        "horizontalAlignment": "RIGHT",
        "borders": solid_borders(),
    });

    let mut requests = vec![update_cells(
        sheet_id,
        0,
        std::slice::from_ref(header),
        width,
        &header_format,
        "userEnteredFormat(backgroundColor,textFormat,borders,horizontalAlignment,textDirection)",
    )];
    if !data.is_empty() {
        requests.push(update_cells(
            sheet_id,
            1,
            data,
            width,
            &row_format,
            "userEnteredFormat(textFormat,borders,horizontalAlignment,textDirection)",
        ));
    }
    requests
}
