use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::DocItem;

/// 문서와 문서 항목에 붙는 자유 형식 키-값 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 데이터 그리드의 표시용 컬럼. 문서 생성 시점에 고정됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub field: String,
    pub header_name: String,
    pub flex: u32,
}

/// `docs` 테이블의 한 행
///
/// `columns`와 `additional_data`는 JSON 텍스트로 저장되며,
/// `sqlx::types::Json`이 직렬화/역직렬화를 맡습니다 (응답에서는 투명하게 보입니다).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Doc {
    pub id: String,
    pub title: String,
    pub description: String,
    pub database_model: String,
    pub columns: Json<Vec<Column>>,
    pub additional_data: Json<Vec<KeyValue>>,
    pub created_at: String,
    pub updated_at: String,
}

/// `GET /doc/{docId}` 응답: 문서 필드 + 항목 목록
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocWithItems {
    #[serde(flatten)]
    pub doc: Doc,
    pub doc_items: Vec<DocItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub database_model: String,
    pub additional_data: Option<Vec<KeyValue>>,
}
