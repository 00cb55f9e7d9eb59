use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{KeyValue, SourceRecord};

/// 항목이 가리키는 원본 레코드.
///
/// 조회 경로에 따라 ID 참조만 있거나, 원본 레코드가 채워져 있습니다.
/// 직렬화 결과: `{"kind": "reference", "value": "<id>"}` 또는
/// `{"kind": "resolved", "value": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceRef {
    Reference(String),
    Resolved(SourceRecord),
}

impl SourceRef {
    pub fn record(&self) -> Option<&SourceRecord> {
        match self {
            SourceRef::Reference(_) => None,
            SourceRef::Resolved(record) => Some(record),
        }
    }
}

/// `doc_items` 테이블의 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocItemRow {
    pub id: String,
    pub doc_id: String,
    pub database_model: String,
    pub database_doc_id: String,
    pub additional_data: Json<Vec<KeyValue>>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl DocItemRow {
    /// 원본 레코드를 조회하지 않고 참조만 담아 변환합니다.
    pub fn into_reference(self) -> DocItem {
        let data = SourceRef::Reference(self.database_doc_id.clone());
        self.into_item(data)
    }

    pub fn into_item(self, data: SourceRef) -> DocItem {
        DocItem {
            id: self.id,
            doc_id: self.doc_id,
            database_model: self.database_model,
            database_doc_id: self.database_doc_id,
            data,
            additional_data: self.additional_data.0,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 문서의 한 행(row): 원본 레코드 참조 + 확장 키-값 데이터
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocItem {
    pub id: String,
    pub doc_id: String,
    pub database_model: String,
    pub database_doc_id: String,
    pub data: SourceRef,
    pub additional_data: Vec<KeyValue>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocItemRequest {
    #[serde(default)]
    pub database_doc_id: String,
    /// 생략하면 부모 문서의 기본 additionalData를 복사합니다.
    pub additional_data: Option<Vec<KeyValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocItemRequest {
    #[serde(default)]
    pub additional_data: Vec<KeyValue>,
    /// 지정하면 저장된 버전과 다를 때 409로 거절합니다.
    pub expected_version: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateDocItemsRequest {
    #[serde(default)]
    pub doc_item_ids: Vec<String>,
    #[serde(default)]
    pub additional_data: Vec<KeyValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocItemsRequest {
    #[serde(default)]
    pub item_doc_ids: Vec<String>,
}

/// 일괄 수정 결과. 입력된 모든 ID는 두 목록 중 정확히 한 곳에 나타납니다.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateOutcome {
    pub updated_items: Vec<DocItem>,
    pub failed_items: Vec<String>,
}
