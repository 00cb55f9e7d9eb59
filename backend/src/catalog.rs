//! # 원본 컬렉션 카탈로그
//!
//! 컬렉션마다 고정된 정보를 한 곳에 모은 설정 구조체입니다.
//! - 문서 생성 시 복사되는 표시용 컬럼 레이아웃 (필드 → 현지화된 헤더)
//! - 스프레드시트 가져오기에 쓰는 헤더 → 내부 필드명 매핑
//! - 가져오기 업서트의 고유 키 필드
//!
//! 서버 시작 시 `Catalog::standard()`로 한 번 만들고 `AppState`를 통해 서비스에 전달합니다.

use std::collections::HashMap;

use crate::models::{Column, SourceCollection};

/// 병사 컬렉션의 필드 순서와 헤더 이름
const SOLDIER_FIELDS: [(&str, &str); 8] = [
    ("lastName", "שם משפחה"),
    ("firstName", "שם פרטי"),
    ("personalNumber", "מספר אישי"),
    ("phone", "טלפון"),
    ("company", "פלוגה"),
    ("department", "מחלקה"),
    ("equipment", "פק\"ל"),
    ("notes", "הערות"),
];

#[derive(Debug, Clone)]
pub struct CollectionLayout {
    pub collection: SourceCollection,
    /// (내부 필드명, 헤더 이름)을 표시 순서대로
    fields: Vec<(String, String)>,
    /// 업서트 시 레코드를 식별하는 필드
    pub key_field: String,
}

impl CollectionLayout {
    /// 문서에 저장되는 컬럼 레이아웃. 모든 컬럼의 `flex`는 1입니다.
    pub fn columns(&self) -> Vec<Column> {
        self.fields
            .iter()
            .map(|(field, header)| Column {
                field: field.clone(),
                header_name: if header.is_empty() {
                    field.clone()
                } else {
                    header.clone()
                },
                flex: 1,
            })
            .collect()
    }

    /// 스프레드시트 헤더를 내부 필드명으로 바꿉니다. 모르는 헤더는 `None`.
    pub fn field_for_header(&self, header: &str) -> Option<&str> {
        let header = header.trim();
        self.fields
            .iter()
            .find(|(_, h)| h == header)
            .map(|(field, _)| field.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    layouts: HashMap<SourceCollection, CollectionLayout>,
}

impl Catalog {
    /// 지원하는 모든 컬렉션의 기본 설정
    pub fn standard() -> Self {
        let soldiers = CollectionLayout {
            collection: SourceCollection::Soldiers,
            fields: SOLDIER_FIELDS
                .iter()
                .map(|(f, h)| (f.to_string(), h.to_string()))
                .collect(),
            key_field: "personalNumber".to_string(),
        };

        let mut layouts = HashMap::new();
        layouts.insert(soldiers.collection, soldiers);
        Self { layouts }
    }

    pub fn layout(&self, collection: SourceCollection) -> Option<&CollectionLayout> {
        self.layouts.get(&collection)
    }
}
