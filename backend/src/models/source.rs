//! # 원본 컬렉션 모델
//!
//! 문서 항목(DocItem)이 참조하는 원본 레코드를 정의합니다.
//! 현재 지원하는 컬렉션은 병사 데이터베이스(`database-soldiers`) 하나이며,
//! 새 컬렉션은 `SourceCollection`에 variant를 추가하는 것으로 시작합니다.

use indexmap::IndexMap;
use serde::Serialize;

/// 지원하는 원본 컬렉션 이름의 열거형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCollection {
    Soldiers,
}

impl SourceCollection {
    pub const ALL: [SourceCollection; 1] = [SourceCollection::Soldiers];

    pub const fn as_str(self) -> &'static str {
        match self {
            SourceCollection::Soldiers => "database-soldiers",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// 컬렉션에 관계없이 다루는 원본 레코드.
///
/// `fields`는 스키마 순서를 유지하며, 값이 없는 선택 필드는 키 자체가 빠집니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

/// `soldiers` 테이블의 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Soldier {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub personal_number: String,
    pub phone: String,
    pub company: String,
    pub department: String,
    pub equipment: Option<String>,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Soldier {
    pub fn into_record(self) -> SourceRecord {
        let mut fields = IndexMap::new();
        fields.insert("firstName".to_string(), self.first_name);
        fields.insert("lastName".to_string(), self.last_name);
        fields.insert("personalNumber".to_string(), self.personal_number);
        fields.insert("phone".to_string(), self.phone);
        fields.insert("company".to_string(), self.company);
        fields.insert("department".to_string(), self.department);
        if let Some(equipment) = self.equipment {
            fields.insert("equipment".to_string(), equipment);
        }
        fields.insert("notes".to_string(), self.notes);
        SourceRecord {
            id: self.id,
            fields,
        }
    }
}

/// 병사 레코드 업서트(upsert) 입력. `personal_number`가 고유 키입니다.
///
/// 나머지 필드의 `None`은 "입력에 해당 컬럼이 없음"을 뜻합니다.
/// 새 레코드에는 빈 값으로 들어가고, 기존 레코드에서는 그 컬럼을 건드리지 않습니다.
/// `equipment`는 컬럼이 있지만 비어 있으면 `Some("")`이며, 저장 시 NULL이 됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoldierInput {
    pub personal_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub equipment: Option<String>,
    pub notes: Option<String>,
}

impl SoldierInput {
    /// 내부 필드명(camelCase) 기준의 맵에서 입력을 만듭니다.
    /// 개인번호가 비어 있으면 `None`.
    pub fn from_fields(fields: &IndexMap<String, String>) -> Option<Self> {
        let get = |key: &str| fields.get(key).map(|v| v.trim().to_string());

        let personal_number = get("personalNumber").unwrap_or_default();
        if personal_number.is_empty() {
            return None;
        }

        Some(Self {
            personal_number,
            first_name: get("firstName"),
            last_name: get("lastName"),
            phone: get("phone"),
            company: get("company"),
            department: get("department"),
            equipment: get("equipment"),
            notes: get("notes"),
        })
    }

    /// 저장할 장비 값. 비어 있으면 NULL.
    pub fn equipment_value(&self) -> Option<&str> {
        self.equipment.as_deref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_known_collections() {
        assert_eq!(
            SourceCollection::parse("database-soldiers"),
            Some(SourceCollection::Soldiers)
        );
        assert_eq!(SourceCollection::parse("database-tanks"), None);
    }

    #[test]
    fn soldier_input_requires_personal_number() {
        let mut fields = IndexMap::new();
        fields.insert("firstName".to_string(), "Dana".to_string());
        assert!(SoldierInput::from_fields(&fields).is_none());

        fields.insert("personalNumber".to_string(), " 1234567 ".to_string());
        fields.insert("equipment".to_string(), "".to_string());
        let input = SoldierInput::from_fields(&fields).unwrap();
        assert_eq!(input.personal_number, "1234567");
        assert_eq!(input.first_name.as_deref(), Some("Dana"));
        assert_eq!(input.equipment.as_deref(), Some(""));
        assert_eq!(input.equipment_value(), None);
    }

    #[test]
    fn absent_columns_stay_unset() {
        let mut fields = IndexMap::new();
        fields.insert("personalNumber".to_string(), "100".to_string());
        fields.insert("company".to_string(), "B".to_string());

        let input = SoldierInput::from_fields(&fields).unwrap();
        assert_eq!(input.company.as_deref(), Some("B"));
        assert_eq!(input.first_name, None);
        assert_eq!(input.phone, None);
        assert_eq!(input.equipment, None);
    }

    #[test]
    fn record_skips_missing_equipment() {
        let soldier = Soldier {
            id: "aaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            first_name: "Dana".to_string(),
            last_name: "Levi".to_string(),
            personal_number: "1".to_string(),
            phone: "050".to_string(),
            company: "A".to_string(),
            department: "1".to_string(),
            equipment: None,
            notes: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let record = soldier.into_record();
        assert!(!record.fields.contains_key("equipment"));
        assert_eq!(record.fields.get_index(0).map(|(k, _)| k.as_str()), Some("firstName"));
    }
}
