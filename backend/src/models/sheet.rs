use serde::{Deserialize, Serialize};

/// 스프레드시트에 임의의 행을 쓰는 요청 본문
#[derive(Debug, Deserialize)]
pub struct UpdateSheetRequest {
    /// 생략하면 "A1"
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// 스프레드시트 가져오기 결과
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub upserted: usize,
    pub skipped: usize,
}
