//! 문서 데이터베이스 스타일의 식별자 (24자리 16진수).

/// 새 식별자를 만듭니다.
///
/// UUIDv7의 앞 12바이트(밀리초 타임스탬프 + 카운터)를 16진수로 표현하므로
/// 생성 순서대로 정렬됩니다.
pub fn new_id() -> String {
    let uuid = uuid::Uuid::now_v7();
    uuid.as_bytes()[..12]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// 경로 파라미터로 받은 식별자가 올바른 형식인지 확인합니다.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed_and_ordered() {
        let first = new_id();
        let second = new_id();
        assert!(is_valid_id(&first));
        assert!(is_valid_id(&second));
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(is_valid_id("000000000000000000000000"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("bulk-update"));
        assert!(!is_valid_id("00000000000000000000000"));
        assert!(!is_valid_id("00000000000000000000000g"));
    }
}
