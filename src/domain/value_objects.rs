use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// 書籍ID - カタログが採番する連番
///
/// 一度採番したIDは削除後も再利用しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出記録ID - 台帳の各エントリの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorrowRecordId(Uuid);

impl BorrowRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BorrowRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BorrowRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 利用者名 - 利用者ディレクトリの自然キー
///
/// 不変条件：前後の空白を除いて空でないこと。
/// 比較は大文字小文字を区別する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUserName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 空でない文字列フィールドを取り出す
///
/// 前後の空白は取り除く。空になった場合は`err`を返す。
pub(crate) fn non_empty(value: &str, err: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_ordering_follows_value() {
        assert!(BookId::new(1) < BookId::new(2));
        assert_eq!(BookId::new(7).value(), 7);
        assert_eq!(BookId::new(7).to_string(), "7");
    }

    #[test]
    fn test_borrow_record_id_creation() {
        let id1 = BorrowRecordId::new();
        let id2 = BorrowRecordId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_borrow_record_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BorrowRecordId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_user_name_is_trimmed() {
        let name = UserName::new("  alice ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_user_name_rejects_blank() {
        assert_eq!(UserName::new("").unwrap_err(), ValidationError::EmptyUserName);
        assert_eq!(UserName::new("   ").unwrap_err(), ValidationError::EmptyUserName);
    }

    #[test]
    fn test_user_name_is_case_sensitive() {
        assert_ne!(UserName::new("Alice").unwrap(), UserName::new("alice").unwrap());
    }
}
