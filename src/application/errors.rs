use crate::domain::{BookId, BorrowRecordId, InvariantError, UserName, ValidationError};
use crate::ports::MultipleOpenRecords;
use thiserror::Error;

/// エラーの分類
///
/// API層でのステータスコードの決定に使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力値の不備（再試行しても同じ結果）
    Validation,
    /// 参照先が存在しない
    NotFound,
    /// 現在の状態と衝突する
    Conflict,
    /// 想定外の障害（ストレージ障害、不変条件違反）
    Internal,
}

/// 図書館アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LibraryApplicationError {
    /// 入力値のエラー
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 書籍が存在しない
    #[error("Book {0} not found")]
    BookNotFound(BookId),

    /// 利用者が存在しない
    #[error("User '{0}' not found")]
    UserNotFound(UserName),

    /// 貸出記録が存在しない（返却済みを含む）
    #[error("Borrow record {0} not found")]
    RecordNotFound(BorrowRecordId),

    /// ISBNが他の書籍と重複している
    #[error("A book with ISBN '{0}' already exists")]
    DuplicateIsbn(String),

    /// 利用者名が登録済み
    #[error("User '{0}' already exists")]
    DuplicateUser(UserName),

    /// 書籍が貸出中
    #[error("Book {0} is already borrowed")]
    AlreadyBorrowed(BookId),

    /// 貸出中のため削除できない
    #[error("Book {0} is currently borrowed and cannot be deleted")]
    BookCurrentlyBorrowed(BookId),

    /// 未返却の貸出記録がない
    #[error("Book {book_id} is not currently borrowed")]
    NoActiveBorrow { book_id: BookId, user_name: UserName },

    /// 別の利用者が借りている
    #[error("Book {book_id} was not borrowed by '{user_name}'")]
    ReturnMismatch { book_id: BookId, user_name: UserName },

    /// 不変条件違反
    #[error("Invariant violation: {0}")]
    InvariantViolation(#[from] InvariantError),

    /// パスワードのハッシュ化に失敗
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Catalogのエラー
    #[error("Catalog error")]
    CatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Ledgerのエラー
    #[error("Ledger error")]
    LedgerError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LibraryApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::BookNotFound(_)
            | Self::UserNotFound(_)
            | Self::RecordNotFound(_)
            | Self::NoActiveBorrow { .. } => ErrorKind::NotFound,
            Self::DuplicateIsbn(_)
            | Self::DuplicateUser(_)
            | Self::AlreadyBorrowed(_)
            | Self::BookCurrentlyBorrowed(_)
            | Self::ReturnMismatch { .. } => ErrorKind::Conflict,
            Self::InvariantViolation(_)
            | Self::CredentialError(_)
            | Self::CatalogError(_)
            | Self::UserDirectoryError(_)
            | Self::LedgerError(_) => ErrorKind::Internal,
        }
    }

    /// Ledgerのエラーを変換する
    ///
    /// 未返却記録の重複は不変条件違反として扱う。
    pub(crate) fn from_ledger(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast_ref::<MultipleOpenRecords>() {
            Some(m) => Self::InvariantViolation(InvariantError::MultipleOpenRecords {
                book_id: m.book_id,
                count: m.count,
            }),
            None => Self::LedgerError(err),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let book_id = BookId::new(1);
        let alice = UserName::new("alice").unwrap();

        assert_eq!(
            LibraryApplicationError::from(ValidationError::EmptyTitle).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            LibraryApplicationError::BookNotFound(book_id).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LibraryApplicationError::NoActiveBorrow {
                book_id,
                user_name: alice.clone()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LibraryApplicationError::ReturnMismatch {
                book_id,
                user_name: alice
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            LibraryApplicationError::AlreadyBorrowed(book_id).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            LibraryApplicationError::LedgerError("disk full".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_from_ledger_maps_multiple_open_records_to_invariant_violation() {
        let err = LibraryApplicationError::from_ledger(Box::new(MultipleOpenRecords {
            book_id: BookId::new(3),
            count: 2,
        }));

        assert!(matches!(
            err,
            LibraryApplicationError::InvariantViolation(InvariantError::MultipleOpenRecords {
                count: 2,
                ..
            })
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_from_ledger_keeps_other_errors() {
        let err = LibraryApplicationError::from_ledger("connection reset".into());
        assert!(matches!(err, LibraryApplicationError::LedgerError(_)));
    }

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            LibraryApplicationError::DuplicateIsbn("111".into()).to_string(),
            "A book with ISBN '111' already exists"
        );
        assert_eq!(
            LibraryApplicationError::from(ValidationError::EmptyKeyword).to_string(),
            "Search keyword must not be empty"
        );
    }
}
