use thiserror::Error;

use super::{BookId, UserName};

/// 入力値のエラー
///
/// 利用者にそのまま表示できるメッセージを持つ。再試行しても結果は変わらない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Author must not be empty")]
    EmptyAuthor,
    #[error("ISBN must not be empty")]
    EmptyIsbn,
    #[error("User name must not be empty")]
    EmptyUserName,
    #[error("Password must not be empty")]
    EmptyPassword,
    #[error("Search keyword must not be empty")]
    EmptyKeyword,
    /// 集計日数が範囲外（1..=max）
    #[error("days must be between 1 and {max}, got {days}")]
    TrendDaysOutOfRange { days: i64, max: u32 },
}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowError {
    /// 既に貸出中（誰が借りているかは問わない）
    AlreadyBorrowed,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnError {
    /// 未返却の貸出記録がない
    NoActiveBorrow,
    /// 別の利用者が借りている
    ReturnMismatch,
}

/// 削除のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    /// 貸出中のため削除不可
    BookCurrentlyBorrowed,
}

/// 不変条件違反
///
/// 書籍の貸出フラグと台帳が食い違っている。
/// 発生した場合は処理を中断し、サーバーエラーとして扱う。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("book {book_id} is flagged as borrowed but has no open borrow record")]
    FlaggedWithoutRecord { book_id: BookId },
    #[error("book {book_id} has an open borrow record by '{user_name}' but is not flagged as borrowed")]
    RecordWithoutFlag { book_id: BookId, user_name: UserName },
    #[error("open borrow record references book {record_book_id}, expected {book_id}")]
    RecordForOtherBook { book_id: BookId, record_book_id: BookId },
    #[error("book {book_id} has {count} open borrow records")]
    MultipleOpenRecords { book_id: BookId, count: usize },
    #[error("catalog reports {flagged} borrowed books but the ledger has {open} open records")]
    BorrowedCountMismatch { flagged: u64, open: u64 },
    #[error("catalog reports {borrowed} borrowed books out of {total}")]
    BorrowedExceedsTotal { total: u64, borrowed: u64 },
}
