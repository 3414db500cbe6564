use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, BorrowRecordId, UserName};

/// 貸出記録 - 台帳の1エントリ
///
/// 貸出時に作成され、返却時に`return_date`が設定される。削除されない。
/// `book_title`は貸出時点のタイトルのスナップショット。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub id: BorrowRecordId,
    pub user_name: UserName,
    pub book_id: BookId,
    pub book_title: String,
    pub borrow_date: NaiveDate,
    /// `None`は未返却
    pub return_date: Option<NaiveDate>,
}

impl BorrowRecord {
    /// 未返却（貸出中）か
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// 指定した利用者の貸出か
    pub fn is_held_by(&self, user_name: &UserName) -> bool {
        &self.user_name == user_name
    }
}
