use crate::domain::{BookId, BorrowRecord, BorrowRecordId, DailyBorrowCount};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 1冊の書籍に未返却の記録が複数ある
///
/// 台帳の不変条件が壊れている。アダプターはこのエラーを返し、
/// アプリケーション層は不変条件違反として扱う。
#[derive(Debug, Error)]
#[error("book {book_id} has {count} open borrow records")]
pub struct MultipleOpenRecords {
    pub book_id: BookId,
    pub count: usize,
}

/// 貸出台帳ポート
///
/// 貸出・返却の履歴を追記専用で保持する。記録は削除されない。
#[async_trait]
pub trait Ledger: Send + Sync {
    /// 書籍の未返却の記録を取得する
    ///
    /// 複数見つかった場合は`MultipleOpenRecords`を返す。
    async fn open_record_for(&self, book_id: BookId) -> Result<Option<BorrowRecord>>;

    /// 新しい貸出記録を追記する
    async fn create(&self, record: BorrowRecord) -> Result<BorrowRecord>;

    /// 記録に返却日を設定する
    ///
    /// 未返却の記録を更新した場合は`true`、該当がない場合は`false`を返す。
    async fn close(&self, record_id: BorrowRecordId, return_date: NaiveDate) -> Result<bool>;

    /// 全記録を貸出日の昇順で返す（同日は追記順）
    async fn list_all(&self) -> Result<Vec<BorrowRecord>>;

    /// 未返却の記録数
    async fn count_open(&self) -> Result<u64>;

    /// `from`から`to`まで（両端を含む）の日別貸出件数
    ///
    /// 件数0の日は含めなくてよい。
    async fn daily_borrow_counts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBorrowCount>>;
}
