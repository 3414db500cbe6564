use crate::domain::{BookId, BorrowRecord, BorrowRecordId, DailyBorrowCount};
use crate::ports::ledger::{Ledger as LedgerTrait, MultipleOpenRecords, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::lock;

/// Ledgerのインメモリ実装
///
/// 記録を追記順のVecで保持する。
pub struct Ledger {
    records: Mutex<Vec<BorrowRecord>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerTrait for Ledger {
    async fn open_record_for(&self, book_id: BookId) -> Result<Option<BorrowRecord>> {
        let records = lock(&self.records)?;
        let mut open = records
            .iter()
            .filter(|r| r.book_id == book_id && r.is_open());

        match (open.next(), open.next()) {
            (None, _) => Ok(None),
            (Some(record), None) => Ok(Some(record.clone())),
            (Some(_), Some(_)) => Err(MultipleOpenRecords {
                book_id,
                count: 2 + open.count(),
            }
            .into()),
        }
    }

    async fn create(&self, record: BorrowRecord) -> Result<BorrowRecord> {
        lock(&self.records)?.push(record.clone());
        Ok(record)
    }

    async fn close(&self, record_id: BorrowRecordId, return_date: NaiveDate) -> Result<bool> {
        let mut records = lock(&self.records)?;
        match records.iter_mut().find(|r| r.id == record_id && r.is_open()) {
            Some(record) => {
                record.return_date = Some(return_date);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<BorrowRecord>> {
        let mut records = lock(&self.records)?.clone();
        // 安定ソートなので同日の記録は追記順のまま
        records.sort_by_key(|r| r.borrow_date);
        Ok(records)
    }

    async fn count_open(&self) -> Result<u64> {
        let records = lock(&self.records)?;
        Ok(records.iter().filter(|r| r.is_open()).count() as u64)
    }

    async fn daily_borrow_counts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBorrowCount>> {
        let records = lock(&self.records)?;
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for record in records.iter() {
            if (from..=to).contains(&record.borrow_date) {
                *counts.entry(record.borrow_date).or_insert(0) += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(date, count)| DailyBorrowCount { date, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserName;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn record(book_id: i64, user: &str, borrow_date: NaiveDate) -> BorrowRecord {
        BorrowRecord {
            id: BorrowRecordId::new(),
            user_name: UserName::new(user).unwrap(),
            book_id: BookId::new(book_id),
            book_title: format!("Book {}", book_id),
            borrow_date,
            return_date: None,
        }
    }

    #[tokio::test]
    async fn test_open_record_lifecycle() {
        let ledger = Ledger::new();
        let created = ledger.create(record(1, "alice", day(1))).await.unwrap();

        let open = ledger.open_record_for(BookId::new(1)).await.unwrap();
        assert_eq!(open, Some(created.clone()));
        assert_eq!(ledger.count_open().await.unwrap(), 1);

        assert!(ledger.close(created.id, day(3)).await.unwrap());
        assert!(ledger.open_record_for(BookId::new(1)).await.unwrap().is_none());
        assert_eq!(ledger.count_open().await.unwrap(), 0);

        // 返却済みの記録は再度閉じられない
        assert!(!ledger.close(created.id, day(4)).await.unwrap());

        let all = ledger.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].return_date, Some(day(3)));
    }

    #[tokio::test]
    async fn test_multiple_open_records_are_reported() {
        let ledger = Ledger::new();
        ledger.create(record(1, "alice", day(1))).await.unwrap();
        ledger.create(record(1, "bob", day(2))).await.unwrap();

        let err = ledger.open_record_for(BookId::new(1)).await.unwrap_err();
        let err = err.downcast_ref::<MultipleOpenRecords>().unwrap();
        assert_eq!(err.book_id, BookId::new(1));
        assert_eq!(err.count, 2);
    }

    #[tokio::test]
    async fn test_list_all_orders_by_borrow_date_then_insertion() {
        let ledger = Ledger::new();
        ledger.create(record(1, "late", day(9))).await.unwrap();
        ledger.create(record(2, "first", day(2))).await.unwrap();
        ledger.create(record(3, "second", day(2))).await.unwrap();

        let names: Vec<String> = ledger
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.user_name.to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "late"]);
    }

    #[tokio::test]
    async fn test_daily_borrow_counts_within_range() {
        let ledger = Ledger::new();
        ledger.create(record(1, "a", day(1))).await.unwrap();
        ledger.create(record(2, "b", day(3))).await.unwrap();
        ledger.create(record(3, "c", day(3))).await.unwrap();
        ledger.create(record(4, "d", day(8))).await.unwrap();

        let counts = ledger.daily_borrow_counts(day(2), day(7)).await.unwrap();
        assert_eq!(
            counts,
            vec![DailyBorrowCount {
                date: day(3),
                count: 2
            }]
        );
    }
}
