use crate::domain::{BookId, BorrowRecord, BorrowRecordId, DailyBorrowCount, UserName};
use crate::ports::ledger::{Ledger as LedgerTrait, MultipleOpenRecords, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, to_count};

/// PostgreSQLの行データをBorrowRecordに変換する
///
/// user_nameは利用者名の不変条件を満たさない場合にエラーとする。
fn map_row_to_record(row: &PgRow) -> Result<BorrowRecord> {
    let user_name: &str = row.get("user_name");
    let user_name = UserName::new(user_name).map_err(|e| invalid_data(e.to_string()))?;

    Ok(BorrowRecord {
        id: BorrowRecordId::from_uuid(row.get("record_id")),
        user_name,
        book_id: BookId::new(row.get("book_id")),
        book_title: row.get("book_title"),
        borrow_date: row.get("borrow_date"),
        return_date: row.get("return_date"),
    })
}

/// LedgerのPostgreSQL実装
///
/// 部分ユニークインデックスで1冊につき未返却1件を保証する。
pub struct Ledger {
    pool: PgPool,
}

impl Ledger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerTrait for Ledger {
    async fn open_record_for(&self, book_id: BookId) -> Result<Option<BorrowRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT record_id, user_name, book_id, book_title, borrow_date, return_date
            FROM borrow_records
            WHERE book_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(book_id.value())
        .fetch_all(&self.pool)
        .await?;

        match rows.as_slice() {
            [] => Ok(None),
            [row] => map_row_to_record(row).map(Some),
            _ => Err(MultipleOpenRecords {
                book_id,
                count: rows.len(),
            }
            .into()),
        }
    }

    async fn create(&self, record: BorrowRecord) -> Result<BorrowRecord> {
        sqlx::query(
            r#"
            INSERT INTO borrow_records (
                record_id,
                user_name,
                book_id,
                book_title,
                borrow_date,
                return_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.value())
        .bind(record.user_name.as_str())
        .bind(record.book_id.value())
        .bind(&record.book_title)
        .bind(record.borrow_date)
        .bind(record.return_date)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn close(&self, record_id: BorrowRecordId, return_date: NaiveDate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE borrow_records
            SET return_date = $2
            WHERE record_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(record_id.value())
        .bind(return_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_all(&self) -> Result<Vec<BorrowRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT record_id, user_name, book_id, book_title, borrow_date, return_date
            FROM borrow_records
            ORDER BY borrow_date ASC, sequence_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_record).collect()
    }

    async fn count_open(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;

        to_count(count)
    }

    async fn daily_borrow_counts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBorrowCount>> {
        let rows = sqlx::query(
            r#"
            SELECT borrow_date, COUNT(*) AS count
            FROM borrow_records
            WHERE borrow_date BETWEEN $1 AND $2
            GROUP BY borrow_date
            ORDER BY borrow_date ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<DailyBorrowCount> {
                Ok(DailyBorrowCount {
                    date: row.get("borrow_date"),
                    count: to_count(row.get("count"))?,
                })
            })
            .collect()
    }
}
