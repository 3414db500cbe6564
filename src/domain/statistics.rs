use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ValidationError;

/// 貸出推移のデフォルト集計日数
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// 貸出推移の最大集計日数
pub const MAX_TREND_DAYS: u32 = 366;

/// 蔵書の貸出状況
///
/// 不変条件：`total_books = borrowed_books + available_books`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStatus {
    pub total_books: u64,
    pub borrowed_books: u64,
    pub available_books: u64,
    pub total_users: u64,
}

impl BookStatus {
    /// `borrowed_books`が`total_books`を超える場合は`None`
    pub fn new(total_books: u64, borrowed_books: u64, total_users: u64) -> Option<Self> {
        let available_books = total_books.checked_sub(borrowed_books)?;
        Some(Self {
            total_books,
            borrowed_books,
            available_books,
            total_users,
        })
    }
}

/// 著者ごとの蔵書数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub book_count: u64,
}

/// 純粋関数：著者別の蔵書数を並べ替える
///
/// 蔵書数の降順、同数の場合は著者名の昇順（バイト順）。
pub fn rank_authors(mut counts: Vec<AuthorCount>) -> Vec<AuthorCount> {
    counts.sort_by(|a, b| {
        b.book_count
            .cmp(&a.book_count)
            .then_with(|| a.author.cmp(&b.author))
    });
    counts
}

/// 日別の貸出件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBorrowCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// 貸出推移の集計期間
///
/// 不変条件：日数は 1..=max。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindow {
    days: u32,
}

impl TrendWindow {
    pub fn new(days: i64, max: u32) -> Result<Self, ValidationError> {
        match u32::try_from(days) {
            Ok(d) if (1..=max).contains(&d) => Ok(Self { days: d }),
            _ => Err(ValidationError::TrendDaysOutOfRange { days, max }),
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// 期間の初日（`today`を含めて`days`日前）
    pub fn first_day(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days - 1)))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// 純粋関数：日別件数を欠損のない時系列にする
///
/// 期間内のすべての日付を古い順に1件ずつ返す。記録のない日は0件。
/// 期間外の件数は無視する。
pub fn dense_trend(
    window: TrendWindow,
    today: NaiveDate,
    counts: &[DailyBorrowCount],
) -> Vec<DailyBorrowCount> {
    let mut by_date: HashMap<NaiveDate, u64> = HashMap::new();
    for c in counts {
        *by_date.entry(c.date).or_insert(0) += c.count;
    }

    window
        .first_day(today)
        .iter_days()
        .take(window.days() as usize)
        .map(|date| DailyBorrowCount {
            date,
            count: by_date.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_book_status_totals_add_up() {
        let status = BookStatus::new(5, 2, 3).unwrap();
        assert_eq!(status.available_books, 3);
        assert_eq!(
            status.total_books,
            status.borrowed_books + status.available_books
        );
    }

    #[test]
    fn test_book_status_rejects_more_borrowed_than_total() {
        assert!(BookStatus::new(1, 2, 0).is_none());
    }

    #[test]
    fn test_rank_authors_orders_by_count_then_name() {
        let ranked = rank_authors(vec![
            AuthorCount { author: "Zed".into(), book_count: 1 },
            AuthorCount { author: "Bob".into(), book_count: 3 },
            AuthorCount { author: "Amy".into(), book_count: 1 },
            AuthorCount { author: "Cal".into(), book_count: 3 },
        ]);

        let authors: Vec<&str> = ranked.iter().map(|a| a.author.as_str()).collect();
        assert_eq!(authors, vec!["Bob", "Cal", "Amy", "Zed"]);
    }

    #[test]
    fn test_trend_window_validation() {
        assert!(TrendWindow::new(1, 366).is_ok());
        assert!(TrendWindow::new(366, 366).is_ok());
        assert_eq!(
            TrendWindow::new(0, 366).unwrap_err(),
            ValidationError::TrendDaysOutOfRange { days: 0, max: 366 }
        );
        assert!(TrendWindow::new(-3, 366).is_err());
        assert!(TrendWindow::new(367, 366).is_err());
    }

    #[test]
    fn test_dense_trend_zero_fills_empty_ledger() {
        let window = TrendWindow::new(7, MAX_TREND_DAYS).unwrap();
        let trend = dense_trend(window, day(3, 10), &[]);

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, day(3, 4));
        assert_eq!(trend[6].date, day(3, 10));
        assert!(trend.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_dense_trend_places_counts_and_ignores_out_of_range() {
        let window = TrendWindow::new(3, MAX_TREND_DAYS).unwrap();
        let counts = [
            DailyBorrowCount { date: day(2, 28), count: 9 },
            DailyBorrowCount { date: day(2, 29), count: 2 },
            DailyBorrowCount { date: day(3, 2), count: 1 },
        ];

        let trend = dense_trend(window, day(3, 2), &counts);

        assert_eq!(
            trend,
            vec![
                DailyBorrowCount { date: day(2, 29), count: 2 },
                DailyBorrowCount { date: day(3, 1), count: 0 },
                DailyBorrowCount { date: day(3, 2), count: 1 },
            ]
        );
    }

    #[test]
    fn test_dense_trend_single_day() {
        let window = TrendWindow::new(1, MAX_TREND_DAYS).unwrap();
        let trend = dense_trend(window, day(3, 2), &[]);
        assert_eq!(trend, vec![DailyBorrowCount { date: day(3, 2), count: 0 }]);
    }
}
