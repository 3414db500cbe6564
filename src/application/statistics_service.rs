use crate::domain::{
    AuthorCount, BookStatus, DailyBorrowCount, InvariantError, TrendWindow,
    statistics::{dense_trend, rank_authors},
};
use chrono::NaiveDate;

use super::errors::{LibraryApplicationError, Result};
use super::service_dependencies::ServiceDependencies;

/// 蔵書の貸出状況を集計する
///
/// 貸出中の冊数はカタログの貸出フラグから数え、台帳の未返却件数と照合する。
/// 一致しない場合は不整合な統計を返さずに不変条件違反とする。
pub async fn book_status(deps: &ServiceDependencies) -> Result<BookStatus> {
    let _guard = deps.gate.read().await;

    let counts = deps
        .catalog
        .count()
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    let total_users = deps
        .user_directory
        .count()
        .await
        .map_err(LibraryApplicationError::UserDirectoryError)?;

    let open = deps
        .ledger
        .count_open()
        .await
        .map_err(LibraryApplicationError::from_ledger)?;

    if counts.borrowed != open {
        let violation = InvariantError::BorrowedCountMismatch {
            flagged: counts.borrowed,
            open,
        };
        tracing::error!("{}", violation);
        return Err(violation.into());
    }

    BookStatus::new(counts.total, counts.borrowed, total_users).ok_or_else(|| {
        InvariantError::BorrowedExceedsTotal {
            total: counts.total,
            borrowed: counts.borrowed,
        }
        .into()
    })
}

/// 著者別の蔵書数
///
/// 著者名の完全一致でまとめ、蔵書数の降順・著者名の昇順で並べる。
pub async fn author_distribution(deps: &ServiceDependencies) -> Result<Vec<AuthorCount>> {
    let _guard = deps.gate.read().await;

    let counts = deps
        .catalog
        .count_by_author()
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    Ok(rank_authors(counts))
}

/// 日別の貸出推移
///
/// `today`を含む直近`days`日分を古い順に返す。貸出のない日も0件として含む。
/// `days`が未指定の場合は設定値を使う。
pub async fn borrow_trend(
    deps: &ServiceDependencies,
    days: Option<i64>,
    today: NaiveDate,
) -> Result<Vec<DailyBorrowCount>> {
    let days = days.unwrap_or(i64::from(deps.statistics.default_trend_days));
    let window = TrendWindow::new(days, deps.statistics.max_trend_days)?;

    let _guard = deps.gate.read().await;

    let counts = deps
        .ledger
        .daily_borrow_counts(window.first_day(today), today)
        .await
        .map_err(LibraryApplicationError::from_ledger)?;

    Ok(dense_trend(window, today, &counts))
}
