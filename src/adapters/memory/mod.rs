pub mod catalog;
pub mod ledger;
pub mod user_directory;

pub use catalog::Catalog as InMemoryCatalog;
pub use ledger::Ledger as InMemoryLedger;
pub use user_directory::UserDirectory as InMemoryUserDirectory;

use std::sync::{Mutex, MutexGuard};

/// ロックを取得する
///
/// 他スレッドのパニックでロックが壊れている場合はエラーを返す。
pub(crate) fn lock<T>(
    mutex: &Mutex<T>,
) -> Result<MutexGuard<'_, T>, Box<dyn std::error::Error + Send + Sync>> {
    mutex
        .lock()
        .map_err(|_| "in-memory store lock poisoned".into())
}
