pub mod catalog;
pub mod ledger;
pub mod user_directory;

// パブリックに型を再エクスポート
pub use catalog::Catalog as PostgresCatalog;
pub use ledger::Ledger as PostgresLedger;
pub use user_directory::UserDirectory as PostgresUserDirectory;

/// 不正な行データのエラーを作る
pub(crate) fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// COUNT(*)の結果をu64に変換する
pub(crate) fn to_count(value: i64) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
    u64::try_from(value).map_err(|_| invalid_data(format!("negative count: {}", value)))
}
