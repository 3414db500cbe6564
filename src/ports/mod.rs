pub mod catalog;
pub mod ledger;
pub mod user_directory;

pub use catalog::{Catalog, CatalogCounts};
pub use ledger::{Ledger, MultipleOpenRecords};
pub use user_directory::UserDirectory;
