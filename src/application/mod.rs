mod catalog_service;
mod circulation_service;
mod errors;
mod service_dependencies;
mod statistics_service;
mod user_service;

pub use catalog_service::{add_book, books_by_author, list_books, search_books, update_book};
pub use circulation_service::{borrow_book, delete_book, list_borrow_records, return_book};
pub use errors::{ErrorKind, LibraryApplicationError, Result};
pub use service_dependencies::{ServiceDependencies, StatisticsSettings, TransactionGate};
pub use statistics_service::{author_distribution, book_status, borrow_trend};
pub use user_service::{register_user, verify_password};
