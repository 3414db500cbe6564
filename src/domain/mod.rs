pub mod book;
pub mod borrow_record;
pub mod circulation;
pub mod commands;
pub mod errors;
pub mod statistics;
pub mod user;
pub mod value_objects;

pub use book::*;
pub use borrow_record::*;
pub use errors::*;
pub use statistics::{AuthorCount, BookStatus, DailyBorrowCount, TrendWindow};
pub use user::*;
pub use value_objects::*;
