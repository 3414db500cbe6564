use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use super::BookId;

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// コマンド：書誌情報を更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// コマンド：利用者を登録する
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUser {
    pub name: String,
    pub password: String,
    pub registered_at: DateTime<Utc>,
}

impl fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUser")
            .field("name", &self.name)
            .field("password", &"***")
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowBook {
    pub user_name: String,
    pub book_id: BookId,
    pub borrowed_on: NaiveDate,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnBook {
    pub user_name: String,
    pub book_id: BookId,
    pub returned_on: NaiveDate,
}
