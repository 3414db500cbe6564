use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AuthorCount, Book, BookId, BookStatus, BorrowRecord, DailyBorrowCount, commands::*,
};

// ============================================================================
// Requests
// ============================================================================

/// 書籍の登録・更新リクエスト（POST /api/books, PUT /api/books/:id）
///
/// 欠けているフィールドは空文字列として扱い、アプリケーション層の検証で拒否する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
}

impl BookRequest {
    pub fn to_add_command(self) -> AddBook {
        AddBook {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        }
    }

    pub fn to_update_command(self, book_id: BookId) -> UpdateBook {
        UpdateBook {
            book_id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        }
    }
}

/// 利用者登録リクエスト（POST /api/register）
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn to_command(self, registered_at: DateTime<Utc>) -> RegisterUser {
        RegisterUser {
            name: self.name,
            password: self.password,
            registered_at,
        }
    }
}

/// 貸出・返却リクエスト（POST /api/borrow, POST /api/return）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirculationRequest {
    #[serde(default)]
    pub user_name: String,
    pub book_id: i64,
}

impl CirculationRequest {
    pub fn to_borrow_command(self, borrowed_on: NaiveDate) -> BorrowBook {
        BorrowBook {
            user_name: self.user_name,
            book_id: BookId::new(self.book_id),
            borrowed_on,
        }
    }

    pub fn to_return_command(self, returned_on: NaiveDate) -> ReturnBook {
        ReturnBook {
            user_name: self.user_name,
            book_id: BookId::new(self.book_id),
            returned_on,
        }
    }
}

/// 書籍検索のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

/// 貸出推移のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
}

// ============================================================================
// Responses
// ============================================================================

/// メッセージのみのレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// 書籍の登録・更新レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookMutationResponse {
    pub success: bool,
    pub message: String,
    pub book: Book,
}

/// 書籍一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BooksResponse {
    pub success: bool,
    pub books: Vec<Book>,
}

/// 貸出記録一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowedBooksResponse {
    pub success: bool,
    pub borrowed_books: Vec<BorrowRecord>,
}

/// 貸出状況レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: BookStatus,
}

/// 著者別蔵書数レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct DistributionResponse {
    pub success: bool,
    pub distribution: Vec<AuthorCount>,
}

/// 貸出推移レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendResponse {
    pub success: bool,
    pub trend: Vec<DailyBorrowCount>,
}

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// エラーレスポンス
///
/// すべての失敗は`success: false`とメッセージで表す。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
