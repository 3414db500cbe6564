use serde::{Deserialize, Serialize};

use super::{BookId, ValidationError, value_objects::non_empty};

/// 書籍の書誌情報（タイトル・著者・ISBN）
///
/// 不変条件：すべて前後の空白を除いて空でない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookDetails {
    pub fn new(title: &str, author: &str, isbn: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: non_empty(title, ValidationError::EmptyTitle)?,
            author: non_empty(author, ValidationError::EmptyAuthor)?,
            isbn: non_empty(isbn, ValidationError::EmptyIsbn)?,
        })
    }
}

/// 書籍 - カタログが所有するエンティティ
///
/// `is_borrowed`は台帳から導出される状態。
/// 貸出・返却の処理以外で直接書き換えてはならない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub is_borrowed: bool,
}

impl Book {
    /// 新規登録（貸出可能な状態）
    pub fn new(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            title: details.title,
            author: details.author,
            isbn: details.isbn,
            is_borrowed: false,
        }
    }

    /// 書誌情報を差し替えた書籍を返す
    ///
    /// IDと貸出状態はそのまま引き継ぐ。
    pub fn with_details(&self, details: BookDetails) -> Self {
        Self {
            id: self.id,
            title: details.title,
            author: details.author,
            isbn: details.isbn,
            is_borrowed: self.is_borrowed,
        }
    }

    /// タイトルまたは著者がキーワードを含むか（大文字小文字を区別しない）
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword) || self.author.to_lowercase().contains(&keyword)
    }

    /// 著者名が指定文字列を含むか（大文字小文字を区別しない）
    pub fn matches_author(&self, author: &str) -> bool {
        self.author.to_lowercase().contains(&author.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book::new(
            BookId::new(1),
            BookDetails::new("The Rust Programming Language", "Steve Klabnik", "9781718503106")
                .unwrap(),
        )
    }

    #[test]
    fn test_book_details_trims_fields() {
        let details = BookDetails::new("  Dune ", " Frank Herbert", "111 ").unwrap();
        assert_eq!(details.title, "Dune");
        assert_eq!(details.author, "Frank Herbert");
        assert_eq!(details.isbn, "111");
    }

    #[test]
    fn test_book_details_rejects_empty_fields() {
        assert_eq!(
            BookDetails::new("", "X", "1").unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert_eq!(
            BookDetails::new("A", "  ", "1").unwrap_err(),
            ValidationError::EmptyAuthor
        );
        assert_eq!(
            BookDetails::new("A", "X", "").unwrap_err(),
            ValidationError::EmptyIsbn
        );
    }

    #[test]
    fn test_new_book_is_available() {
        assert!(!sample_book().is_borrowed);
    }

    #[test]
    fn test_with_details_keeps_id_and_borrow_state() {
        let mut book = sample_book();
        book.is_borrowed = true;

        let updated = book.with_details(BookDetails::new("B", "Y", "222").unwrap());

        assert_eq!(updated.id, book.id);
        assert!(updated.is_borrowed);
        assert_eq!(updated.title, "B");
        assert_eq!(updated.isbn, "222");
    }

    #[test]
    fn test_matches_keyword_in_title_or_author() {
        let book = sample_book();
        assert!(book.matches_keyword("rust"));
        assert!(book.matches_keyword("KLABNIK"));
        assert!(!book.matches_keyword("python"));
    }

    #[test]
    fn test_matches_author_is_substring_and_case_insensitive() {
        let book = sample_book();
        assert!(book.matches_author("steve klabnik"));
        assert!(book.matches_author("Klab"));
        assert!(!book.matches_author("Programming"));
    }
}
