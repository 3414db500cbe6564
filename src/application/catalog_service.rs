use crate::domain::{Book, BookDetails, ValidationError, commands::*};

use super::errors::{LibraryApplicationError, Result};
use super::service_dependencies::ServiceDependencies;

/// 書籍を登録する
///
/// ビジネスルール：
/// - タイトル・著者・ISBNは空でないこと
/// - ISBNが既存の書籍と重複しないこと（完全一致）
pub async fn add_book(deps: &ServiceDependencies, cmd: AddBook) -> Result<Book> {
    let details = BookDetails::new(&cmd.title, &cmd.author, &cmd.isbn)?;

    let _guard = deps.gate.write().await;

    let existing = deps
        .catalog
        .find_by_isbn(&details.isbn)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    if existing.is_some() {
        tracing::warn!(isbn = %details.isbn, "rejected book with duplicate isbn");
        return Err(LibraryApplicationError::DuplicateIsbn(details.isbn));
    }

    let book = deps
        .catalog
        .add(details)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    tracing::info!(book_id = %book.id, isbn = %book.isbn, "book added");
    Ok(book)
}

/// 書誌情報を更新する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 新しいISBNが他の書籍と重複しないこと（自身のISBNのままは可）
/// - 貸出状態は変更しない
pub async fn update_book(deps: &ServiceDependencies, cmd: UpdateBook) -> Result<Book> {
    let details = BookDetails::new(&cmd.title, &cmd.author, &cmd.isbn)?;

    let _guard = deps.gate.write().await;

    let current = deps
        .catalog
        .get(cmd.book_id)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    if current.is_none() {
        return Err(LibraryApplicationError::BookNotFound(cmd.book_id));
    }

    let same_isbn = deps
        .catalog
        .find_by_isbn(&details.isbn)
        .await
        .map_err(LibraryApplicationError::CatalogError)?;

    if same_isbn.is_some_and(|other| other.id != cmd.book_id) {
        tracing::warn!(book_id = %cmd.book_id, isbn = %details.isbn, "rejected update with duplicate isbn");
        return Err(LibraryApplicationError::DuplicateIsbn(details.isbn));
    }

    let book = deps
        .catalog
        .update(cmd.book_id, details)
        .await
        .map_err(LibraryApplicationError::CatalogError)?
        .ok_or(LibraryApplicationError::BookNotFound(cmd.book_id))?;

    tracing::info!(book_id = %book.id, "book updated");
    Ok(book)
}

/// 全書籍をID順に返す
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    let _guard = deps.gate.read().await;

    deps.catalog
        .list()
        .await
        .map_err(LibraryApplicationError::CatalogError)
}

/// タイトルまたは著者で書籍を検索する
///
/// 大文字小文字を区別しない部分一致。空のキーワードは拒否する。
pub async fn search_books(deps: &ServiceDependencies, keyword: &str) -> Result<Vec<Book>> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ValidationError::EmptyKeyword.into());
    }

    let _guard = deps.gate.read().await;

    deps.catalog
        .search(keyword)
        .await
        .map_err(LibraryApplicationError::CatalogError)
}

/// 著者名で書籍を検索する
///
/// 大文字小文字を区別しない部分一致。空の著者名は拒否する。
pub async fn books_by_author(deps: &ServiceDependencies, author: &str) -> Result<Vec<Book>> {
    let author = author.trim();
    if author.is_empty() {
        return Err(ValidationError::EmptyAuthor.into());
    }

    let _guard = deps.gate.read().await;

    deps.catalog
        .find_by_author(author)
        .await
        .map_err(LibraryApplicationError::CatalogError)
}
