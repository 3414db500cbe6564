use crate::domain::{AuthorCount, Book, BookDetails, BookId};
use crate::ports::catalog::{Catalog as CatalogTrait, CatalogCounts, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, to_count};

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        id: BookId::new(row.get("id")),
        title: row.get("title"),
        author: row.get("author"),
        isbn: row.get("isbn"),
        is_borrowed: row.get("is_borrowed"),
    }
}

/// CatalogのPostgreSQL実装
pub struct Catalog {
    pool: PgPool,
}

impl Catalog {
    /// PostgreSQLコネクションプールから新しいCatalogを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogTrait for Catalog {
    /// IDはBIGSERIALで採番する
    async fn add(&self, details: BookDetails) -> Result<Book> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn, is_borrowed
            "#,
        )
        .bind(&details.title)
        .bind(&details.author)
        .bind(&details.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_row_to_book(&row))
    }

    async fn update(&self, book_id: BookId, details: BookDetails) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, author, isbn, is_borrowed
            "#,
        )
        .bind(book_id.value())
        .bind(&details.title)
        .bind(&details.author)
        .bind(&details.isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn, is_borrowed
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn, is_borrowed
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, isbn, is_borrowed
            FROM books
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    /// LIKEのワイルドカードを避けるためstrposで部分一致を判定する
    async fn search(&self, keyword: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, isbn, is_borrowed
            FROM books
            WHERE strpos(lower(title), lower($1)) > 0
               OR strpos(lower(author), lower($1)) > 0
            ORDER BY id ASC
            "#,
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, isbn, is_borrowed
            FROM books
            WHERE strpos(lower(author), lower($1)) > 0
            ORDER BY id ASC
            "#,
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    async fn set_borrowed(&self, book_id: BookId, is_borrowed: bool) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET is_borrowed = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(book_id.value())
        .bind(is_borrowed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(invalid_data(format!("book {} not found", book_id)));
        }
        Ok(())
    }

    async fn count(&self) -> Result<CatalogCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_borrowed) AS borrowed
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogCounts {
            total: to_count(row.get("total"))?,
            borrowed: to_count(row.get("borrowed"))?,
        })
    }

    async fn count_by_author(&self) -> Result<Vec<AuthorCount>> {
        let rows = sqlx::query(
            r#"
            SELECT author, COUNT(*) AS book_count
            FROM books
            GROUP BY author
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<AuthorCount> {
                Ok(AuthorCount {
                    author: row.get("author"),
                    book_count: to_count(row.get("book_count"))?,
                })
            })
            .collect()
    }
}
