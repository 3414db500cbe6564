use crate::domain::{AuthorCount, Book, BookDetails, BookId};
use crate::ports::catalog::{Catalog as CatalogTrait, CatalogCounts, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::lock;

struct CatalogState {
    books: BTreeMap<BookId, Book>,
    next_id: i64,
}

/// Catalogのインメモリ実装
///
/// BTreeMapでID順を保つ。IDは1から採番し、削除しても巻き戻さない。
pub struct Catalog {
    state: Mutex<CatalogState>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CatalogState {
                books: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn filtered(&self, predicate: impl Fn(&Book) -> bool) -> Result<Vec<Book>> {
        let state = lock(&self.state)?;
        Ok(state
            .books
            .values()
            .filter(|b| predicate(b))
            .cloned()
            .collect())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogTrait for Catalog {
    async fn add(&self, details: BookDetails) -> Result<Book> {
        let mut state = lock(&self.state)?;
        let id = BookId::new(state.next_id);
        state.next_id += 1;

        let book = Book::new(id, details);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, book_id: BookId, details: BookDetails) -> Result<Option<Book>> {
        let mut state = lock(&self.state)?;
        Ok(state.books.get_mut(&book_id).map(|book| {
            *book = book.with_details(details);
            book.clone()
        }))
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        Ok(lock(&self.state)?.books.remove(&book_id).is_some())
    }

    async fn get(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(lock(&self.state)?.books.get(&book_id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let state = lock(&self.state)?;
        Ok(state.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        self.filtered(|_| true)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Book>> {
        self.filtered(|b| b.matches_keyword(keyword))
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>> {
        self.filtered(|b| b.matches_author(author))
    }

    async fn set_borrowed(&self, book_id: BookId, is_borrowed: bool) -> Result<()> {
        let mut state = lock(&self.state)?;
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| format!("book {} not found", book_id))?;
        book.is_borrowed = is_borrowed;
        Ok(())
    }

    async fn count(&self) -> Result<CatalogCounts> {
        let state = lock(&self.state)?;
        Ok(CatalogCounts {
            total: state.books.len() as u64,
            borrowed: state.books.values().filter(|b| b.is_borrowed).count() as u64,
        })
    }

    async fn count_by_author(&self) -> Result<Vec<AuthorCount>> {
        let state = lock(&self.state)?;
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for book in state.books.values() {
            *counts.entry(book.author.as_str()).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(author, book_count)| AuthorCount {
                author: author.to_string(),
                book_count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(title: &str, author: &str, isbn: &str) -> BookDetails {
        BookDetails::new(title, author, isbn).unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_never_reused() {
        let catalog = Catalog::new();

        let first = catalog.add(details("A", "X", "1")).await.unwrap();
        let second = catalog.add(details("B", "Y", "2")).await.unwrap();
        assert_eq!(first.id, BookId::new(1));
        assert_eq!(second.id, BookId::new(2));

        assert!(catalog.delete(second.id).await.unwrap());
        let third = catalog.add(details("C", "Z", "3")).await.unwrap();
        assert_eq!(third.id, BookId::new(3));
    }

    #[tokio::test]
    async fn test_update_preserves_borrow_flag() {
        let catalog = Catalog::new();
        let book = catalog.add(details("A", "X", "1")).await.unwrap();
        catalog.set_borrowed(book.id, true).await.unwrap();

        let updated = catalog
            .update(book.id, details("A2", "X", "1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "A2");
        assert!(updated.is_borrowed);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_book() {
        let catalog = Catalog::new();
        let missing = BookId::new(42);

        assert!(catalog.update(missing, details("A", "X", "1")).await.unwrap().is_none());
        assert!(!catalog.delete(missing).await.unwrap());
        assert!(catalog.set_borrowed(missing, true).await.is_err());
    }

    #[tokio::test]
    async fn test_search_and_author_lookup() {
        let catalog = Catalog::new();
        catalog.add(details("Dune", "Frank Herbert", "1")).await.unwrap();
        catalog.add(details("Emma", "Jane Austen", "2")).await.unwrap();
        catalog.add(details("Persuasion", "Jane Austen", "3")).await.unwrap();

        let found = catalog.search("dUNe").await.unwrap();
        assert_eq!(found.len(), 1);

        let found = catalog.search("austen").await.unwrap();
        assert_eq!(found.len(), 2);

        let by_author = catalog.find_by_author("jane").await.unwrap();
        let titles: Vec<&str> = by_author.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Emma", "Persuasion"]);
    }

    #[tokio::test]
    async fn test_find_by_isbn_is_case_sensitive() {
        let catalog = Catalog::new();
        catalog.add(details("A", "X", "abc")).await.unwrap();

        assert!(catalog.find_by_isbn("abc").await.unwrap().is_some());
        assert!(catalog.find_by_isbn("ABC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_counts() {
        let catalog = Catalog::new();
        let a = catalog.add(details("A", "X", "1")).await.unwrap();
        catalog.add(details("B", "X", "2")).await.unwrap();
        catalog.add(details("C", "Y", "3")).await.unwrap();
        catalog.set_borrowed(a.id, true).await.unwrap();

        assert_eq!(
            catalog.count().await.unwrap(),
            CatalogCounts { total: 3, borrowed: 1 }
        );

        let mut by_author = catalog.count_by_author().await.unwrap();
        by_author.sort_by(|a, b| a.author.cmp(&b.author));
        assert_eq!(
            by_author,
            vec![
                AuthorCount { author: "X".into(), book_count: 2 },
                AuthorCount { author: "Y".into(), book_count: 1 },
            ]
        );
    }
}
