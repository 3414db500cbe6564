use crate::domain::{AuthorCount, Book, BookDetails, BookId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 蔵書数（全体・貸出中）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogCounts {
    pub total: u64,
    pub borrowed: u64,
}

/// カタログポート
///
/// 書籍エンティティの保存先を抽象化する。
/// 重複ISBNや貸出中の削除といったビジネスルールはアプリケーション層で判定し、
/// このポートは単純な読み書きだけを担う。
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 書籍を登録し、採番したIDを持つ書籍を返す
    ///
    /// IDは単調増加し、削除後も再利用しない。
    async fn add(&self, details: BookDetails) -> Result<Book>;

    /// 書誌情報を更新する
    ///
    /// 貸出状態は変更しない。書籍が存在しない場合は`None`を返す。
    async fn update(&self, book_id: BookId, details: BookDetails) -> Result<Option<Book>>;

    /// 書籍を削除する
    ///
    /// 削除した場合は`true`、存在しなかった場合は`false`を返す。
    async fn delete(&self, book_id: BookId) -> Result<bool>;

    /// IDで書籍を取得する
    async fn get(&self, book_id: BookId) -> Result<Option<Book>>;

    /// ISBNで書籍を取得する（完全一致、大文字小文字を区別）
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    /// 全書籍をID順に返す
    async fn list(&self) -> Result<Vec<Book>>;

    /// タイトルまたは著者にキーワードを含む書籍をID順に返す（大文字小文字を区別しない）
    async fn search(&self, keyword: &str) -> Result<Vec<Book>>;

    /// 著者名に指定文字列を含む書籍をID順に返す（大文字小文字を区別しない）
    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>>;

    /// 貸出フラグを設定する
    ///
    /// 貸出・返却の処理からのみ呼ばれる。
    async fn set_borrowed(&self, book_id: BookId, is_borrowed: bool) -> Result<()>;

    /// 全体と貸出中の蔵書数
    async fn count(&self) -> Result<CatalogCounts>;

    /// 著者名（完全一致）ごとの蔵書数。順序は問わない。
    async fn count_by_author(&self) -> Result<Vec<AuthorCount>>;
}
