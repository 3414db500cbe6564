use crate::domain::{User, UserName};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 利用者ディレクトリポート
///
/// 貸出処理は利用者名だけを参照し、資格情報は使わない。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 利用者を登録する
    ///
    /// 同名の利用者がいないことは呼び出し側で確認済みであること。
    async fn register(&self, user: User) -> Result<()>;

    /// 利用者が存在するか確認する
    async fn exists(&self, name: &UserName) -> Result<bool>;

    /// 名前で利用者を取得する
    async fn find(&self, name: &UserName) -> Result<Option<User>>;

    /// 登録済み利用者数
    async fn count(&self) -> Result<u64>;
}
