use chrono::{DateTime, Utc};
use std::fmt;

use super::{UserName, ValidationError};

/// 平文パスワード
///
/// 登録時にハッシュ化するまでの間だけ保持する。Debug出力では伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// 空（空白のみを含む）のパスワードは拒否する。強度の検査は行わない。
    pub fn new(password: &str) -> Result<Self, ValidationError> {
        if password.trim().is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(Self(password.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// 利用者 - 利用者ディレクトリが所有するエンティティ
///
/// 登録後に更新・削除されることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: UserName,
    /// argon2のPHC文字列
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
}
