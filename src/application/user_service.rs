use crate::domain::{Password, User, UserName, commands::RegisterUser};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use super::errors::{LibraryApplicationError, Result};
use super::service_dependencies::ServiceDependencies;

/// パスワードをargon2でハッシュ化する
fn hash_password(password: &Password) -> std::result::Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// 保存済みのハッシュとパスワードを照合する
///
/// `register_user`が保存するargon2ハッシュの読み手側。サーバーはログインを
/// 提供しないため、ハッシュ形式を共有する利用者（管理ツールなど）向けに公開する。
/// ハッシュが壊れている場合は一致しないものとして扱う。
pub fn verify_password(user: &User, candidate: &str) -> bool {
    PasswordHash::new(&user.password_hash)
        .map(|hash| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 利用者を登録する
///
/// ビジネスルール：
/// - 利用者名とパスワードは空でないこと（強度は問わない）
/// - 利用者名が登録済みでないこと
///
/// ハッシュ化は重いため、排他区間に入る前にブロッキングスレッドで行う。
pub async fn register_user(deps: &ServiceDependencies, cmd: RegisterUser) -> Result<User> {
    let name = UserName::new(&cmd.name)?;
    let password = Password::new(&cmd.password)?;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| LibraryApplicationError::CredentialError(e.to_string()))?
        .map_err(|e| LibraryApplicationError::CredentialError(e.to_string()))?;

    let _guard = deps.gate.write().await;

    let exists = deps
        .user_directory
        .exists(&name)
        .await
        .map_err(LibraryApplicationError::UserDirectoryError)?;

    if exists {
        tracing::warn!(user = %name, "rejected duplicate user registration");
        return Err(LibraryApplicationError::DuplicateUser(name));
    }

    let user = User {
        name,
        password_hash,
        registered_at: cmd.registered_at,
    };

    deps.user_directory
        .register(user.clone())
        .await
        .map_err(LibraryApplicationError::UserDirectoryError)?;

    tracing::info!(user = %user.name, "user registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_hash(password_hash: String) -> User {
        User {
            name: UserName::new("alice").unwrap(),
            password_hash,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_is_salted_argon2() {
        let password = Password::new("pw1").unwrap();

        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();

        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password_matches_only_original() {
        let user = user_with_hash(hash_password(&Password::new("pw1").unwrap()).unwrap());

        assert!(verify_password(&user, "pw1"));
        assert!(!verify_password(&user, "pw2"));
    }

    #[test]
    fn test_verify_password_rejects_malformed_hash() {
        let user = user_with_hash("not-a-phc-string".to_string());

        assert!(!verify_password(&user, "pw1"));
    }
}
