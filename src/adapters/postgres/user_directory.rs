use crate::domain::{User, UserName};
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, to_count};

fn map_row_to_user(row: &PgRow) -> Result<User> {
    let name: &str = row.get("name");
    let name = UserName::new(name).map_err(|e| invalid_data(e.to_string()))?;

    Ok(User {
        name,
        password_hash: row.get("password_hash"),
        registered_at: row.get("registered_at"),
    })
}

/// UserDirectoryのPostgreSQL実装
pub struct UserDirectory {
    pool: PgPool,
}

impl UserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn register(&self, user: User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (name, password_hash, registered_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.name.as_str())
        .bind(&user.password_hash)
        .bind(user.registered_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists(&self, name: &UserName) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE name = $1)")
                .bind(name.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find(&self, name: &UserName) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT name, password_hash, registered_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_user).transpose()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        to_count(count)
    }
}
