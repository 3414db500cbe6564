use crate::domain::{User, UserName};
use crate::ports::user_directory::{Result, UserDirectory as UserDirectoryTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;

/// UserDirectoryのインメモリ実装
pub struct UserDirectory {
    users: Mutex<HashMap<UserName, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn register(&self, user: User) -> Result<()> {
        let mut users = lock(&self.users)?;
        if users.contains_key(&user.name) {
            return Err(format!("user '{}' already registered", user.name).into());
        }
        users.insert(user.name.clone(), user);
        Ok(())
    }

    async fn exists(&self, name: &UserName) -> Result<bool> {
        Ok(lock(&self.users)?.contains_key(name))
    }

    async fn find(&self, name: &UserName) -> Result<Option<User>> {
        Ok(lock(&self.users)?.get(name).cloned())
    }

    async fn count(&self) -> Result<u64> {
        Ok(lock(&self.users)?.len() as u64)
    }
}
