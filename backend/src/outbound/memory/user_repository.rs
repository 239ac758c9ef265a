//! `UserRepository` backed by a vector in process memory.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, Username};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    /// Start with `users` already stored, skipping the duplicate checks of
    /// [`UserRepository::insert`].
    pub fn with_users(users: Vec<StoredUser>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<StoredUser>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let users = self.lock()?;
        Ok(users
            .iter()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.lock()?;
        Ok(users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn insert(&self, user: &StoredUser) -> Result<bool, UserPersistenceError> {
        let mut users = self.lock()?;
        let clash = users.iter().any(|existing| {
            existing.user.id() == user.user.id()
                || existing.user.username() == user.user.username()
        });
        if clash {
            return Ok(false);
        }
        users.push(user.clone());
        Ok(true)
    }
}
