//! Driving port for reading the caller's own account.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the account behind a validated token.
    async fn fetch_profile(&self, user_id: UserId) -> Result<User, Error>;
}
