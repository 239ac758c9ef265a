//! Driving port for gadget reads.

use async_trait::async_trait;

use crate::domain::{Error, Gadget, GadgetId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GadgetQuery: Send + Sync {
    async fn list(&self, owner: UserId) -> Result<Vec<Gadget>, Error>;

    /// Fails with `not_found` for ids that are missing or not the owner's.
    async fn get(&self, owner: UserId, id: GadgetId) -> Result<Gadget, Error>;
}
