//! Port abstraction for gadget persistence adapters.
//!
//! Every method is scoped by owner: adapters never return or touch a row
//! belonging to anyone else, so "missing" and "not yours" are
//! indistinguishable to callers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Gadget, GadgetChanges, GadgetDraft, GadgetId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by gadget repository adapters.
    pub enum GadgetPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "gadget repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "gadget repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GadgetRepository: Send + Sync {
    /// Owner's gadgets, newest `created` first, ties broken by descending id.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Gadget>, GadgetPersistenceError>;

    async fn find(
        &self,
        owner: UserId,
        id: GadgetId,
    ) -> Result<Option<Gadget>, GadgetPersistenceError>;

    /// Store a new gadget with `created == last_modified == now`.
    async fn insert(
        &self,
        owner: UserId,
        draft: GadgetDraft,
        now: DateTime<Utc>,
    ) -> Result<Gadget, GadgetPersistenceError>;

    /// Apply `changes` and stamp `now`; `None` when the row is not the owner's.
    async fn update(
        &self,
        owner: UserId,
        id: GadgetId,
        changes: GadgetChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Gadget>, GadgetPersistenceError>;

    /// Returns `false` when nothing owned by `owner` matched.
    async fn delete(&self, owner: UserId, id: GadgetId) -> Result<bool, GadgetPersistenceError>;

    /// Delete the owner's gadgets among `ids` in one statement and return
    /// the ids actually removed in ascending order.
    async fn delete_many(
        &self,
        owner: UserId,
        ids: &[GadgetId],
    ) -> Result<Vec<GadgetId>, GadgetPersistenceError>;
}
