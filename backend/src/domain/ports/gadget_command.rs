//! Driving port for gadget mutations.
//!
//! Every successful mutation is announced to the owner's live connections
//! before the call returns.

use async_trait::async_trait;

use crate::domain::{Error, Gadget, GadgetChanges, GadgetDraft, GadgetId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GadgetCommand: Send + Sync {
    async fn create(&self, owner: UserId, draft: GadgetDraft) -> Result<Gadget, Error>;

    /// Full update: the name is overwritten and an absent description kept.
    async fn replace(&self, owner: UserId, id: GadgetId, draft: GadgetDraft)
    -> Result<Gadget, Error>;

    /// Partial update: absent fields are kept.
    async fn update(
        &self,
        owner: UserId,
        id: GadgetId,
        changes: GadgetChanges,
    ) -> Result<Gadget, Error>;

    async fn delete(&self, owner: UserId, id: GadgetId) -> Result<(), Error>;

    /// Delete the caller's gadgets among `ids`, ignoring ids that are
    /// missing or owned by someone else. Rejects an empty list.
    async fn bulk_delete(&self, owner: UserId, ids: Vec<GadgetId>) -> Result<Vec<GadgetId>, Error>;
}
