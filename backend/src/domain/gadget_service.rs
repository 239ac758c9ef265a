//! Owner-scoped gadget use-cases.
//!
//! [`GadgetService`] implements both gadget driving ports. Reads and writes
//! are always filtered by the caller's id, so a foreign id looks exactly
//! like a missing one. Each successful write produces one broadcast.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::ports::{GadgetCommand, GadgetPersistenceError, GadgetQuery, GadgetRepository};
use super::{Error, Gadget, GadgetChanges, GadgetDraft, GadgetId, MutationBroadcaster, UserId};

const NOT_FOUND: &str = "Not found.";
/// Message returned when `bulk_delete` is called without ids.
pub const NO_IDS_PROVIDED: &str = "No IDs provided";

fn map_persistence_error(error: GadgetPersistenceError) -> Error {
    match error {
        GadgetPersistenceError::Connection { message } => {
            tracing::warn!(%message, "gadget storage unavailable");
            Error::service_unavailable("gadget storage is unavailable")
        }
        GadgetPersistenceError::Query { message } => {
            Error::internal(format!("gadget storage query failed: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct GadgetService<R> {
    repo: Arc<R>,
    broadcaster: MutationBroadcaster,
    clock: Arc<dyn Clock>,
}

impl<R> GadgetService<R> {
    pub fn new(repo: Arc<R>, broadcaster: MutationBroadcaster, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            broadcaster,
            clock,
        }
    }
}

impl<R: GadgetRepository> GadgetService<R> {
    async fn apply(
        &self,
        owner: UserId,
        id: GadgetId,
        changes: GadgetChanges,
    ) -> Result<Gadget, Error> {
        let updated = self
            .repo
            .update(owner, id, changes, self.clock.utc())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        self.broadcaster.updated(&updated);
        Ok(updated)
    }
}

#[async_trait]
impl<R: GadgetRepository> GadgetQuery for GadgetService<R> {
    async fn list(&self, owner: UserId) -> Result<Vec<Gadget>, Error> {
        self.repo
            .list_for_owner(owner)
            .await
            .map_err(map_persistence_error)
    }

    async fn get(&self, owner: UserId, id: GadgetId) -> Result<Gadget, Error> {
        self.repo
            .find(owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[async_trait]
impl<R: GadgetRepository> GadgetCommand for GadgetService<R> {
    async fn create(&self, owner: UserId, draft: GadgetDraft) -> Result<Gadget, Error> {
        let created = self
            .repo
            .insert(owner, draft, self.clock.utc())
            .await
            .map_err(map_persistence_error)?;
        self.broadcaster.created(&created);
        Ok(created)
    }

    async fn replace(
        &self,
        owner: UserId,
        id: GadgetId,
        draft: GadgetDraft,
    ) -> Result<Gadget, Error> {
        self.apply(owner, id, draft.into()).await
    }

    async fn update(
        &self,
        owner: UserId,
        id: GadgetId,
        changes: GadgetChanges,
    ) -> Result<Gadget, Error> {
        self.apply(owner, id, changes).await
    }

    async fn delete(&self, owner: UserId, id: GadgetId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete(owner, id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(Error::not_found(NOT_FOUND));
        }
        self.broadcaster.deleted(id, owner);
        Ok(())
    }

    async fn bulk_delete(&self, owner: UserId, ids: Vec<GadgetId>) -> Result<Vec<GadgetId>, Error> {
        if ids.is_empty() {
            return Err(Error::invalid_request(NO_IDS_PROVIDED));
        }
        let mut ids = ids;
        ids.sort_unstable();
        ids.dedup();

        let deleted = self
            .repo
            .delete_many(owner, &ids)
            .await
            .map_err(map_persistence_error)?;
        // Announced even when nothing matched.
        self.broadcaster.bulk_deleted(owner, deleted.clone());
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "gadget_service_tests.rs"]
mod tests;
