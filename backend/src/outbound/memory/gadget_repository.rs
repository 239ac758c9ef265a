//! `GadgetRepository` backed by a map in process memory.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{GadgetPersistenceError, GadgetRepository};
use crate::domain::{Gadget, GadgetChanges, GadgetDraft, GadgetId, UserId};

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    rows: BTreeMap<GadgetId, Gadget>,
}

/// Gadget storage keyed by id, with ids allocated from 1 upwards.
#[derive(Debug, Default)]
pub struct InMemoryGadgetRepository {
    store: Mutex<Store>,
}

impl InMemoryGadgetRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Store>, GadgetPersistenceError> {
        self.store
            .lock()
            .map_err(|_| GadgetPersistenceError::query("gadget store lock poisoned"))
    }
}

#[async_trait]
impl GadgetRepository for InMemoryGadgetRepository {
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Gadget>, GadgetPersistenceError> {
        let store = self.lock()?;
        let mut owned: Vec<Gadget> = store
            .rows
            .values()
            .filter(|gadget| gadget.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created()
                .cmp(&a.created())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(owned)
    }

    async fn find(
        &self,
        owner: UserId,
        id: GadgetId,
    ) -> Result<Option<Gadget>, GadgetPersistenceError> {
        let store = self.lock()?;
        Ok(store
            .rows
            .get(&id)
            .filter(|gadget| gadget.owner() == owner)
            .cloned())
    }

    async fn insert(
        &self,
        owner: UserId,
        draft: GadgetDraft,
        now: DateTime<Utc>,
    ) -> Result<Gadget, GadgetPersistenceError> {
        let mut store = self.lock()?;
        store.next_id += 1;
        let id = GadgetId::new(store.next_id);
        let gadget = Gadget::new(
            id,
            owner,
            draft.name.clone(),
            draft.initial_description(),
            now,
            now,
        );
        store.rows.insert(id, gadget.clone());
        Ok(gadget)
    }

    async fn update(
        &self,
        owner: UserId,
        id: GadgetId,
        changes: GadgetChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Gadget>, GadgetPersistenceError> {
        let mut store = self.lock()?;
        let Some(gadget) = store
            .rows
            .get_mut(&id)
            .filter(|gadget| gadget.owner() == owner)
        else {
            return Ok(None);
        };
        gadget.apply(changes, now);
        Ok(Some(gadget.clone()))
    }

    async fn delete(&self, owner: UserId, id: GadgetId) -> Result<bool, GadgetPersistenceError> {
        let mut store = self.lock()?;
        let owned = store
            .rows
            .get(&id)
            .is_some_and(|gadget| gadget.owner() == owner);
        if owned {
            store.rows.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_many(
        &self,
        owner: UserId,
        ids: &[GadgetId],
    ) -> Result<Vec<GadgetId>, GadgetPersistenceError> {
        let mut store = self.lock()?;
        let mut removed = Vec::new();
        for id in ids {
            let owned = store
                .rows
                .get(id)
                .is_some_and(|gadget| gadget.owner() == owner);
            if owned && store.rows.remove(id).is_some() {
                removed.push(*id);
            }
        }
        removed.sort_unstable();
        removed.dedup();
        Ok(removed)
    }
}
