//! Announces completed gadget mutations to the owner's live sessions.
//!
//! Every method resolves the owner's group and publishes exactly one event.
//! Publishing is synchronous from the caller's point of view: by the time a
//! method returns the event has been handed to every member's channel.

use std::sync::Arc;

use super::ports::GadgetEventPublisher;
use super::{Gadget, GadgetEvent, GadgetId, OwnerGroup, UserId};

#[derive(Clone)]
pub struct MutationBroadcaster {
    publisher: Arc<dyn GadgetEventPublisher>,
}

impl MutationBroadcaster {
    pub fn new(publisher: Arc<dyn GadgetEventPublisher>) -> Self {
        Self { publisher }
    }

    pub fn created(&self, gadget: &Gadget) {
        self.send(gadget.owner(), GadgetEvent::Created(gadget.clone()));
    }

    pub fn updated(&self, gadget: &Gadget) {
        self.send(gadget.owner(), GadgetEvent::Updated(gadget.clone()));
    }

    /// The record is already gone, so only its id travels.
    pub fn deleted(&self, gadget_id: GadgetId, owner: UserId) {
        self.send(owner, GadgetEvent::Deleted { gadget_id });
    }

    pub fn bulk_deleted(&self, owner: UserId, ids: Vec<GadgetId>) {
        self.send(owner, GadgetEvent::BulkDeleted { ids });
    }

    fn send(&self, owner: UserId, event: GadgetEvent) {
        let group = OwnerGroup::for_owner(owner);
        tracing::debug!(group = %group, action = ?event.action(), "broadcasting gadget mutation");
        self.publisher.publish(&group, event);
    }
}

impl std::fmt::Debug for MutationBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationBroadcaster").finish_non_exhaustive()
    }
}
