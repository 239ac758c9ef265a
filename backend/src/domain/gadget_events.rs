//! Mutation events pushed to an owner's live connections.
//!
//! Events are transient: they are built by the mutation broadcaster, fanned
//! out by the connection registry and encoded by the WebSocket adapter. They
//! are never stored.

use std::fmt;

use serde::Serialize;

use super::{Gadget, GadgetId, UserId};

const GROUP_PREFIX: &str = "gadgets_";

/// Kind of mutation carried by a [`GadgetEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GadgetAction {
    Created,
    Updated,
    Deleted,
    BulkDeleted,
}

/// One mutation as seen by the owner's other sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GadgetEvent {
    Created(Gadget),
    Updated(Gadget),
    /// Only the id survives a delete.
    Deleted { gadget_id: GadgetId },
    /// Ids actually removed, possibly empty.
    BulkDeleted { ids: Vec<GadgetId> },
}

impl GadgetEvent {
    pub fn action(&self) -> GadgetAction {
        match self {
            Self::Created(_) => GadgetAction::Created,
            Self::Updated(_) => GadgetAction::Updated,
            Self::Deleted { .. } => GadgetAction::Deleted,
            Self::BulkDeleted { .. } => GadgetAction::BulkDeleted,
        }
    }

    /// Target of a single-gadget mutation; `None` for bulk deletes.
    pub fn gadget_id(&self) -> Option<GadgetId> {
        match self {
            Self::Created(gadget) | Self::Updated(gadget) => Some(gadget.id()),
            Self::Deleted { gadget_id } => Some(*gadget_id),
            Self::BulkDeleted { .. } => None,
        }
    }

    /// Full record, present for creates and updates only.
    pub fn gadget(&self) -> Option<&Gadget> {
        match self {
            Self::Created(gadget) | Self::Updated(gadget) => Some(gadget),
            Self::Deleted { .. } | Self::BulkDeleted { .. } => None,
        }
    }

    pub fn ids(&self) -> Option<&[GadgetId]> {
        match self {
            Self::BulkDeleted { ids } => Some(ids),
            _ => None,
        }
    }
}

/// Connection group key for one owner: `gadgets_<owner uuid>`.
///
/// The key is derived only from the owner id, so every session of the same
/// user lands in the same group and no other user's session ever does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerGroup(String);

impl OwnerGroup {
    pub fn for_owner(owner: UserId) -> Self {
        Self(format!("{GROUP_PREFIX}{owner}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
