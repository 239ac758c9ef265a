//! Live connection handles grouped by owner.
//!
//! Each open WebSocket session owns a [`ConnectionHandle`] whose unbounded
//! channel feeds the session task. Handles are grouped under an
//! [`OwnerGroup`]; a group exists only while it has members.
//!
//! All operations on one group run under that key's shard lock in the
//! underlying [`DashMap`]. `publish` sends while still holding the lock, so
//! a `join` that has returned is always visible to the next publish and a
//! `leave` that has returned is never delivered to again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use super::ports::GadgetEventPublisher;
use super::{GadgetEvent, OwnerGroup};

/// Events as delivered to a session; shared so fan-out clones a pointer.
pub type EventReceiver = mpsc::UnboundedReceiver<Arc<GadgetEvent>>;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Sending half of a session's event channel.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<Arc<GadgetEvent>>,
}

impl ConnectionHandle {
    /// Create a handle and the receiver its session reads from.
    pub fn channel() -> (Self, EventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                id: ConnectionId::next(),
                sender,
            },
            receiver,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Registry of live connections keyed by owner group.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    groups: DashMap<OwnerGroup, Vec<ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `handle` to `group`. Joining twice with the same handle is a
    /// no-op; returns whether the handle was newly added.
    pub fn join(&self, group: &OwnerGroup, handle: ConnectionHandle) -> bool {
        let mut members = self.groups.entry(group.clone()).or_default();
        if members.iter().any(|member| member.id == handle.id) {
            return false;
        }
        debug!(group = %group, connection = %handle.id, "connection joined group");
        members.push(handle);
        true
    }

    /// Remove the connection from `group`, dropping the group once empty.
    /// Returns whether a member was removed.
    pub fn leave(&self, group: &OwnerGroup, id: ConnectionId) -> bool {
        let mut removed = false;
        self.groups.remove_if_mut(group, |_, members| {
            let before = members.len();
            members.retain(|member| member.id != id);
            removed = members.len() != before;
            members.is_empty()
        });
        if removed {
            debug!(group = %group, connection = %id, "connection left group");
        }
        removed
    }

    /// Deliver `event` to every current member of `group`.
    ///
    /// A closed receiver is logged and skipped; the rest of the group still
    /// receives the event. Publishing to an absent group does nothing.
    pub fn publish(&self, group: &OwnerGroup, event: GadgetEvent) {
        let Some(members) = self.groups.get(group) else {
            return;
        };
        let event = Arc::new(event);
        for member in members.iter() {
            if member.sender.send(Arc::clone(&event)).is_err() {
                debug!(
                    group = %group,
                    connection = %member.id,
                    "dropping event for closed connection"
                );
            }
        }
    }

    /// Join `group` with a fresh handle and return a guard that leaves on
    /// drop, together with the receiver the session should read from.
    pub fn join_group(self: &Arc<Self>, group: OwnerGroup) -> (GroupMembership, EventReceiver) {
        let (handle, receiver) = ConnectionHandle::channel();
        let id = handle.id();
        self.join(&group, handle);
        let membership = GroupMembership {
            registry: Arc::clone(self),
            group,
            id,
            active: true,
        };
        (membership, receiver)
    }

    /// Number of groups with at least one member.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of connections currently in `group`.
    pub fn member_count(&self, group: &OwnerGroup) -> usize {
        self.groups.get(group).map_or(0, |members| members.len())
    }
}

impl GadgetEventPublisher for ConnectionRegistry {
    fn publish(&self, group: &OwnerGroup, event: GadgetEvent) {
        ConnectionRegistry::publish(self, group, event);
    }
}

/// Membership of one connection in one group.
///
/// Leaving is idempotent: [`GroupMembership::leave`] may be called
/// explicitly and the guard leaves again on drop without effect.
#[derive(Debug)]
pub struct GroupMembership {
    registry: Arc<ConnectionRegistry>,
    group: OwnerGroup,
    id: ConnectionId,
    active: bool,
}

impl GroupMembership {
    pub fn group(&self) -> &OwnerGroup {
        &self.group
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.id
    }

    pub fn leave(&mut self) {
        if self.active {
            self.active = false;
            self.registry.leave(&self.group, self.id);
        }
    }
}

impl Drop for GroupMembership {
    fn drop(&mut self) {
        self.leave();
    }
}

#[cfg(test)]
#[path = "connection_registry_tests.rs"]
mod tests;
