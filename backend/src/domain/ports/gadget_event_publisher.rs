//! Driven port for fanning mutation events out to live connections.

use crate::domain::{GadgetEvent, OwnerGroup};

/// Delivery is best effort. Implementations must not block on slow
/// receivers and never report failures back to the mutation path.
#[cfg_attr(test, mockall::automock)]
pub trait GadgetEventPublisher: Send + Sync {
    fn publish(&self, group: &OwnerGroup, event: GadgetEvent);
}
