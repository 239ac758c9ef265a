//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `UserProfileQuery`, `GadgetCommand`,
//! `GadgetQuery`) are called by inbound adapters. Driven ports
//! (`GadgetRepository`, `UserRepository`, `GadgetEventPublisher`) are
//! implemented by outbound adapters and the connection registry.

mod macros;
pub(crate) use macros::define_port_error;

mod gadget_command;
mod gadget_event_publisher;
mod gadget_query;
mod gadget_repository;
mod login_service;
mod user_profile_query;
mod user_repository;

pub use gadget_command::GadgetCommand;
#[cfg(test)]
pub use gadget_command::MockGadgetCommand;
pub use gadget_event_publisher::GadgetEventPublisher;
#[cfg(test)]
pub use gadget_event_publisher::MockGadgetEventPublisher;
pub use gadget_query::GadgetQuery;
#[cfg(test)]
pub use gadget_query::MockGadgetQuery;
pub use gadget_repository::{GadgetPersistenceError, GadgetRepository};
#[cfg(test)]
pub use gadget_repository::MockGadgetRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UserPersistenceError, UserRepository};
