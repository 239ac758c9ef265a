//! Domain primitives, services and ports.
//!
//! Purpose: keep gadget ownership rules, credential handling and the
//! realtime fan-out model independent of actix and Diesel. Inbound adapters
//! call the driving ports in [`ports`]; outbound adapters implement the
//! driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Gadget and friends: owner-scoped inventory records.
//! - GadgetEvent / OwnerGroup: transient mutation events and their routing key.
//! - ConnectionRegistry: live connection handles grouped by owner.
//! - TokenService: access/refresh token issue and validation.

pub mod accounts;
pub mod auth;
pub mod connection_registry;
pub mod demo_data;
pub mod error;
pub mod gadget;
pub mod gadget_events;
pub mod gadget_service;
pub mod mutation_broadcaster;
pub mod password;
pub mod ports;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountService, INVALID_CREDENTIALS};
pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MAX};
pub use self::connection_registry::{
    ConnectionHandle, ConnectionId, ConnectionRegistry, EventReceiver, GroupMembership,
};
pub use self::demo_data::{DEMO_PASSWORD, DemoDataSeeder, DemoSeedError, DemoSeedOutcome};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gadget::{
    GADGET_NAME_MAX, Gadget, GadgetChanges, GadgetDraft, GadgetId, GadgetName,
    GadgetValidationError,
};
pub use self::gadget_events::{GadgetAction, GadgetEvent, OwnerGroup};
pub use self::gadget_service::{GadgetService, NO_IDS_PROVIDED};
pub use self::mutation_broadcaster::MutationBroadcaster;
pub use self::token::{AuthError, TokenIssueError, TokenLifetimes, TokenPair, TokenService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient domain result alias.
pub type ApiResult<T> = Result<T, Error>;
