//! In-process repository adapters.
//!
//! Used when no database URL is configured and by the test harness. State
//! lives behind a `std::sync::Mutex`; no lock is held across an await.

mod gadget_repository;
mod user_repository;

pub use gadget_repository::InMemoryGadgetRepository;
pub use user_repository::InMemoryUserRepository;
