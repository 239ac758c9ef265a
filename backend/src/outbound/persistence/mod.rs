//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and
//! domain types. Row structs (`models.rs`) and the schema (`schema.rs`)
//! stay private to this module. Connections come from a `bb8` pool via
//! `diesel-async`; every failure is mapped onto the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use gadget_backend::outbound::persistence::{DbPool, DieselGadgetRepository};
//!
//! let pool = DbPool::connect("postgres://localhost/gadgets").await?;
//! let repo = DieselGadgetRepository::new(pool);
//! ```

mod diesel_gadget_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_gadget_repository::DieselGadgetRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolError};
