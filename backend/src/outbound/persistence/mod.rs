//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the authoritative store for users, events, ticket
//! inventory and orders. It uses `diesel-async` with `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel rows and domain types.
//! - **Internal models**: Row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic purchases**: [`DieselReservationStore`] decrements inventory and
//!   records the order inside one transaction.
//! - **Strongly typed errors**: Database failures map to the port error enums.
//!
//! # Example
//!
//! ```no_run
//! use ticketing::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), ticketing::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tickets")).await?;
//! let events = DieselEventRepository::new(pool);
//! # let _ = events;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_order_ledger;
mod diesel_reservation_store;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_order_ledger::DieselOrderLedger;
pub use diesel_reservation_store::DieselReservationStore;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
