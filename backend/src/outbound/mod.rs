//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL stores using Diesel ORM.
//! - **cache**: Redis-backed catalogue cache plus an in-process fallback.
//! - **memory**: in-process stores for runs without a database.
//! - **mirror**: sinks fed with committed facts.
//! - **security**: password hashing.
//!
//! Adapters translate between domain types and infrastructure formats. They
//! contain no business logic.

pub mod cache;
pub mod memory;
pub mod mirror;
pub mod persistence;
pub mod security;
