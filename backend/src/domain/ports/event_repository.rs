//! Port for the authoritative event catalogue.
//!
//! The repository owns ticket remainders. Adapters must return ticket types in
//! their stored order because positional purchase hints index into it.

use async_trait::async_trait;

use crate::domain::{Event, EventId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fetch one event with its ticket types.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Fetch every event in the catalogue.
    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError>;

    /// Insert or replace an event and its ticket types.
    ///
    /// Used by catalogue management tooling. The purchase flow never calls it.
    async fn upsert(&self, event: &Event) -> Result<(), EventRepositoryError>;
}
