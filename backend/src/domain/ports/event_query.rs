//! Driving port for catalogue reads.
use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Error, Event, EventId};

/// Event snapshot together with whether it came from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventView {
    pub event: Event,
    pub cached: bool,
}

/// Identifiers of sellable events together with whether they came from the
/// cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellableEvents {
    pub event_ids: BTreeSet<EventId>,
    pub cached: bool,
}

/// Domain use-case port for browsing the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// Fetch one event, reading through the cache.
    async fn get_event(&self, id: &EventId) -> Result<EventView, Error>;

    /// List events that have availability and start in the future.
    async fn list_sellable(&self) -> Result<SellableEvents, Error>;
}
