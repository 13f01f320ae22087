//! Port interface for the non-authoritative catalogue cache.
//!
//! Every entry is a disposable projection of the event repository or the
//! order ledger. Callers treat errors as cache misses or log them; a cache
//! failure never fails a purchase.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Event, EventId, TopEvent, TopEventsLimit};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum CatalogueCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "catalogue cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "catalogue cache serialisation failed: {message}",
    }
}

/// Outcome of removing an identifier from the sellable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdate {
    /// The index exists and no longer contains the identifier.
    Applied,
    /// No index is cached yet; nothing was written.
    IndexAbsent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCache: Send + Sync {
    /// Read a cached event snapshot.
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, CatalogueCacheError>;

    /// Store an event snapshot with the adapter's default TTL.
    async fn put_event(&self, event: &Event) -> Result<(), CatalogueCacheError>;

    /// Drop the cached snapshot for an event.
    async fn invalidate_event(&self, id: &EventId) -> Result<(), CatalogueCacheError>;

    /// Read the sellable index. `None` means it has not been built.
    async fn sellable_index(&self) -> Result<Option<BTreeSet<EventId>>, CatalogueCacheError>;

    /// Replace the sellable index atomically.
    async fn store_sellable_index(
        &self,
        event_ids: &BTreeSet<EventId>,
    ) -> Result<(), CatalogueCacheError>;

    /// Remove one identifier from the sellable index if the index exists.
    async fn remove_from_sellable_index(
        &self,
        id: &EventId,
    ) -> Result<IndexUpdate, CatalogueCacheError>;

    /// Read a cached top events ranking.
    async fn top_events(
        &self,
        limit: TopEventsLimit,
    ) -> Result<Option<Vec<TopEvent>>, CatalogueCacheError>;

    /// Store a top events ranking.
    async fn put_top_events(
        &self,
        limit: TopEventsLimit,
        events: &[TopEvent],
    ) -> Result<(), CatalogueCacheError>;
}

/// Cache that stores nothing. Every read misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCatalogueCache;

#[async_trait]
impl CatalogueCache for NoOpCatalogueCache {
    async fn get_event(&self, _id: &EventId) -> Result<Option<Event>, CatalogueCacheError> {
        Ok(None)
    }

    async fn put_event(&self, _event: &Event) -> Result<(), CatalogueCacheError> {
        Ok(())
    }

    async fn invalidate_event(&self, _id: &EventId) -> Result<(), CatalogueCacheError> {
        Ok(())
    }

    async fn sellable_index(&self) -> Result<Option<BTreeSet<EventId>>, CatalogueCacheError> {
        Ok(None)
    }

    async fn store_sellable_index(
        &self,
        _event_ids: &BTreeSet<EventId>,
    ) -> Result<(), CatalogueCacheError> {
        Ok(())
    }

    async fn remove_from_sellable_index(
        &self,
        _id: &EventId,
    ) -> Result<IndexUpdate, CatalogueCacheError> {
        Ok(IndexUpdate::IndexAbsent)
    }

    async fn top_events(
        &self,
        _limit: TopEventsLimit,
    ) -> Result<Option<Vec<TopEvent>>, CatalogueCacheError> {
        Ok(None)
    }

    async fn put_top_events(
        &self,
        _limit: TopEventsLimit,
        _events: &[TopEvent],
    ) -> Result<(), CatalogueCacheError> {
        Ok(())
    }
}
