//! Maintenance of the cached sellable events index.
//!
//! The index is a set of event identifiers with availability and a future
//! start time. It is built lazily by catalogue reads and only ever shrinks
//! through [`SellableIndexReconciler::reconcile`]; restocking never re-adds an
//! event.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::ports::{
    CatalogueCache, CatalogueCacheError, EventRepository, EventRepositoryError, IndexUpdate,
};
use crate::domain::{Event, EventId};

/// Identifiers of events that belong in the sellable index at `now`.
pub fn sellable_event_ids(events: &[Event], now: DateTime<Utc>) -> BTreeSet<EventId> {
    events
        .iter()
        .filter(|event| event.is_sellable_at(now))
        .map(|event| event.id().clone())
        .collect()
}

/// Result of reconciling one event against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The event still has availability; the index was not touched.
    Retained,
    /// The event is drained and no longer listed.
    Removed,
    /// The event is drained but no index is cached yet.
    IndexAbsent,
}

/// Failures while reconciling. Callers log these; they are never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Repository(#[from] EventRepositoryError),
    #[error(transparent)]
    Cache(#[from] CatalogueCacheError),
}

/// Recomputes an event's availability from the authoritative repository and
/// prunes the sellable index.
pub struct SellableIndexReconciler<E> {
    events: Arc<E>,
    cache: Arc<dyn CatalogueCache>,
}

impl<E> Clone for SellableIndexReconciler<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<E> SellableIndexReconciler<E>
where
    E: EventRepository,
{
    /// Reconciler reading inventory from `events` and pruning `cache`.
    pub fn new(events: Arc<E>, cache: Arc<dyn CatalogueCache>) -> Self {
        Self { events, cache }
    }

    /// Remove `event_id` from the index when none of its ticket types has
    /// units left. An event missing from the repository counts as drained.
    pub async fn reconcile(&self, event_id: &EventId) -> Result<ReconcileOutcome, ReconcileError> {
        let has_available = self
            .events
            .find_by_id(event_id)
            .await?
            .is_some_and(|event| event.has_available());
        if has_available {
            return Ok(ReconcileOutcome::Retained);
        }

        let outcome = match self.cache.remove_from_sellable_index(event_id).await? {
            IndexUpdate::Applied => ReconcileOutcome::Removed,
            IndexUpdate::IndexAbsent => ReconcileOutcome::IndexAbsent,
        };
        debug!(event_id = %event_id, ?outcome, "reconciled sellable index");
        Ok(outcome)
    }
}
