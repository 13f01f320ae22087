//! Process-local `CatalogueCache` for runs without Redis.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ports::{CatalogueCache, CatalogueCacheError, IndexUpdate};
use crate::domain::{Event, EventId, TopEvent, TopEventsLimit};

use super::redis_catalogue_cache::TOP_EVENTS_TTL;

/// Cached value with its deadline. A TTL too large to represent as an
/// [`Instant`] never expires.
#[derive(Debug)]
struct Expiring<T> {
    value: T,
    expires_at: Option<Instant>,
}

impl<T> Expiring<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

impl<T: Clone> Expiring<T> {
    fn live(&self, now: Instant) -> Option<T> {
        self.is_live(now).then(|| self.value.clone())
    }
}

#[derive(Debug, Default)]
struct Entries {
    events: HashMap<EventId, Expiring<Event>>,
    sellable: Option<Expiring<BTreeSet<EventId>>>,
    top_events: HashMap<u8, Expiring<Vec<TopEvent>>>,
}

/// In-memory cache with per-entry expiry.
#[derive(Debug)]
pub struct MemoryCatalogueCache {
    entries: Mutex<Entries>,
    ttl: Duration,
}

impl MemoryCatalogueCache {
    /// Cache whose event snapshots and sellable index live for `ttl`. Top
    /// events rankings use the fixed analytics TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            ttl,
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogueCache for MemoryCatalogueCache {
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, CatalogueCacheError> {
        Ok(self
            .entries()
            .events
            .get(id)
            .and_then(|entry| entry.live(Instant::now())))
    }

    async fn put_event(&self, event: &Event) -> Result<(), CatalogueCacheError> {
        let now = Instant::now();
        let mut entries = self.entries();
        entries.events.retain(|_, entry| entry.is_live(now));
        entries
            .events
            .insert(event.id().clone(), Expiring::new(event.clone(), self.ttl));
        Ok(())
    }

    async fn invalidate_event(&self, id: &EventId) -> Result<(), CatalogueCacheError> {
        self.entries().events.remove(id);
        Ok(())
    }

    async fn sellable_index(&self) -> Result<Option<BTreeSet<EventId>>, CatalogueCacheError> {
        Ok(self
            .entries()
            .sellable
            .as_ref()
            .and_then(|entry| entry.live(Instant::now())))
    }

    async fn store_sellable_index(
        &self,
        event_ids: &BTreeSet<EventId>,
    ) -> Result<(), CatalogueCacheError> {
        self.entries().sellable = Some(Expiring::new(event_ids.clone(), self.ttl));
        Ok(())
    }

    async fn remove_from_sellable_index(
        &self,
        id: &EventId,
    ) -> Result<IndexUpdate, CatalogueCacheError> {
        let now = Instant::now();
        let mut entries = self.entries();
        match entries.sellable.as_mut() {
            Some(entry) if entry.is_live(now) => {
                entry.value.remove(id);
                Ok(IndexUpdate::Applied)
            }
            _ => Ok(IndexUpdate::IndexAbsent),
        }
    }

    async fn top_events(
        &self,
        limit: TopEventsLimit,
    ) -> Result<Option<Vec<TopEvent>>, CatalogueCacheError> {
        Ok(self
            .entries()
            .top_events
            .get(&limit.get())
            .and_then(|entry| entry.live(Instant::now())))
    }

    async fn put_top_events(
        &self,
        limit: TopEventsLimit,
        events: &[TopEvent],
    ) -> Result<(), CatalogueCacheError> {
        self.entries()
            .top_events
            .insert(limit.get(), Expiring::new(events.to_vec(), TOP_EVENTS_TTL));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cache() -> MemoryCatalogueCache {
        MemoryCatalogueCache::new(Duration::from_secs(60))
    }

    fn id(raw: &str) -> EventId {
        EventId::new(raw).expect("event id")
    }

    #[rstest]
    #[tokio::test]
    async fn emptied_index_is_still_present(cache: MemoryCatalogueCache) {
        cache
            .store_sellable_index(&BTreeSet::from([id("a")]))
            .await
            .expect("store");

        let update = cache
            .remove_from_sellable_index(&id("a"))
            .await
            .expect("remove");

        assert_eq!(update, IndexUpdate::Applied);
        assert_eq!(
            cache.sellable_index().await.expect("read"),
            Some(BTreeSet::new())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn removal_without_index_is_reported(cache: MemoryCatalogueCache) {
        let update = cache
            .remove_from_sellable_index(&id("a"))
            .await
            .expect("remove");
        assert_eq!(update, IndexUpdate::IndexAbsent);
    }

    #[rstest]
    #[tokio::test]
    async fn zero_ttl_entries_expire_immediately() {
        let cache = MemoryCatalogueCache::new(Duration::ZERO);
        cache
            .store_sellable_index(&BTreeSet::from([id("a")]))
            .await
            .expect("store");
        assert!(cache.sellable_index().await.expect("read").is_none());
    }

    fn event(raw: &str) -> Event {
        Event::new(
            id(raw),
            crate::domain::EventDetails {
                title: raw.to_owned(),
                city: None,
                venue: None,
                category: None,
                starts_at: chrono::Utc::now(),
                duration_minutes: None,
                age_restriction: None,
            },
            None,
            Vec::new(),
        )
        .expect("valid event")
    }

    #[rstest]
    #[tokio::test]
    async fn unrepresentable_ttl_never_expires() {
        let cache = MemoryCatalogueCache::new(Duration::MAX);
        cache.put_event(&event("a")).await.expect("put");
        cache
            .store_sellable_index(&BTreeSet::from([id("a")]))
            .await
            .expect("store");

        assert!(cache.get_event(&id("a")).await.expect("read").is_some());
        assert_eq!(
            cache.remove_from_sellable_index(&id("a")).await.expect("remove"),
            IndexUpdate::Applied
        );
    }

    #[rstest]
    #[tokio::test]
    async fn writing_an_event_prunes_expired_snapshots() {
        let cache = MemoryCatalogueCache::new(Duration::ZERO);
        cache.put_event(&event("a")).await.expect("put a");
        cache.put_event(&event("b")).await.expect("put b");

        let entries = cache.entries();
        assert_eq!(entries.events.len(), 1);
        assert!(entries.events.contains_key(&id("b")));
    }
}
