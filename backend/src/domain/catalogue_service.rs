//! Catalogue read service.
//!
//! Reads go through the catalogue cache first. Cache failures degrade to a
//! miss and are logged; the repository stays the source of truth.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{
    CatalogueCache, EventQuery, EventRepository, EventRepositoryError, EventView, SellableEvents,
};
use crate::domain::{Error, EventId, sellable_event_ids};

/// Service implementing [`EventQuery`] over an event repository and cache.
pub struct CatalogueService<E> {
    events: Arc<E>,
    cache: Arc<dyn CatalogueCache>,
    clock: Arc<dyn Clock>,
}

impl<E> CatalogueService<E> {
    /// Cache-aside catalogue reads over `events`.
    pub fn new(events: Arc<E>, cache: Arc<dyn CatalogueCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            cache,
            clock,
        }
    }
}

impl<E> CatalogueService<E>
where
    E: EventRepository,
{
    fn map_repository_error(error: EventRepositoryError) -> Error {
        match error {
            EventRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("event catalogue unavailable: {message}"))
            }
            EventRepositoryError::Query { message } => {
                Error::internal(format!("event catalogue error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<E> EventQuery for CatalogueService<E>
where
    E: EventRepository,
{
    async fn get_event(&self, id: &EventId) -> Result<EventView, Error> {
        match self.cache.get_event(id).await {
            Ok(Some(event)) => return Ok(EventView { event, cached: true }),
            Ok(None) => {}
            Err(error) => warn!(event_id = %id, %error, "event cache read failed"),
        }

        let event = self
            .events
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("event not found"))?;

        if let Err(error) = self.cache.put_event(&event).await {
            warn!(event_id = %id, %error, "event cache write failed");
        }
        Ok(EventView {
            event,
            cached: false,
        })
    }

    async fn list_sellable(&self) -> Result<SellableEvents, Error> {
        match self.cache.sellable_index().await {
            Ok(Some(event_ids)) => {
                return Ok(SellableEvents {
                    event_ids,
                    cached: true,
                });
            }
            Ok(None) => {}
            Err(error) => warn!(%error, "sellable index read failed"),
        }

        let events = self
            .events
            .list_all()
            .await
            .map_err(Self::map_repository_error)?;
        let event_ids = sellable_event_ids(&events, self.clock.utc());

        for event in events.iter().filter(|event| event_ids.contains(event.id())) {
            if let Err(error) = self.cache.put_event(event).await {
                warn!(event_id = %event.id(), %error, "event cache write failed");
            }
        }
        if let Err(error) = self.cache.store_sellable_index(&event_ids).await {
            warn!(%error, "sellable index write failed");
        }

        Ok(SellableEvents {
            event_ids,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CatalogueCacheError, MockCatalogueCache, MockEventRepository};
    use crate::domain::{ErrorCode, Event, EventDetails, TicketType, TicketTypeId};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use mockable::MockClock;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0)
            .single()
            .expect("timestamp")
    }

    fn clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now());
        Arc::new(clock)
    }

    fn event(id: &str, remaining: u32, days_ahead: i64) -> Event {
        Event::new(
            EventId::new(id).expect("event id"),
            EventDetails {
                title: id.to_owned(),
                city: None,
                venue: None,
                category: None,
                starts_at: now() + Duration::days(days_ahead),
                duration_minutes: None,
                age_restriction: None,
            },
            None,
            vec![TicketType {
                id: TicketTypeId::new("GA").expect("ticket id"),
                price: dec!(30),
                remaining,
            }],
        )
        .expect("valid event")
    }

    #[rstest]
    #[tokio::test]
    async fn cached_event_skips_repository() {
        let cached = event("e1", 4, 3);
        let mut cache = MockCatalogueCache::new();
        cache
            .expect_get_event()
            .return_once(move |_| Ok(Some(cached)));
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().never();

        let service = CatalogueService::new(Arc::new(events), Arc::new(cache), clock());
        let view = service
            .get_event(&EventId::new("e1").expect("event id"))
            .await
            .expect("event");
        assert!(view.cached);
    }

    #[rstest]
    #[tokio::test]
    async fn cache_failure_reads_through_and_refills() {
        let stored = event("e1", 4, 3);
        let mut cache = MockCatalogueCache::new();
        cache
            .expect_get_event()
            .return_once(|_| Err(CatalogueCacheError::backend("timeout")));
        cache.expect_put_event().times(1).returning(|_| Ok(()));
        let mut events = MockEventRepository::new();
        events
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));

        let service = CatalogueService::new(Arc::new(events), Arc::new(cache), clock());
        let view = service
            .get_event(&EventId::new("e1").expect("event id"))
            .await
            .expect("event");
        assert!(!view.cached);
        assert_eq!(view.event.id().as_ref(), "e1");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_event_is_not_found() {
        let mut cache = MockCatalogueCache::new();
        cache.expect_get_event().return_once(|_| Ok(None));
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().return_once(|_| Ok(None));

        let service = CatalogueService::new(Arc::new(events), Arc::new(cache), clock());
        let err = service
            .get_event(&EventId::new("nope").expect("event id"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn sellable_index_is_rebuilt_lazily() {
        let mut cache = MockCatalogueCache::new();
        cache.expect_sellable_index().return_once(|| Ok(None));
        cache.expect_put_event().times(1).returning(|_| Ok(()));
        cache
            .expect_store_sellable_index()
            .withf(|ids| ids.len() == 1 && ids.iter().any(|id| id.as_ref() == "open"))
            .times(1)
            .returning(|_| Ok(()));
        let mut events = MockEventRepository::new();
        events.expect_list_all().return_once(|| {
            Ok(vec![
                event("open", 2, 5),
                event("drained", 0, 5),
                event("past", 9, -5),
            ])
        });

        let service = CatalogueService::new(Arc::new(events), Arc::new(cache), clock());
        let listing = service.list_sellable().await.expect("listing");
        assert!(!listing.cached);
        assert_eq!(listing.event_ids.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn cached_index_is_returned_as_is() {
        let mut cache = MockCatalogueCache::new();
        cache.expect_sellable_index().return_once(|| {
            Ok(Some(BTreeSet::from([EventId::new("e9").expect("event id")])))
        });
        let mut events = MockEventRepository::new();
        events.expect_list_all().never();

        let service = CatalogueService::new(Arc::new(events), Arc::new(cache), clock());
        let listing = service.list_sellable().await.expect("listing");
        assert!(listing.cached);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_outage_is_unavailable() {
        let mut cache = MockCatalogueCache::new();
        cache.expect_sellable_index().return_once(|| Ok(None));
        let mut events = MockEventRepository::new();
        events
            .expect_list_all()
            .return_once(|| Err(EventRepositoryError::connection("refused")));

        let service = CatalogueService::new(Arc::new(events), Arc::new(cache), clock());
        let err = service.list_sellable().await.expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
