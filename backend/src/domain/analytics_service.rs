//! Analytics service over the order ledger and event catalogue.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    AnalyticsQuery, CatalogueCache, EventRepository, EventRepositoryError, OrderLedger,
    OrderLedgerError, TopEventsView,
};
use crate::domain::{
    CityEvent, Error, OrganizerDuration, TopEvent, TopEventsLimit, events_in_city,
    organizer_durations,
};

/// Service implementing [`AnalyticsQuery`].
pub struct AnalyticsService<L, E> {
    ledger: Arc<L>,
    events: Arc<E>,
    cache: Arc<dyn CatalogueCache>,
}

impl<L, E> AnalyticsService<L, E> {
    /// Analytics over the ledger and catalogue, cached in `cache`.
    pub fn new(ledger: Arc<L>, events: Arc<E>, cache: Arc<dyn CatalogueCache>) -> Self {
        Self {
            ledger,
            events,
            cache,
        }
    }
}

impl<L, E> AnalyticsService<L, E>
where
    L: OrderLedger,
    E: EventRepository,
{
    fn map_ledger_error(error: OrderLedgerError) -> Error {
        match error {
            OrderLedgerError::Connection { message } => {
                Error::service_unavailable(format!("order ledger unavailable: {message}"))
            }
            OrderLedgerError::Query { message } => {
                Error::internal(format!("order ledger error: {message}"))
            }
        }
    }

    fn map_events_error(error: EventRepositoryError) -> Error {
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
impl<L, E> AnalyticsQuery for AnalyticsService<L, E>
where
    L: OrderLedger,
    E: EventRepository,
{
    async fn top_events(&self, limit: TopEventsLimit) -> Result<TopEventsView, Error> {
        match self.cache.top_events(limit).await {
            Ok(Some(events)) => {
                return Ok(TopEventsView {
                    events,
                    cached: true,
                });
            }
            Ok(None) => {}
            Err(error) => warn!(%error, "top events cache read failed"),
        }

        let sales = self
            .ledger
            .tickets_sold_by_event(limit.get())
            .await
            .map_err(Self::map_ledger_error)?;

        // Sales for events no longer in the catalogue are dropped.
        let mut events = Vec::with_capacity(sales.len());
        for entry in &sales {
            if let Some(event) = self
                .events
                .find_by_id(&entry.event_id)
                .await
                .map_err(Self::map_events_error)?
            {
                events.push(TopEvent::from_sales(entry, &event));
            }
        }

        if let Err(error) = self.cache.put_top_events(limit, &events).await {
            warn!(%error, "top events cache write failed");
        }
        Ok(TopEventsView {
            events,
            cached: false,
        })
    }

    async fn events_in_city(&self, city: &str) -> Result<Vec<CityEvent>, Error> {
        if city.trim().is_empty() {
            return Err(Error::invalid_request("city must not be empty"));
        }
        let events = self
            .events
            .list_all()
            .await
            .map_err(Self::map_events_error)?;
        Ok(events_in_city(&events, city))
    }

    async fn organizer_durations(&self) -> Result<Vec<OrganizerDuration>, Error> {
        let events = self
            .events
            .list_all()
            .await
            .map_err(Self::map_events_error)?;
        Ok(organizer_durations(&events))
    }
}
