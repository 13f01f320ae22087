//! Driving port for analytics reads.
use async_trait::async_trait;

use crate::domain::{CityEvent, Error, OrganizerDuration, TopEvent, TopEventsLimit};

/// Top events ranking together with whether it came from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopEventsView {
    pub events: Vec<TopEvent>,
    pub cached: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsQuery: Send + Sync {
    /// Events ranked by tickets sold.
    async fn top_events(&self, limit: TopEventsLimit) -> Result<TopEventsView, Error>;

    /// Events held in a city, ordered by start time.
    async fn events_in_city(&self, city: &str) -> Result<Vec<CityEvent>, Error>;

    /// Average event duration per organiser.
    async fn organizer_durations(&self) -> Result<Vec<OrganizerDuration>, Error>;
}
