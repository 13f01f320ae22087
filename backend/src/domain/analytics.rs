//! Read-side analytics over the catalogue and the order ledger.
//!
//! The aggregations here are pure functions over domain values so they can be
//! shared by every storage backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Event, EventId, TicketType};

/// Default number of entries in the top events ranking.
pub const TOP_EVENTS_DEFAULT: u8 = 3;
/// Largest accepted top events limit.
pub const TOP_EVENTS_MAX: u8 = 50;
/// Label used for organisers recorded without a name.
pub const UNNAMED_ORGANIZER: &str = "(unnamed)";

/// Validated limit for the top events ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopEventsLimit(u8);

impl TopEventsLimit {
    /// Accept limits within `1..=TOP_EVENTS_MAX`.
    pub fn new(limit: u32) -> Option<Self> {
        u8::try_from(limit)
            .ok()
            .filter(|value| (1..=TOP_EVENTS_MAX).contains(value))
            .map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for TopEventsLimit {
    fn default() -> Self {
        Self(TOP_EVENTS_DEFAULT)
    }
}

/// Tickets sold for one event, as summed by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSales {
    pub event_id: EventId,
    pub tickets_sold: u64,
}

/// Ranked event with its display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopEvent {
    pub event_id: EventId,
    pub tickets_sold: u64,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub category: Option<String>,
}

impl TopEvent {
    /// Join ledger totals with the event's display fields.
    pub fn from_sales(sales: &EventSales, event: &Event) -> Self {
        let details = event.details();
        Self {
            event_id: sales.event_id.clone(),
            tickets_sold: sales.tickets_sold,
            title: details.title.clone(),
            starts_at: details.starts_at,
            city: details.city.clone(),
            venue: details.venue.clone(),
            category: details.category.clone(),
        }
    }
}

/// Event listed by city together with its ticket summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityEvent {
    pub event_id: EventId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub tickets: Vec<TicketType>,
}

/// Average event duration for one organiser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDuration {
    pub organizer: String,
    /// Mean duration in minutes, rounded to two decimal places.
    pub average_minutes: Decimal,
    pub events_count: u32,
}

/// Events whose city matches `city`, ignoring case and surrounding
/// whitespace, ordered by start time.
pub fn events_in_city(events: &[Event], city: &str) -> Vec<CityEvent> {
    let wanted = city.trim().to_lowercase();
    let mut matches: Vec<CityEvent> = events
        .iter()
        .filter(|event| {
            event
                .details()
                .city
                .as_deref()
                .is_some_and(|value| value.trim().to_lowercase() == wanted)
        })
        .map(|event| CityEvent {
            event_id: event.id().clone(),
            title: event.details().title.clone(),
            starts_at: event.details().starts_at,
            tickets: event.ticket_types().to_vec(),
        })
        .collect();
    matches.sort_by(|a, b| {
        a.starts_at
            .cmp(&b.starts_at)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    matches
}

/// Average duration per organiser, longest first.
///
/// Events without an organiser are skipped. A missing duration counts as zero
/// minutes.
pub fn organizer_durations(events: &[Event]) -> Vec<OrganizerDuration> {
    let mut totals: BTreeMap<String, (Decimal, u32)> = BTreeMap::new();
    for event in events {
        let Some(organizer) = event.organizer() else {
            continue;
        };
        let name = if organizer.name.trim().is_empty() {
            UNNAMED_ORGANIZER.to_owned()
        } else {
            organizer.name.clone()
        };
        let minutes = Decimal::from(event.details().duration_minutes.unwrap_or(0));
        let entry = totals.entry(name).or_insert((Decimal::ZERO, 0));
        entry.0 += minutes;
        entry.1 += 1;
    }

    let mut averages: Vec<OrganizerDuration> = totals
        .into_iter()
        .map(|(organizer, (total, count))| OrganizerDuration {
            organizer,
            average_minutes: (total / Decimal::from(count)).round_dp(2),
            events_count: count,
        })
        .collect();
    averages.sort_by(|a, b| {
        b.average_minutes
            .cmp(&a.average_minutes)
            .then_with(|| a.organizer.cmp(&b.organizer))
    });
    averages
}

/// Order sales by tickets sold descending, then event id, and truncate.
pub fn rank_sales(mut sales: Vec<EventSales>, limit: TopEventsLimit) -> Vec<EventSales> {
    sales.sort_by(|a, b| {
        b.tickets_sold
            .cmp(&a.tickets_sold)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    sales.truncate(usize::from(limit.get()));
    sales
}
