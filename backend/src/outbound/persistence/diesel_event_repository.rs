//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! Events and their ticket types are stored in separate tables. Reads join
//! them back together ordered by `position` so positional purchase hints keep
//! working after a round trip.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventDetails, EventId, Organizer, TicketType, TicketTypeId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventRow, TicketTypeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{events, ticket_types};

/// Diesel-backed implementation of the [`EventRepository`] port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, EventRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> EventRepositoryError {
    EventRepositoryError::query(format!("stored {what} is invalid: {err}"))
}

fn row_to_event(row: EventRow, tiers: Vec<TicketTypeRow>) -> Result<Event, EventRepositoryError> {
    let id = EventId::new(&row.id).map_err(|err| corrupt("event id", err))?;
    let ticket_types = tiers
        .into_iter()
        .map(|tier| {
            Ok(TicketType {
                id: TicketTypeId::new(&tier.ticket_type_id)
                    .map_err(|err| corrupt("ticket type id", err))?,
                price: tier.price,
                remaining: u32::try_from(tier.remaining)
                    .map_err(|err| corrupt("ticket remainder", err))?,
            })
        })
        .collect::<Result<Vec<_>, EventRepositoryError>>()?;

    let organizer = row.organizer_name.map(|name| Organizer {
        name,
        contact: row.organizer_contact,
    });
    let details = EventDetails {
        title: row.title,
        city: row.city,
        venue: row.venue,
        category: row.category,
        starts_at: row.starts_at,
        duration_minutes: row
            .duration_minutes
            .map(u32::try_from)
            .transpose()
            .map_err(|err| corrupt("duration", err))?,
        age_restriction: row
            .age_restriction
            .map(u8::try_from)
            .transpose()
            .map_err(|err| corrupt("age restriction", err))?,
    };

    Event::new(id, details, organizer, ticket_types).map_err(|err| corrupt("event", err))
}

fn event_to_rows(event: &Event) -> Result<(EventRow, Vec<TicketTypeRow>), EventRepositoryError> {
    let details = event.details();
    let event_row = EventRow {
        id: event.id().to_string(),
        title: details.title.clone(),
        city: details.city.clone(),
        venue: details.venue.clone(),
        category: details.category.clone(),
        starts_at: details.starts_at,
        duration_minutes: details
            .duration_minutes
            .map(i32::try_from)
            .transpose()
            .map_err(|err| EventRepositoryError::query(format!("duration out of range: {err}")))?,
        age_restriction: details.age_restriction.map(i16::from),
        organizer_name: event.organizer().map(|organizer| organizer.name.clone()),
        organizer_contact: event.organizer().and_then(|organizer| organizer.contact.clone()),
    };

    let tiers = event
        .ticket_types()
        .iter()
        .enumerate()
        .map(|(position, tier)| {
            Ok(TicketTypeRow {
                event_id: event.id().to_string(),
                ticket_type_id: tier.id.to_string(),
                position: i32::try_from(position).map_err(|err| {
                    EventRepositoryError::query(format!("too many ticket types: {err}"))
                })?,
                price: tier.price,
                remaining: i32::try_from(tier.remaining).map_err(|err| {
                    EventRepositoryError::query(format!("remainder out of range: {err}"))
                })?,
            })
        })
        .collect::<Result<Vec<_>, EventRepositoryError>>()?;

    Ok((event_row, tiers))
}

fn assemble(
    rows: Vec<EventRow>,
    tiers: Vec<TicketTypeRow>,
) -> Result<Vec<Event>, EventRepositoryError> {
    let mut grouped: HashMap<String, Vec<TicketTypeRow>> = HashMap::new();
    for tier in tiers {
        grouped.entry(tier.event_id.clone()).or_default().push(tier);
    }
    rows.into_iter()
        .map(|row| {
            let tiers = grouped.remove(&row.id).unwrap_or_default();
            row_to_event(row, tiers)
        })
        .collect()
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = events::table
            .filter(events::id.eq(id.as_ref()))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let tiers = ticket_types::table
            .filter(ticket_types::event_id.eq(id.as_ref()))
            .order(ticket_types::position.asc())
            .select(TicketTypeRow::as_select())
            .load::<TicketTypeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_event(row, tiers).map(Some)
    }

    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = events::table
            .order((events::starts_at.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load::<EventRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let tiers = ticket_types::table
            .order((ticket_types::event_id.asc(), ticket_types::position.asc()))
            .select(TicketTypeRow::as_select())
            .load::<TicketTypeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        assemble(rows, tiers)
    }

    async fn upsert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let (event_row, tiers) = event_to_rows(event)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(events::table)
                    .values(&event_row)
                    .on_conflict(events::id)
                    .do_update()
                    .set(&event_row)
                    .execute(conn)
                    .await?;

                diesel::delete(
                    ticket_types::table.filter(ticket_types::event_id.eq(&event_row.id)),
                )
                .execute(conn)
                .await?;

                if !tiers.is_empty() {
                    diesel::insert_into(ticket_types::table)
                        .values(&tiers)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
