//! Catalogue read endpoints.
//!
//! ```text
//! GET /api/v1/events
//! GET /api/v1/events/{eventId}
//! ```

use std::collections::BTreeSet;

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Event, EventId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, EventSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_event_id};

/// Single event payload; `cached` reports a cache hit.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    #[schema(example = true)]
    pub ok: bool,
    pub cached: bool,
    #[schema(value_type = EventSchema)]
    pub event: Event,
}

/// Identifiers of events that can still be bought.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellableEventsResponse {
    #[schema(example = true)]
    pub ok: bool,
    pub cached: bool,
    #[schema(value_type = Vec<String>, example = json!(["jazz-night-2026"]))]
    pub event_ids: BTreeSet<EventId>,
}

/// List sellable events.
///
/// Served from the sellable index when it exists, otherwise rebuilt from the
/// catalogue and written back to the cache.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Sellable event identifiers", body = SellableEventsResponse),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listSellableEvents"
)]
#[get("/events")]
pub async fn list_events(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let sellable = state.events.list_sellable().await?;
    Ok(HttpResponse::Ok().json(SellableEventsResponse {
        ok: true,
        cached: sellable.cached,
        event_ids: sellable.event_ids,
    }))
}

/// Fetch one event with its ticket types.
#[utoipa::path(
    get,
    path = "/api/v1/events/{eventId}",
    params(("eventId" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 400, description = "Malformed event id", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{event_id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let event_id = parse_event_id(&path.into_inner(), FieldName::new("eventId"))?;
    let view = state.events.get_event(&event_id).await?;
    Ok(HttpResponse::Ok().json(EventResponse {
        ok: true,
        cached: view.cached,
        event: view.event,
    }))
}
