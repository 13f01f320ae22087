//! Analytics endpoints.
//!
//! ```text
//! GET /api/v1/analytics/top-events?limit=5
//! GET /api/v1/analytics/events-by-city?city=Vilnius
//! GET /api/v1/analytics/organizer-durations
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CityEvent, OrganizerDuration, TopEvent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CityEventSchema, ErrorSchema, OrganizerDurationSchema, TopEventSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_limit, require_text};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopEventsParams {
    /// Number of events to return, 1 to 50. Defaults to 3.
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityParams {
    /// City name, matched case-insensitively.
    pub city: Option<String>,
}

/// Ranking of events by tickets sold.
#[derive(Debug, Serialize, ToSchema)]
pub struct TopEventsResponse {
    #[schema(example = true)]
    pub ok: bool,
    pub cached: bool,
    #[schema(value_type = Vec<TopEventSchema>)]
    pub events: Vec<TopEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CityEventsResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = "Vilnius")]
    pub city: String,
    #[schema(value_type = Vec<CityEventSchema>)]
    pub events: Vec<CityEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrganizerDurationsResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(value_type = Vec<OrganizerDurationSchema>)]
    pub organizers: Vec<OrganizerDuration>,
}

/// Events ranked by tickets sold, cached per limit.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/top-events",
    params(TopEventsParams),
    responses(
        (status = 200, description = "Top events", body = TopEventsResponse),
        (status = 400, description = "Limit out of range", body = ErrorSchema),
        (status = 503, description = "Ledger unavailable", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "topEvents"
)]
#[get("/analytics/top-events")]
pub async fn top_events(
    state: web::Data<HttpState>,
    query: web::Query<TopEventsParams>,
) -> ApiResult<HttpResponse> {
    let limit = parse_limit(query.limit, FieldName::new("limit"))?;
    let view = state.analytics.top_events(limit).await?;
    Ok(HttpResponse::Ok().json(TopEventsResponse {
        ok: true,
        cached: view.cached,
        events: view.events,
    }))
}

/// Events held in one city, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/events-by-city",
    params(CityParams),
    responses(
        (status = 200, description = "Events in the city", body = CityEventsResponse),
        (status = 400, description = "Missing city", body = ErrorSchema),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "eventsByCity"
)]
#[get("/analytics/events-by-city")]
pub async fn events_by_city(
    state: web::Data<HttpState>,
    query: web::Query<CityParams>,
) -> ApiResult<HttpResponse> {
    let city = require_text(query.into_inner().city, FieldName::new("city"))?;
    let city = city.trim().to_owned();
    let events = state.analytics.events_in_city(&city).await?;
    Ok(HttpResponse::Ok().json(CityEventsResponse {
        ok: true,
        city,
        events,
    }))
}

/// Average event duration per organiser, longest first.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/organizer-durations",
    responses(
        (status = 200, description = "Average durations", body = OrganizerDurationsResponse),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "organizerDurations"
)]
#[get("/analytics/organizer-durations")]
pub async fn organizer_durations(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let organizers = state.analytics.organizer_durations().await?;
    Ok(HttpResponse::Ok().json(OrganizerDurationsResponse {
        ok: true,
        organizers,
    }))
}
