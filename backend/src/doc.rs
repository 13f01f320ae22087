//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP path together with the schema
//! wrappers from [`crate::inbound::http::schemas`], keeping domain types free
//! of utoipa derives. The document backs Swagger UI in debug builds and is
//! exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::analytics::{
    CityEventsResponse, OrganizerDurationsResponse, TopEventsResponse,
};
use crate::inbound::http::events::{EventResponse, SellableEventsResponse};
use crate::inbound::http::purchase::{OrderResponse, PurchaseRequestBody, PurchaseResponse};
use crate::inbound::http::schemas::{
    CityEventSchema, ErrorCodeSchema, ErrorSchema, EventSchema, OrderLineSchema, OrderSchema,
    OrganizerDurationSchema, OrganizerSchema, PublicUserSchema, TicketTypeSchema, TopEventSchema,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ticketing backend API",
        description = "Event catalogue, ticket purchases, accounts and sales analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::purchase::purchase,
        crate::inbound::http::purchase::get_order,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::analytics::top_events,
        crate::inbound::http::analytics::events_by_city,
        crate::inbound::http::analytics::organizer_durations,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        OrderSchema,
        OrderLineSchema,
        EventSchema,
        TicketTypeSchema,
        OrganizerSchema,
        PublicUserSchema,
        TopEventSchema,
        CityEventSchema,
        OrganizerDurationSchema,
        PurchaseRequestBody,
        PurchaseResponse,
        OrderResponse,
        EventResponse,
        SellableEventsResponse,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        TopEventsResponse,
        CityEventsResponse,
        OrganizerDurationsResponse,
    )),
    tags(
        (name = "purchases", description = "Ticket purchases and committed orders"),
        (name = "events", description = "Event catalogue"),
        (name = "users", description = "Registration and login"),
        (name = "analytics", description = "Sales and catalogue reports"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
