//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed ticketing model and the services that
//! implement the driving ports. Types keep their invariants behind validating
//! constructors and document their serde contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Event, Order and their identifiers.
//! - `resolve_ticket_type`: the ticket type selection rules.
//! - ReservationService: the purchase implementation.
//! - Catalogue, registration, analytics and order services.
//! - Mirror fan-out (`MirrorPublisher`, `MirrorDispatcher`).

pub mod analytics;
pub mod analytics_service;
pub mod auth;
pub mod catalogue_service;
pub mod error;
pub mod event;
pub mod mirror;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod purchase;
pub mod registration_service;
pub mod reservation_service;
pub mod sellable_index;
pub mod ticket_resolver;
pub mod trace_id;
pub mod user;

pub use self::analytics::{
    CityEvent, EventSales, OrganizerDuration, TOP_EVENTS_DEFAULT, TOP_EVENTS_MAX, TopEvent,
    TopEventsLimit, events_in_city, organizer_durations, rank_sales,
};
pub use self::analytics_service::AnalyticsService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode};
pub use self::event::{
    Event, EventDetails, EventId, EventValidationError, Organizer, TicketType, TicketTypeId,
};
pub use self::mirror::{
    CoreFact, FactEnvelope, MirrorDispatcher, MirrorPublisher, mirror_channel,
};
pub use self::order::{Order, OrderId, OrderLine, OrderValidationError};
pub use self::order_service::OrderQueryService;
pub use self::purchase::{PurchaseError, PurchaseRequest};
pub use self::registration_service::RegistrationService;
pub use self::reservation_service::ReservationService;
pub use self::sellable_index::{
    ReconcileError, ReconcileOutcome, SellableIndexReconciler, sellable_event_ids,
};
pub use self::ticket_resolver::{TicketHints, resolve_ticket_type};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PasswordHash, PublicUser, User, UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ticketing::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
