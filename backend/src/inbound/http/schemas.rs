//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their JSON shape and are referenced from handler DTOs
//! through `#[schema(value_type = ...)]`.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa derive output"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// Lost a race against a concurrent purchase or duplicates a resource.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Failure envelope returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Always `false`.
    #[schema(example = false)]
    ok: bool,
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "not enough tickets; remaining: 3")]
    message: String,
    #[schema(example = "6f1c2b1e-8f0a-4d55-9f3e-0f4a8f5b2c11")]
    trace_id: Option<String>,
    /// Structured reason, e.g. `{ "code": "insufficient_inventory", "remaining": 3 }`.
    details: Option<serde_json::Value>,
}

/// One purchased ticket type.
#[derive(ToSchema)]
#[schema(as = crate::domain::OrderLine)]
#[schema(rename_all = "camelCase")]
pub struct OrderLineSchema {
    #[schema(example = "jazz-night-2026")]
    event_id: String,
    #[schema(example = "standard")]
    ticket_type_id: String,
    #[schema(example = 2)]
    quantity: u32,
    /// Exact decimal string captured at purchase time.
    #[schema(example = "25.00")]
    unit_price: String,
}

/// Committed order.
#[derive(ToSchema)]
#[schema(as = crate::domain::Order)]
#[schema(rename_all = "camelCase")]
pub struct OrderSchema {
    #[schema(format = Uuid)]
    id: String,
    #[schema(example = "ada@example.com")]
    user_id: String,
    #[schema(format = DateTime)]
    placed_at: String,
    lines: Vec<OrderLineSchema>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::TicketType)]
pub struct TicketTypeSchema {
    id: String,
    #[schema(example = "25.00")]
    price: String,
    remaining: u32,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Organizer)]
pub struct OrganizerSchema {
    name: String,
    contact: Option<String>,
}

/// Catalogue event with its ticket types in stored order.
#[derive(ToSchema)]
#[schema(as = crate::domain::Event)]
#[schema(rename_all = "camelCase")]
pub struct EventSchema {
    id: String,
    title: String,
    city: Option<String>,
    venue: Option<String>,
    category: Option<String>,
    #[schema(format = DateTime)]
    starts_at: String,
    duration_minutes: Option<u32>,
    age_restriction: Option<u8>,
    organizer: Option<OrganizerSchema>,
    ticket_types: Vec<TicketTypeSchema>,
}

/// Registered user without credentials.
#[derive(ToSchema)]
#[schema(as = crate::domain::PublicUser)]
#[schema(rename_all = "camelCase")]
pub struct PublicUserSchema {
    #[schema(example = "ada@example.com")]
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    #[schema(format = Date)]
    birth_date: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    interests: Vec<String>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::TopEvent)]
#[schema(rename_all = "camelCase")]
pub struct TopEventSchema {
    event_id: String,
    tickets_sold: u64,
    title: String,
    #[schema(format = DateTime)]
    starts_at: String,
    city: Option<String>,
    venue: Option<String>,
    category: Option<String>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::CityEvent)]
#[schema(rename_all = "camelCase")]
pub struct CityEventSchema {
    event_id: String,
    title: String,
    #[schema(format = DateTime)]
    starts_at: String,
    tickets: Vec<TicketTypeSchema>,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::OrganizerDuration)]
#[schema(rename_all = "camelCase")]
pub struct OrganizerDurationSchema {
    organizer: String,
    #[schema(example = "95.50")]
    average_minutes: String,
    events_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_domain_name_and_camel_case() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("\"ok\""));
    }

    #[test]
    fn order_schema_exposes_unit_price() {
        assert_eq!(OrderSchema::name(), "crate.domain.Order");
        assert!(schema_to_json::<OrderLineSchema>().contains("unitPrice"));
    }
}
