//! Purchase request and failure taxonomy for the reservation flow.

use serde_json::json;

use super::{Error, EventId, TicketHints, UserId};

/// Validated purchase request handed to the reservation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    /// Buyer; must already be registered.
    pub user_id: UserId,
    /// Event whose ticket types are searched.
    pub event_id: EventId,
    /// Hints selecting the ticket type.
    pub hints: TicketHints,
    /// Units to buy. Zero is rejected by the service.
    pub quantity: u32,
}

/// Reasons a purchase can fail.
///
/// Every variant leaves the inventory and the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    /// Requested quantity was zero.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    /// No user with the given identifier.
    #[error("user not found; register first")]
    UserNotFound,
    /// No event with the given identifier.
    #[error("event not found")]
    EventNotFound,
    /// The event exists but sells nothing.
    #[error("this event has no ticket types")]
    NoTicketTypes,
    /// None of the hints selected a ticket type.
    #[error("ticket type not found; provide a ticket type id, price or index")]
    TicketTypeNotFound,
    /// Fewer units left than requested.
    #[error("not enough tickets; remaining: {remaining}")]
    InsufficientInventory { remaining: u32 },
    /// Another purchase consumed the inventory between the check and the
    /// conditional decrement. Safe to retry unchanged.
    #[error("not enough tickets or ticket type changed by a concurrent purchase")]
    ConcurrentConflict,
    /// A backing store could not be reached.
    #[error("{message}")]
    Unavailable { message: String },
    /// A backing store failed unexpectedly.
    #[error("{message}")]
    Internal { message: String },
}

impl PurchaseError {
    /// Whether resubmitting the identical request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentConflict | Self::Unavailable { .. })
    }
}

impl From<PurchaseError> for Error {
    fn from(value: PurchaseError) -> Self {
        let message = value.to_string();
        let retryable = value.is_retryable();
        match value {
            PurchaseError::InvalidQuantity => Error::invalid_request(message).with_details(json!({
                "field": "quantity",
                "code": "invalid_quantity",
            })),
            PurchaseError::UserNotFound => {
                Error::not_found(message).with_details(json!({ "code": "user_not_found" }))
            }
            PurchaseError::EventNotFound => {
                Error::not_found(message).with_details(json!({ "code": "event_not_found" }))
            }
            PurchaseError::NoTicketTypes => {
                Error::not_found(message).with_details(json!({ "code": "no_ticket_types" }))
            }
            PurchaseError::TicketTypeNotFound => {
                Error::not_found(message).with_details(json!({ "code": "ticket_type_not_found" }))
            }
            PurchaseError::InsufficientInventory { remaining } => Error::invalid_request(message)
                .with_details(json!({
                    "code": "insufficient_inventory",
                    "remaining": remaining,
                })),
            PurchaseError::ConcurrentConflict => Error::conflict(message).with_details(json!({
                "code": "concurrent_update",
                "retryable": retryable,
            })),
            PurchaseError::Unavailable { .. } => {
                Error::service_unavailable(message).with_details(json!({
                    "code": "store_unavailable",
                    "retryable": retryable,
                }))
            }
            PurchaseError::Internal { .. } => Error::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(PurchaseError::InvalidQuantity, ErrorCode::InvalidRequest)]
    #[case(PurchaseError::UserNotFound, ErrorCode::NotFound)]
    #[case(PurchaseError::EventNotFound, ErrorCode::NotFound)]
    #[case(PurchaseError::NoTicketTypes, ErrorCode::NotFound)]
    #[case(PurchaseError::TicketTypeNotFound, ErrorCode::NotFound)]
    #[case(PurchaseError::InsufficientInventory { remaining: 3 }, ErrorCode::InvalidRequest)]
    #[case(PurchaseError::ConcurrentConflict, ErrorCode::Conflict)]
    #[case(PurchaseError::Unavailable { message: "db down".into() }, ErrorCode::ServiceUnavailable)]
    #[case(PurchaseError::Internal { message: "bug".into() }, ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] error: PurchaseError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn insufficient_inventory_discloses_remainder() {
        let error = Error::from(PurchaseError::InsufficientInventory { remaining: 3 });
        assert_eq!(error.message(), "not enough tickets; remaining: 3");
        assert_eq!(
            error.details().and_then(|d| d.get("remaining")),
            Some(&json!(3))
        );
    }

    #[rstest]
    #[case(PurchaseError::ConcurrentConflict, Some(true))]
    #[case(PurchaseError::Unavailable { message: "db down".into() }, Some(true))]
    #[case(PurchaseError::InsufficientInventory { remaining: 0 }, None)]
    #[case(PurchaseError::Internal { message: "bug".into() }, None)]
    fn retryable_failures_say_so_in_details(
        #[case] failure: PurchaseError,
        #[case] expected: Option<bool>,
    ) {
        assert_eq!(failure.is_retryable(), expected.is_some());
        let error = Error::from(failure);
        assert_eq!(
            error.details().and_then(|d| d.get("retryable")),
            expected.map(|flag| json!(flag)).as_ref()
        );
    }
}
