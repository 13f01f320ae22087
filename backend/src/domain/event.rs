//! Event catalogue model.
//!
//! An [`Event`] owns an ordered list of [`TicketType`] entries. The order is
//! significant: positional ticket hints index into it, so adapters must
//! preserve it when persisting and loading events.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum identifier length accepted for events and ticket types.
pub const CATALOGUE_ID_MAX: usize = 128;

/// Decimal places a stored price may carry.
pub const PRICE_SCALE_MAX: u32 = 2;

/// Integer digits a stored price may carry.
pub const PRICE_INTEGER_DIGITS: u32 = 10;

/// Validation errors for catalogue identifiers and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Identifier is blank after trimming.
    EmptyId,
    /// Identifier exceeds [`CATALOGUE_ID_MAX`] characters.
    IdTooLong { max: usize },
    /// Two ticket types share an identifier.
    DuplicateTicketType { id: String },
    /// Ticket type priced below zero.
    NegativePrice { id: String },
    /// Ticket type price has more than [`PRICE_SCALE_MAX`] decimal places or
    /// more than [`PRICE_INTEGER_DIGITS`] integer digits.
    InvalidPrice { id: String },
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identifier must not be empty"),
            Self::IdTooLong { max } => write!(f, "identifier must be at most {max} characters"),
            Self::DuplicateTicketType { id } => {
                write!(f, "ticket type {id} appears more than once")
            }
            Self::NegativePrice { id } => write!(f, "ticket type {id} has a negative price"),
            Self::InvalidPrice { id } => write!(
                f,
                "ticket type {id} price must have at most {PRICE_INTEGER_DIGITS} integer digits \
                 and {PRICE_SCALE_MAX} decimal places"
            ),
        }
    }
}

impl std::error::Error for EventValidationError {}

macro_rules! catalogue_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier. Surrounding whitespace
            /// is trimmed.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, EventValidationError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(EventValidationError::EmptyId);
                }
                if trimmed.chars().count() > CATALOGUE_ID_MAX {
                    return Err(EventValidationError::IdTooLong {
                        max: CATALOGUE_ID_MAX,
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = EventValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

catalogue_identifier! {
    /// Unique event identifier.
    ///
    /// # Examples
    /// ```
    /// use ticketing::domain::EventId;
    ///
    /// let id = EventId::new(" jazz-night ").expect("valid id");
    /// assert_eq!(id.as_ref(), "jazz-night");
    /// ```
    EventId
}

catalogue_identifier! {
    /// Ticket type identifier, unique within one event.
    TicketTypeId
}

/// Purchasable ticket tier embedded in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: TicketTypeId,
    /// Exact unit price. Serialised as a decimal string.
    pub price: Decimal,
    /// Unsold units.
    pub remaining: u32,
}

/// Event organiser metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Display fields describing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
    pub age_restriction: Option<u8>,
}

/// Catalogue event with its ordered ticket types.
///
/// ## Invariants
/// - Ticket type identifiers are unique within the list.
/// - Prices are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "EventDto", into = "EventDto")]
pub struct Event {
    id: EventId,
    details: EventDetails,
    organizer: Option<Organizer>,
    ticket_types: Vec<TicketType>,
}

impl Event {
    /// Build an event, enforcing the ticket type invariants.
    pub fn new(
        id: EventId,
        details: EventDetails,
        organizer: Option<Organizer>,
        ticket_types: Vec<TicketType>,
    ) -> Result<Self, EventValidationError> {
        let mut seen = HashSet::with_capacity(ticket_types.len());
        for ticket_type in &ticket_types {
            if !seen.insert(&ticket_type.id) {
                return Err(EventValidationError::DuplicateTicketType {
                    id: ticket_type.id.to_string(),
                });
            }
            if ticket_type.price.is_sign_negative() {
                return Err(EventValidationError::NegativePrice {
                    id: ticket_type.id.to_string(),
                });
            }
            if !price_fits_storage(ticket_type.price) {
                return Err(EventValidationError::InvalidPrice {
                    id: ticket_type.id.to_string(),
                });
            }
        }
        Ok(Self {
            id,
            details,
            organizer,
            ticket_types,
        })
    }

    /// Event identifier.
    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// Display fields.
    pub fn details(&self) -> &EventDetails {
        &self.details
    }

    /// Organiser metadata, if recorded.
    pub fn organizer(&self) -> Option<&Organizer> {
        self.organizer.as_ref()
    }

    /// Ticket types in stored order.
    pub fn ticket_types(&self) -> &[TicketType] {
        &self.ticket_types
    }

    /// Look up a ticket type by identifier.
    pub fn ticket_type(&self, id: &TicketTypeId) -> Option<&TicketType> {
        self.ticket_types.iter().find(|ticket| &ticket.id == id)
    }

    /// Conditionally decrement one ticket type.
    ///
    /// Returns `false` and leaves the event untouched when the tier is
    /// unknown or holds fewer than `quantity` units.
    pub fn take_tickets(&mut self, id: &TicketTypeId, quantity: u32) -> bool {
        match self.ticket_types.iter_mut().find(|ticket| &ticket.id == id) {
            Some(ticket) if ticket.remaining >= quantity => {
                ticket.remaining -= quantity;
                true
            }
            _ => false,
        }
    }

    /// Whether any ticket type still has unsold units.
    pub fn has_available(&self) -> bool {
        self.ticket_types.iter().any(|ticket| ticket.remaining > 0)
    }

    /// Whether the event belongs in the sellable index at `now`: it has
    /// availability and starts in the future.
    pub fn is_sellable_at(&self, now: DateTime<Utc>) -> bool {
        self.has_available() && self.details.starts_at > now
    }
}

/// Whether `price` round-trips through a `NUMERIC(12, 2)` column unchanged.
/// Trailing zeros do not count towards the scale.
fn price_fits_storage(price: Decimal) -> bool {
    let bound = Decimal::from(10_u64.pow(PRICE_INTEGER_DIGITS));
    price.normalize().scale() <= PRICE_SCALE_MAX && price.abs() < bound
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDto {
    id: EventId,
    #[serde(flatten)]
    details: EventDetails,
    #[serde(default)]
    organizer: Option<Organizer>,
    #[serde(default)]
    ticket_types: Vec<TicketType>,
}

impl From<Event> for EventDto {
    fn from(value: Event) -> Self {
        Self {
            id: value.id,
            details: value.details,
            organizer: value.organizer,
            ticket_types: value.ticket_types,
        }
    }
}

impl TryFrom<EventDto> for Event {
    type Error = EventValidationError;

    fn try_from(value: EventDto) -> Result<Self, Self::Error> {
        Self::new(value.id, value.details, value.organizer, value.ticket_types)
    }
}
