//! Ticket type resolution for purchase requests.
//!
//! Clients identify the ticket type they want with zero or more hints. The
//! precedence is fixed: identifier, then exact price, then position, then the
//! single-entry default. A hint that fails to parse or matches nothing is
//! treated as absent and resolution moves on to the next rule.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::TicketType;

/// Disambiguating hints supplied with a purchase request.
///
/// Price and index hints are kept as raw strings so that malformed values
/// degrade to "absent" instead of failing request parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketHints {
    /// Exact ticket type identifier; wins when it matches.
    pub ticket_type_id: Option<String>,
    /// Decimal price to match against ticket type prices.
    pub price: Option<String>,
    /// Zero-based position in the event's ticket type list.
    pub index: Option<String>,
}

impl TicketHints {
    /// Hints naming an explicit ticket type.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            ticket_type_id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Resolve the position of the requested ticket type within `ticket_types`.
///
/// Returns `None` when no rule selects an entry.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use ticketing::domain::{TicketHints, TicketType, TicketTypeId, resolve_ticket_type};
///
/// let tickets = vec![
///     TicketType { id: TicketTypeId::new("A").unwrap(), price: Decimal::new(10, 0), remaining: 5 },
///     TicketType { id: TicketTypeId::new("B").unwrap(), price: Decimal::new(20, 0), remaining: 0 },
/// ];
/// let hints = TicketHints { price: Some("20.00".into()), ..TicketHints::default() };
/// assert_eq!(resolve_ticket_type(&tickets, &hints), Some(1));
/// ```
pub fn resolve_ticket_type(ticket_types: &[TicketType], hints: &TicketHints) -> Option<usize> {
    by_identifier(ticket_types, hints.ticket_type_id.as_deref())
        .or_else(|| by_price(ticket_types, hints.price.as_deref()))
        .or_else(|| by_position(ticket_types, hints.index.as_deref()))
        .or_else(|| (ticket_types.len() == 1).then_some(0))
}

fn by_identifier(ticket_types: &[TicketType], hint: Option<&str>) -> Option<usize> {
    let wanted = hint?;
    ticket_types
        .iter()
        .position(|ticket| ticket.id.as_ref() == wanted)
}

fn by_price(ticket_types: &[TicketType], hint: Option<&str>) -> Option<usize> {
    let wanted = Decimal::from_str(hint?.trim()).ok()?;
    ticket_types.iter().position(|ticket| ticket.price == wanted)
}

fn by_position(ticket_types: &[TicketType], hint: Option<&str>) -> Option<usize> {
    let index = hint?.trim().parse::<i64>().ok()?;
    let index = usize::try_from(index).ok()?;
    (index < ticket_types.len()).then_some(index)
}
