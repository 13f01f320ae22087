//! Committed orders recorded in the ledger.
//!
//! Orders are immutable: the reservation flow inserts them once and nothing
//! updates or deletes them afterwards. Unit prices are snapshots taken when
//! availability was checked.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EventId, TicketTypeId, UserId};

/// System-generated order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read from storage.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// One purchased ticket type within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub event_id: EventId,
    pub ticket_type_id: TicketTypeId,
    pub quantity: u32,
    /// Price per unit at purchase time.
    pub unit_price: Decimal,
}

impl OrderLine {
    /// Quantity multiplied by the unit price.
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Validation errors raised by [`Order::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    #[error("order must contain at least one line")]
    NoLines,
    #[error("order line {line} has a zero quantity")]
    ZeroQuantity { line: usize },
}

/// Committed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    placed_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Build an order, requiring at least one line and positive quantities.
    pub fn new(
        id: OrderId,
        user_id: UserId,
        placed_at: DateTime<Utc>,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderValidationError> {
        if lines.is_empty() {
            return Err(OrderValidationError::NoLines);
        }
        if let Some(line) = lines.iter().position(|line| line.quantity == 0) {
            return Err(OrderValidationError::ZeroQuantity { line });
        }
        Ok(Self {
            id,
            user_id,
            placed_at,
            lines,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn line(quantity: u32) -> OrderLine {
        OrderLine {
            event_id: EventId::new("e1").expect("event id"),
            ticket_type_id: TicketTypeId::new("A").expect("ticket id"),
            quantity,
            unit_price: dec!(12.50),
        }
    }

    fn user() -> UserId {
        UserId::new("ada@example.com").expect("user id")
    }

    #[rstest]
    fn rejects_empty_orders() {
        let err = Order::new(OrderId::generate(), user(), Utc::now(), Vec::new())
            .expect_err("no lines");
        assert_eq!(err, OrderValidationError::NoLines);
    }

    #[rstest]
    fn rejects_zero_quantities() {
        let err = Order::new(
            OrderId::generate(),
            user(),
            Utc::now(),
            vec![line(1), line(0)],
        )
        .expect_err("zero quantity");
        assert_eq!(err, OrderValidationError::ZeroQuantity { line: 1 });
    }

    #[rstest]
    fn line_total_is_exact() {
        assert_eq!(line(3).total(), dec!(37.50));
    }

    #[rstest]
    fn serialises_lines_with_string_prices() {
        let order = Order::new(OrderId::generate(), user(), Utc::now(), vec![line(2)])
            .expect("valid order");
        let value = serde_json::to_value(&order).expect("serialise order");
        assert_eq!(value.get("userId"), Some(&json!("ada@example.com")));
        assert_eq!(value.pointer("/lines/0/unitPrice"), Some(&json!("12.50")));
        assert_eq!(value.pointer("/lines/0/ticketTypeId"), Some(&json!("A")));
    }

    #[rstest]
    fn order_id_round_trips_through_display() {
        let id = OrderId::generate();
        let parsed: OrderId = id.to_string().parse().expect("parse id");
        assert_eq!(parsed, id);
    }
}
