//! Read port over the append-only order ledger.
use async_trait::async_trait;

use crate::domain::{EventSales, Order, OrderId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order ledger adapters.
    pub enum OrderLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } => "order ledger connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "order ledger query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Fetch a committed order with its lines.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderLedgerError>;

    /// Summed line quantities per event, highest first, ties broken by event
    /// identifier, truncated to `limit` entries.
    async fn tickets_sold_by_event(&self, limit: u8) -> Result<Vec<EventSales>, OrderLedgerError>;
}
