//! Port for the transactional decrement-and-record step of a purchase.
//!
//! Implementations must make the inventory decrement and the order insert a
//! single atomic unit: either both are visible afterwards or neither is.

use async_trait::async_trait;

use crate::domain::Order;

use super::define_port_error;

define_port_error! {
    /// Errors raised by reservation store adapters.
    pub enum ReservationStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "reservation store connection failed: {message}",
        /// Query or mutation failed during execution. The transaction was
        /// rolled back.
        Query { message: String } => "reservation store query failed: {message}",
        /// The conditional decrement matched no row because the remainder
        /// dropped below the requested quantity. Nothing was written.
        InventoryConflict { event_id: String, ticket_type_id: String } =>
            "inventory for {event_id}/{ticket_type_id} changed concurrently",
    }
}

/// Atomic reservation boundary spanning the catalogue and the ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Reserve inventory for every line of `order` and record it.
    ///
    /// Each line runs a conditional decrement scoped by its
    /// `(event_id, ticket_type_id)` pair, applied only while the stored
    /// remainder is at least the line quantity. If any decrement affects zero
    /// rows the whole unit aborts with
    /// [`ReservationStoreError::InventoryConflict`]. The order is inserted only
    /// after every decrement succeeded, inside the same transaction.
    async fn commit(&self, order: &Order) -> Result<(), ReservationStoreError>;
}
