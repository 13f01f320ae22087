//! Driving port for reading committed orders.
use async_trait::async_trait;

use crate::domain::{Error, Order, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Fetch an order by identifier.
    async fn get_order(&self, id: OrderId) -> Result<Order, Error>;
}
