//! Driving port for ticket purchases.
//!
//! Inbound adapters hand a validated [`PurchaseRequest`] to this port and
//! receive either the committed order or a domain [`Error`] carrying the
//! failure reason.

use async_trait::async_trait;

use crate::domain::{Error, Order, PurchaseRequest};

/// Domain use-case port for committing purchases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseCommand: Send + Sync {
    /// Reserve tickets and record the order.
    async fn purchase(&self, request: PurchaseRequest) -> Result<Order, Error>;
}
