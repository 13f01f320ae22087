//! Order lookup service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{OrderLedger, OrderLedgerError, OrderQuery};
use crate::domain::{Error, Order, OrderId};

/// Service implementing [`OrderQuery`] over the ledger.
pub struct OrderQueryService<L> {
    ledger: Arc<L>,
}

impl<L> OrderQueryService<L> {
    /// Service answering order lookups from `ledger`.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl<L> OrderQuery for OrderQueryService<L>
where
    L: OrderLedger,
{
    async fn get_order(&self, id: OrderId) -> Result<Order, Error> {
        self.ledger
            .find_by_id(id)
            .await
            .map_err(|err| match err {
                OrderLedgerError::Connection { message } => {
                    Error::service_unavailable(format!("order ledger unavailable: {message}"))
                }
                OrderLedgerError::Query { message } => {
                    Error::internal(format!("order ledger error: {message}"))
                }
            })?
            .ok_or_else(|| Error::not_found("order not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockOrderLedger;

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let mut ledger = MockOrderLedger::new();
        ledger.expect_find_by_id().return_once(|_| Ok(None));
        let service = OrderQueryService::new(Arc::new(ledger));

        let err = service
            .get_order(OrderId::generate())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn query_failures_are_internal() {
        let mut ledger = MockOrderLedger::new();
        ledger
            .expect_find_by_id()
            .return_once(|_| Err(OrderLedgerError::query("syntax")));
        let service = OrderQueryService::new(Arc::new(ledger));

        let err = service
            .get_order(OrderId::generate())
            .await
            .expect_err("failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
