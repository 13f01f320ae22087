//! PostgreSQL-backed `OrderLedger` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrderLedger, OrderLedgerError};
use crate::domain::{EventId, EventSales, Order, OrderId, OrderLine, TicketTypeId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{OrderLineRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{order_lines, orders};

/// Diesel-backed implementation of the [`OrderLedger`] port.
#[derive(Clone)]
pub struct DieselOrderLedger {
    pool: DbPool,
}

impl DieselOrderLedger {
    /// Create a new ledger reader with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderLedgerError {
    map_basic_pool_error(error, OrderLedgerError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderLedgerError {
    map_basic_diesel_error(error, OrderLedgerError::query, OrderLedgerError::connection)
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> OrderLedgerError {
    OrderLedgerError::query(format!("stored {what} is invalid: {err}"))
}

fn rows_to_order(header: OrderRow, lines: Vec<OrderLineRow>) -> Result<Order, OrderLedgerError> {
    let lines = lines
        .into_iter()
        .map(|line| {
            Ok(OrderLine {
                event_id: EventId::new(&line.event_id).map_err(|err| corrupt("event id", err))?,
                ticket_type_id: TicketTypeId::new(&line.ticket_type_id)
                    .map_err(|err| corrupt("ticket type id", err))?,
                quantity: u32::try_from(line.quantity).map_err(|err| corrupt("quantity", err))?,
                unit_price: line.unit_price,
            })
        })
        .collect::<Result<Vec<_>, OrderLedgerError>>()?;
    let user_id = UserId::new(header.user_id).map_err(|err| corrupt("user id", err))?;

    Order::new(OrderId::from_uuid(header.id), user_id, header.placed_at, lines)
        .map_err(|err| corrupt("order", err))
}

fn sales_from_row((event_id, sold): (String, Option<i64>)) -> Result<EventSales, OrderLedgerError> {
    Ok(EventSales {
        event_id: EventId::new(&event_id).map_err(|err| corrupt("event id", err))?,
        tickets_sold: sold
            .map(u64::try_from)
            .transpose()
            .map_err(|err| corrupt("ticket total", err))?
            .unwrap_or_default(),
    })
}

#[async_trait]
impl OrderLedger for DieselOrderLedger {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(header) = orders::table
            .filter(orders::id.eq(id.as_uuid()))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let lines = order_lines::table
            .filter(order_lines::order_id.eq(id.as_uuid()))
            .order(order_lines::line_no.asc())
            .select(OrderLineRow::as_select())
            .load::<OrderLineRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_order(header, lines).map(Some)
    }

    async fn tickets_sold_by_event(&self, limit: u8) -> Result<Vec<EventSales>, OrderLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = order_lines::table
            .group_by(order_lines::event_id)
            .select((order_lines::event_id, sum(order_lines::quantity)))
            .order((sum(order_lines::quantity).desc(), order_lines::event_id.asc()))
            .limit(i64::from(limit))
            .load::<(String, Option<i64>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(sales_from_row).collect()
    }
}
