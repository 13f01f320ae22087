//! PostgreSQL-backed `ReservationStore` using conditional decrements.
//!
//! Each order line runs an `UPDATE ... WHERE remaining >= quantity` scoped to
//! its `(event_id, ticket_type_id)` pair. A zero row count means another
//! purchase drained the tier first, so the whole transaction rolls back and
//! the order row is never written.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::Order;
use crate::domain::ports::{ReservationStore, ReservationStoreError};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{OrderLineRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{order_lines, orders, ticket_types};

/// Diesel-backed implementation of the [`ReservationStore`] port.
#[derive(Clone)]
pub struct DieselReservationStore {
    pool: DbPool,
}

impl DieselReservationStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure raised inside the commit transaction.
#[derive(Debug)]
enum CommitFailure {
    Diesel(diesel::result::Error),
    Drained {
        event_id: String,
        ticket_type_id: String,
    },
    OutOfRange(&'static str),
}

impl From<diesel::result::Error> for CommitFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> ReservationStoreError {
    map_basic_pool_error(error, ReservationStoreError::connection)
}

fn map_commit_failure(failure: CommitFailure) -> ReservationStoreError {
    match failure {
        CommitFailure::Drained {
            event_id,
            ticket_type_id,
        } => ReservationStoreError::inventory_conflict(event_id, ticket_type_id),
        CommitFailure::OutOfRange(what) => {
            ReservationStoreError::query(format!("{what} out of range"))
        }
        CommitFailure::Diesel(err)
            if classify_diesel_error(&err) == DieselFailure::CheckViolation =>
        {
            ReservationStoreError::query("inventory constraint rejected the decrement")
        }
        CommitFailure::Diesel(err) => map_basic_diesel_error(
            err,
            ReservationStoreError::query,
            ReservationStoreError::connection,
        ),
    }
}

fn order_rows(order: &Order) -> Result<(OrderRow, Vec<OrderLineRow>), CommitFailure> {
    let header = OrderRow {
        id: *order.id().as_uuid(),
        user_id: order.user_id().to_string(),
        placed_at: order.placed_at(),
    };
    let lines = order
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            Ok(OrderLineRow {
                order_id: *order.id().as_uuid(),
                line_no: i32::try_from(index).map_err(|_| CommitFailure::OutOfRange("line"))?,
                event_id: line.event_id.to_string(),
                ticket_type_id: line.ticket_type_id.to_string(),
                quantity: i32::try_from(line.quantity)
                    .map_err(|_| CommitFailure::OutOfRange("quantity"))?,
                unit_price: line.unit_price,
            })
        })
        .collect::<Result<Vec<_>, CommitFailure>>()?;
    Ok((header, lines))
}

#[async_trait]
impl ReservationStore for DieselReservationStore {
    async fn commit(&self, order: &Order) -> Result<(), ReservationStoreError> {
        let (header, lines) = order_rows(order).map_err(map_commit_failure)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                for line in &lines {
                    let updated = diesel::update(
                        ticket_types::table.filter(
                            ticket_types::event_id
                                .eq(&line.event_id)
                                .and(ticket_types::ticket_type_id.eq(&line.ticket_type_id))
                                .and(ticket_types::remaining.ge(line.quantity)),
                        ),
                    )
                    .set(ticket_types::remaining.eq(ticket_types::remaining - line.quantity))
                    .execute(conn)
                    .await?;

                    if updated == 0 {
                        debug!(
                            event_id = %line.event_id,
                            ticket_type_id = %line.ticket_type_id,
                            "conditional decrement matched no rows"
                        );
                        return Err(CommitFailure::Drained {
                            event_id: line.event_id.clone(),
                            ticket_type_id: line.ticket_type_id.clone(),
                        });
                    }
                }

                diesel::insert_into(orders::table)
                    .values(&header)
                    .execute(conn)
                    .await?;
                diesel::insert_into(order_lines::table)
                    .values(&lines)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_commit_failure)
    }
}
