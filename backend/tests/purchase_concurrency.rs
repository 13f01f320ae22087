//! Concurrent purchases against the in-memory stores never oversell.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rstest::rstest;
use rust_decimal_macros::dec;

use ticketing::domain::ports::{ReservationStore, ReservationStoreError};
use ticketing::domain::{
    EventId, Order, OrderId, OrderLine, PurchaseError, PurchaseRequest, TicketHints, TicketTypeId,
    UserId,
};

mod support;

use support::{BUYER, EventSpec, Harness};

fn request(quantity: u32) -> PurchaseRequest {
    PurchaseRequest {
        user_id: UserId::new(BUYER).expect("user id"),
        event_id: EventId::new("gig").expect("event id"),
        hints: TicketHints::by_id("GA"),
        quantity,
    }
}

async fn harness(remaining: u32) -> Harness {
    let harness = Harness::new([EventSpec::new("gig", vec![("GA", dec!(15.00), remaining)]).build()]);
    harness.add_user(BUYER).await;
    harness
}

#[rstest]
#[case(5, 20)]
#[case(1, 2)]
#[case(10, 10)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_buyers_never_oversell(#[case] stock: u32, #[case] buyers: usize) {
    let harness = harness(stock).await;

    let attempts = (0..buyers).map(|_| {
        let service = Arc::clone(&harness.purchases);
        tokio::spawn(async move { service.commit(request(1)).await })
    });
    let outcomes: Vec<Result<Order, PurchaseError>> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("purchase task completes"))
        .collect();

    let succeeded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let expected = usize::try_from(stock).expect("stock fits usize").min(buyers);
    assert_eq!(succeeded, expected);
    for failure in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
        assert!(
            matches!(
                failure,
                PurchaseError::ConcurrentConflict | PurchaseError::InsufficientInventory { remaining: 0 }
            ),
            "unexpected failure: {failure:?}"
        );
    }
    assert_eq!(harness.catalogue.order_count(), succeeded);
    let sold = u32::try_from(succeeded).expect("sold fits u32");
    assert_eq!(harness.remaining("gig", "GA").await, stock - sold);
}

#[rstest]
#[tokio::test]
async fn oversized_request_leaves_inventory_untouched() {
    let harness = harness(3).await;

    let error = harness
        .purchases
        .commit(request(5))
        .await
        .expect_err("not enough tickets");

    assert_eq!(error, PurchaseError::InsufficientInventory { remaining: 3 });
    assert_eq!(harness.remaining("gig", "GA").await, 3);
    assert_eq!(harness.catalogue.order_count(), 0);
}

#[rstest]
#[tokio::test]
async fn losing_a_race_at_the_store_is_a_conflict() {
    let harness = harness(1).await;
    let order = || {
        Order::new(
            OrderId::generate(),
            UserId::new(BUYER).expect("user id"),
            Utc::now(),
            vec![OrderLine {
                event_id: EventId::new("gig").expect("event id"),
                ticket_type_id: TicketTypeId::new("GA").expect("ticket type id"),
                quantity: 1,
                unit_price: dec!(15.00),
            }],
        )
        .expect("valid order")
    };

    harness
        .catalogue
        .commit(&order())
        .await
        .expect("first commit wins");
    let error = harness
        .catalogue
        .commit(&order())
        .await
        .expect_err("second commit loses");

    assert!(matches!(error, ReservationStoreError::InventoryConflict { .. }));
    assert_eq!(harness.remaining("gig", "GA").await, 0);
    assert_eq!(harness.catalogue.order_count(), 1);
}
