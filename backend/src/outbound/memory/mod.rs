//! In-memory stores used when no database is configured.
//!
//! [`MemoryCatalogue`] holds events and the order ledger behind one mutex so a
//! purchase commit is atomic with respect to every other commit. The lock is
//! never held across an `.await`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, OrderLedger, OrderLedgerError, ReservationStore,
    ReservationStoreError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Event, EventId, EventSales, Order, OrderId, TopEventsLimit, User, UserId, rank_sales,
};

#[derive(Debug, Default)]
struct CatalogueState {
    events: BTreeMap<EventId, Event>,
    orders: Vec<Order>,
}

/// Events, inventory and orders held in process memory.
///
/// # Examples
/// ```
/// use ticketing::outbound::memory::MemoryCatalogue;
///
/// let catalogue = MemoryCatalogue::default();
/// assert_eq!(catalogue.order_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCatalogue {
    state: Mutex<CatalogueState>,
}

impl MemoryCatalogue {
    /// Build a catalogue pre-populated with `events`.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let events = events
            .into_iter()
            .map(|event| (event.id().clone(), event))
            .collect();
        Self {
            state: Mutex::new(CatalogueState {
                events,
                orders: Vec::new(),
            }),
        }
    }

    /// Number of committed orders.
    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    fn state(&self) -> MutexGuard<'_, CatalogueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventRepository for MemoryCatalogue {
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(self.state().events.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(self.state().events.values().cloned().collect())
    }

    async fn upsert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        self.state()
            .events
            .insert(event.id().clone(), event.clone());
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryCatalogue {
    async fn commit(&self, order: &Order) -> Result<(), ReservationStoreError> {
        let mut state = self.state();

        // Apply every decrement to copies first so a failing line leaves the
        // catalogue untouched.
        let mut staged: HashMap<EventId, Event> = HashMap::new();
        for line in order.lines() {
            if !staged.contains_key(&line.event_id) {
                let Some(event) = state.events.get(&line.event_id) else {
                    return Err(ReservationStoreError::inventory_conflict(
                        line.event_id.as_ref(),
                        line.ticket_type_id.as_ref(),
                    ));
                };
                staged.insert(line.event_id.clone(), event.clone());
            }
            let taken = staged
                .get_mut(&line.event_id)
                .is_some_and(|event| event.take_tickets(&line.ticket_type_id, line.quantity));
            if !taken {
                return Err(ReservationStoreError::inventory_conflict(
                    line.event_id.as_ref(),
                    line.ticket_type_id.as_ref(),
                ));
            }
        }

        state.events.extend(staged);
        state.orders.push(order.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderLedger for MemoryCatalogue {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderLedgerError> {
        Ok(self
            .state()
            .orders
            .iter()
            .find(|order| order.id() == id)
            .cloned())
    }

    async fn tickets_sold_by_event(&self, limit: u8) -> Result<Vec<EventSales>, OrderLedgerError> {
        let mut totals: BTreeMap<EventId, u64> = BTreeMap::new();
        for line in self.state().orders.iter().flat_map(Order::lines) {
            *totals.entry(line.event_id.clone()).or_default() += u64::from(line.quantity);
        }
        let sales = totals
            .into_iter()
            .map(|(event_id, tickets_sold)| EventSales {
                event_id,
                tickets_sold,
            })
            .collect();

        Ok(TopEventsLimit::new(u32::from(limit))
            .map(|limit| rank_sales(sales, limit))
            .unwrap_or_default())
    }
}

/// Users held in process memory.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    fn users(&self) -> MutexGuard<'_, HashMap<UserId, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users();
        if users.contains_key(&user.id) {
            return Err(UserPersistenceError::duplicate(user.id.as_ref()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EventDetails, OrderLine, PasswordHash, TicketType, TicketTypeId, UserProfile,
    };
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    fn tier(raw: &str) -> TicketTypeId {
        TicketTypeId::new(raw).expect("ticket id")
    }

    fn event_id() -> EventId {
        EventId::new("evt-1").expect("event id")
    }

    #[fixture]
    fn catalogue() -> MemoryCatalogue {
        let event = Event::new(
            event_id(),
            EventDetails {
                title: "Jazz night".to_owned(),
                city: None,
                venue: None,
                category: None,
                starts_at: Utc.with_ymd_and_hms(2026, 12, 1, 19, 0, 0).single().expect("time"),
                duration_minutes: None,
                age_restriction: None,
            },
            None,
            vec![
                TicketType {
                    id: tier("std"),
                    price: dec!(10),
                    remaining: 5,
                },
                TicketType {
                    id: tier("vip"),
                    price: dec!(50),
                    remaining: 1,
                },
            ],
        )
        .expect("valid event");
        MemoryCatalogue::with_events([event])
    }

    fn order(lines: &[(&str, u32)]) -> Order {
        Order::new(
            OrderId::generate(),
            UserId::new("ada@example.com").expect("user id"),
            Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).single().expect("time"),
            lines
                .iter()
                .map(|(tier_id, quantity)| OrderLine {
                    event_id: event_id(),
                    ticket_type_id: tier(tier_id),
                    quantity: *quantity,
                    unit_price: dec!(10),
                })
                .collect(),
        )
        .expect("valid order")
    }

    async fn remaining(catalogue: &MemoryCatalogue, tier_id: &str) -> u32 {
        EventRepository::find_by_id(catalogue, &event_id())
            .await
            .expect("read")
            .and_then(|event| event.ticket_type(&tier(tier_id)).map(|t| t.remaining))
            .expect("tier present")
    }

    #[rstest]
    #[tokio::test]
    async fn failing_line_rolls_back_every_decrement(catalogue: MemoryCatalogue) {
        let err = catalogue
            .commit(&order(&[("std", 2), ("vip", 2)]))
            .await
            .expect_err("vip drained");

        assert_eq!(err, ReservationStoreError::inventory_conflict("evt-1", "vip"));
        assert_eq!(remaining(&catalogue, "std").await, 5);
        assert_eq!(catalogue.order_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn commits_decrement_and_record(catalogue: MemoryCatalogue) {
        let order = order(&[("std", 2)]);
        catalogue.commit(&order).await.expect("commit");

        assert_eq!(remaining(&catalogue, "std").await, 3);
        let stored = OrderLedger::find_by_id(&catalogue, order.id())
            .await
            .expect("read");
        assert_eq!(stored, Some(order));
    }

    #[rstest]
    #[tokio::test]
    async fn sales_are_summed_per_event(catalogue: MemoryCatalogue) {
        catalogue.commit(&order(&[("std", 2)])).await.expect("first");
        catalogue.commit(&order(&[("std", 1)])).await.expect("second");

        let sales = catalogue.tickets_sold_by_event(3).await.expect("sales");
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].tickets_sold, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_users_are_rejected() {
        let repo = MemoryUserRepository::default();
        let user = User {
            id: UserId::new("ada@example.com").expect("user id"),
            profile: UserProfile::default(),
            password_hash: PasswordHash::new("hash"),
        };
        repo.insert(&user).await.expect("first insert");

        assert!(matches!(
            repo.insert(&user).await,
            Err(UserPersistenceError::Duplicate { .. })
        ));
    }
}
