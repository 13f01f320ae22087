//! Ticket reservation and order commit.
//!
//! [`ReservationService`] is the single purchase implementation behind the
//! [`PurchaseCommand`] port. A purchase runs in three phases:
//!
//! 1. Checks that never mutate: quantity, user existence, event lookup,
//!    ticket type resolution and the availability check against the
//!    authoritative event repository.
//! 2. The atomic reservation: [`ReservationStore::commit`] applies the
//!    conditional decrement and inserts the order in one transaction.
//! 3. Best-effort follow-up: cache invalidation, sellable index
//!    reconciliation and mirror publication. Failures are logged only.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CatalogueCache, EventRepository, EventRepositoryError, PurchaseCommand, ReservationStore,
    ReservationStoreError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CoreFact, Error, Event, EventId, MirrorPublisher, Order, OrderId, OrderLine, PurchaseError,
    PurchaseRequest, SellableIndexReconciler, TicketType, UserId, resolve_ticket_type,
};

/// Purchase service implementing [`PurchaseCommand`].
pub struct ReservationService<U, E, S> {
    users: Arc<U>,
    events: Arc<E>,
    store: Arc<S>,
    cache: Arc<dyn CatalogueCache>,
    reconciler: SellableIndexReconciler<E>,
    mirror: MirrorPublisher,
    clock: Arc<dyn Clock>,
}

impl<U, E, S> ReservationService<U, E, S>
where
    U: UserRepository,
    E: EventRepository,
    S: ReservationStore,
{
    /// Create a service over the supplied stores.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use ticketing::domain::{MirrorPublisher, ReservationService};
    /// use ticketing::domain::ports::NoOpCatalogueCache;
    /// use ticketing::outbound::memory::{MemoryCatalogue, MemoryUserRepository};
    ///
    /// let catalogue = Arc::new(MemoryCatalogue::default());
    /// let service = ReservationService::new(
    ///     Arc::new(MemoryUserRepository::default()),
    ///     catalogue.clone(),
    ///     catalogue,
    ///     Arc::new(NoOpCatalogueCache),
    ///     MirrorPublisher::disabled(),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        users: Arc<U>,
        events: Arc<E>,
        store: Arc<S>,
        cache: Arc<dyn CatalogueCache>,
        mirror: MirrorPublisher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let reconciler = SellableIndexReconciler::new(Arc::clone(&events), Arc::clone(&cache));
        Self {
            users,
            events,
            store,
            cache,
            reconciler,
            mirror,
            clock,
        }
    }

    /// Reserve tickets and record the order.
    ///
    /// On error nothing was written. On success the order is durable even if
    /// any follow-up step failed.
    pub async fn commit(&self, request: PurchaseRequest) -> Result<Order, PurchaseError> {
        if request.quantity == 0 {
            return Err(PurchaseError::InvalidQuantity);
        }
        self.ensure_user_exists(&request.user_id).await?;

        let event = self.load_event(&request.event_id).await?;
        let ticket = Self::select_ticket_type(&event, &request)?;
        if ticket.remaining < request.quantity {
            return Err(PurchaseError::InsufficientInventory {
                remaining: ticket.remaining,
            });
        }

        let order = Order::new(
            OrderId::generate(),
            request.user_id,
            self.clock.utc(),
            vec![OrderLine {
                event_id: request.event_id,
                ticket_type_id: ticket.id.clone(),
                quantity: request.quantity,
                unit_price: ticket.price,
            }],
        )
        .map_err(|err| PurchaseError::Internal {
            message: format!("failed to build order: {err}"),
        })?;

        self.store
            .commit(&order)
            .await
            .map_err(Self::map_store_error)?;
        info!(
            order_id = %order.id(),
            user_id = %order.user_id(),
            "purchase committed"
        );

        self.after_commit(&order).await;
        Ok(order)
    }

    async fn ensure_user_exists(&self, user_id: &UserId) -> Result<(), PurchaseError> {
        match self.users.find_by_id(user_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(PurchaseError::UserNotFound),
            Err(UserPersistenceError::Connection { message }) => {
                Err(PurchaseError::Unavailable {
                    message: format!("user directory unavailable: {message}"),
                })
            }
            Err(err) => Err(PurchaseError::Internal {
                message: format!("user directory error: {err}"),
            }),
        }
    }

    async fn load_event(&self, event_id: &EventId) -> Result<Event, PurchaseError> {
        self.events
            .find_by_id(event_id)
            .await
            .map_err(|err| match err {
                EventRepositoryError::Connection { message } => PurchaseError::Unavailable {
                    message: format!("event catalogue unavailable: {message}"),
                },
                EventRepositoryError::Query { message } => PurchaseError::Internal {
                    message: format!("event catalogue error: {message}"),
                },
            })?
            .ok_or(PurchaseError::EventNotFound)
    }

    fn select_ticket_type<'a>(
        event: &'a Event,
        request: &PurchaseRequest,
    ) -> Result<&'a TicketType, PurchaseError> {
        let ticket_types = event.ticket_types();
        if ticket_types.is_empty() {
            return Err(PurchaseError::NoTicketTypes);
        }
        resolve_ticket_type(ticket_types, &request.hints)
            .and_then(|index| ticket_types.get(index))
            .ok_or(PurchaseError::TicketTypeNotFound)
    }

    fn map_store_error(error: ReservationStoreError) -> PurchaseError {
        match error {
            ReservationStoreError::InventoryConflict {
                event_id,
                ticket_type_id,
            } => {
                info!(%event_id, %ticket_type_id, "conditional decrement lost a race");
                PurchaseError::ConcurrentConflict
            }
            ReservationStoreError::Connection { message } => PurchaseError::Unavailable {
                message: format!("reservation store unavailable: {message}"),
            },
            ReservationStoreError::Query { message } => PurchaseError::Internal {
                message: format!("reservation store error: {message}"),
            },
        }
    }

    async fn after_commit(&self, order: &Order) {
        let touched: BTreeSet<&EventId> = order.lines().iter().map(|line| &line.event_id).collect();
        for event_id in touched {
            if let Err(error) = self.cache.invalidate_event(event_id).await {
                warn!(%event_id, %error, "failed to invalidate cached event");
            }
            if let Err(error) = self.reconciler.reconcile(event_id).await {
                warn!(%event_id, %error, "failed to reconcile sellable index");
            }
        }
        self.mirror.publish(CoreFact::OrderCommitted(order.clone()));
    }
}

#[async_trait]
impl<U, E, S> PurchaseCommand for ReservationService<U, E, S>
where
    U: UserRepository,
    E: EventRepository,
    S: ReservationStore,
{
    async fn purchase(&self, request: PurchaseRequest) -> Result<Order, Error> {
        self.commit(request).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "reservation_service_tests.rs"]
mod tests;
