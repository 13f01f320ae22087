//! Builders for the HTTP state from the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use ticketing::domain::ports::{
    CatalogueCache, EventRepository, OrderLedger, ReservationStore, UserRepository,
};
use ticketing::domain::{
    AnalyticsService, CatalogueService, MirrorPublisher, OrderQueryService, RegistrationService,
    ReservationService,
};
use ticketing::inbound::http::state::HttpState;
use ticketing::outbound::memory::{MemoryCatalogue, MemoryUserRepository};
use ticketing::outbound::persistence::{
    DbPool, DieselEventRepository, DieselOrderLedger, DieselReservationStore,
    DieselUserRepository,
};
use ticketing::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Driven adapters for one storage backend.
struct Stores<U, E, S, L> {
    users: Arc<U>,
    events: Arc<E>,
    reservations: Arc<S>,
    ledger: Arc<L>,
}

impl Stores<DieselUserRepository, DieselEventRepository, DieselReservationStore, DieselOrderLedger> {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            events: Arc::new(DieselEventRepository::new(pool.clone())),
            reservations: Arc::new(DieselReservationStore::new(pool.clone())),
            ledger: Arc::new(DieselOrderLedger::new(pool.clone())),
        }
    }
}

impl Stores<MemoryUserRepository, MemoryCatalogue, MemoryCatalogue, MemoryCatalogue> {
    fn memory() -> Self {
        let catalogue = Arc::new(MemoryCatalogue::default());
        Self {
            users: Arc::new(MemoryUserRepository::default()),
            events: Arc::clone(&catalogue),
            reservations: Arc::clone(&catalogue),
            ledger: catalogue,
        }
    }
}

impl<U, E, S, L> Stores<U, E, S, L>
where
    U: UserRepository + 'static,
    E: EventRepository + 'static,
    S: ReservationStore + 'static,
    L: OrderLedger + 'static,
{
    fn into_state(self, cache: Arc<dyn CatalogueCache>, mirror: MirrorPublisher) -> HttpState {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        HttpState {
            purchases: Arc::new(ReservationService::new(
                Arc::clone(&self.users),
                Arc::clone(&self.events),
                self.reservations,
                Arc::clone(&cache),
                mirror.clone(),
                Arc::clone(&clock),
            )),
            events: Arc::new(CatalogueService::new(
                Arc::clone(&self.events),
                Arc::clone(&cache),
                clock,
            )),
            registration: Arc::new(RegistrationService::new(
                self.users,
                Arc::new(BcryptPasswordHasher::default()),
                mirror,
            )),
            analytics: Arc::new(AnalyticsService::new(
                Arc::clone(&self.ledger),
                self.events,
                cache,
            )),
            orders: Arc::new(OrderQueryService::new(self.ledger)),
        }
    }
}

/// Build HTTP state with Diesel adapters when a pool is configured, otherwise
/// with in-memory stores.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let cache = Arc::clone(&config.cache);
    let mirror = config.mirror.clone();
    let state = match &config.db_pool {
        Some(pool) => Stores::diesel(pool).into_state(cache, mirror),
        None => Stores::memory().into_state(cache, mirror),
    };
    web::Data::new(state)
}
