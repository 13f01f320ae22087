//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AnalyticsQuery, EventQuery, OrderQuery, PurchaseCommand, RegistrationCommand,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use mockable::DefaultClock;
/// use ticketing::domain::ports::NoOpCatalogueCache;
/// use ticketing::domain::{
///     AnalyticsService, CatalogueService, MirrorPublisher, OrderQueryService,
///     RegistrationService, ReservationService,
/// };
/// use ticketing::inbound::http::state::HttpState;
/// use ticketing::outbound::memory::{MemoryCatalogue, MemoryUserRepository};
/// use ticketing::outbound::security::BcryptPasswordHasher;
///
/// let catalogue = Arc::new(MemoryCatalogue::default());
/// let users = Arc::new(MemoryUserRepository::default());
/// let cache = Arc::new(NoOpCatalogueCache);
/// let clock = Arc::new(DefaultClock);
/// let state = HttpState {
///     purchases: Arc::new(ReservationService::new(
///         users.clone(),
///         catalogue.clone(),
///         catalogue.clone(),
///         cache.clone(),
///         MirrorPublisher::disabled(),
///         clock.clone(),
///     )),
///     events: Arc::new(CatalogueService::new(catalogue.clone(), cache.clone(), clock)),
///     registration: Arc::new(RegistrationService::new(
///         users,
///         Arc::new(BcryptPasswordHasher::default()),
///         MirrorPublisher::disabled(),
///     )),
///     analytics: Arc::new(AnalyticsService::new(catalogue.clone(), catalogue.clone(), cache)),
///     orders: Arc::new(OrderQueryService::new(catalogue)),
/// };
/// # let _ = state;
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub purchases: Arc<dyn PurchaseCommand>,
    pub events: Arc<dyn EventQuery>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub analytics: Arc<dyn AnalyticsQuery>,
    pub orders: Arc<dyn OrderQuery>,
}
