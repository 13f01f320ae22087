//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (repositories, stores, caches, sinks) are implemented by
//! outbound adapters and expose typed errors generated by
//! `define_port_error!`.

mod macros;
pub(crate) use macros::define_port_error;

mod analytics_query;
mod cache_key;
mod catalogue_cache;
mod event_query;
mod event_repository;
mod mirror_sink;
mod order_ledger;
mod order_query;
mod password_hasher;
mod purchase_command;
mod registration_command;
mod reservation_store;
mod user_repository;

#[cfg(test)]
pub use analytics_query::MockAnalyticsQuery;
pub use analytics_query::{AnalyticsQuery, TopEventsView};
pub use cache_key::{CacheKey, CacheKeyValidationError, SELLABLE_INDEX_KEY};
#[cfg(test)]
pub use catalogue_cache::MockCatalogueCache;
pub use catalogue_cache::{CatalogueCache, CatalogueCacheError, IndexUpdate, NoOpCatalogueCache};
#[cfg(test)]
pub use event_query::MockEventQuery;
pub use event_query::{EventQuery, EventView, SellableEvents};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use mirror_sink::MockMirrorSink;
pub use mirror_sink::{MirrorSink, MirrorSinkError};
#[cfg(test)]
pub use order_ledger::MockOrderLedger;
pub use order_ledger::{OrderLedger, OrderLedgerError};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::OrderQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use purchase_command::MockPurchaseCommand;
pub use purchase_command::PurchaseCommand;
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
#[cfg(test)]
pub use reservation_store::MockReservationStore;
pub use reservation_store::{ReservationStore, ReservationStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
