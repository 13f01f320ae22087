//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use ticketing::domain::MirrorPublisher;
use ticketing::domain::ports::{CatalogueCache, NoOpCatalogueCache};
use ticketing::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) cache: Arc<dyn CatalogueCache>,
    pub(crate) mirror: MirrorPublisher,
}

impl ServerConfig {
    /// In-memory stores, no cache and no mirrors until configured otherwise.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            cache: Arc::new(NoOpCatalogueCache),
            mirror: MirrorPublisher::disabled(),
        }
    }

    /// Attach a database connection pool for the Diesel adapters.
    ///
    /// Without a pool the server keeps users, events and orders in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CatalogueCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Publisher feeding the mirror dispatcher.
    #[must_use]
    pub fn with_mirror(mut self, mirror: MirrorPublisher) -> Self {
        self.mirror = mirror;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
