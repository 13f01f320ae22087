//! Server settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `TICKETING_*` environment variables and
//! an optional configuration file. Unset values fall back to the defaults
//! below.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_MIRROR_QUEUE_CAPACITY: usize = 1024;
const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 5;

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TICKETING")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps state in memory.
    pub database_url: Option<String>,
    /// Redis URL for the catalogue cache. Without one an in-process cache is
    /// used.
    pub redis_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_pool_max_size: Option<u32>,
    /// Event snapshot TTL in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Endpoint receiving committed orders and registrations.
    pub mirror_webhook_url: Option<String>,
    /// Per-request timeout for the mirror webhook, in seconds.
    pub mirror_timeout_secs: Option<u64>,
    /// Facts buffered for the mirror dispatcher before new ones are dropped.
    pub mirror_queue_capacity: Option<usize>,
    /// Apply pending migrations on startup. Defaults to `true`.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Configured database URL, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        non_blank(self.database_url.clone()).or_else(|| non_blank(env::var("DATABASE_URL").ok()))
    }

    /// Redis URL, ignoring blank values.
    pub fn redis_url(&self) -> Option<String> {
        non_blank(self.redis_url.clone())
    }

    /// Database pool size, defaulting to 10.
    pub fn db_pool_max_size(&self) -> u32 {
        self.db_pool_max_size.unwrap_or(DEFAULT_DB_POOL_MAX_SIZE)
    }

    /// Event snapshot and sellable index TTL, defaulting to five minutes.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    /// Mirror webhook endpoint, ignoring blank values.
    pub fn mirror_webhook_url(&self) -> Option<String> {
        non_blank(self.mirror_webhook_url.clone())
    }

    /// Mirror webhook timeout, defaulting to five seconds.
    pub fn mirror_timeout(&self) -> Duration {
        Duration::from_secs(
            self.mirror_timeout_secs
                .unwrap_or(DEFAULT_MIRROR_TIMEOUT_SECS),
        )
    }

    /// Bounded queue size between request handlers and the mirror dispatcher.
    pub fn mirror_queue_capacity(&self) -> usize {
        self.mirror_queue_capacity
            .unwrap_or(DEFAULT_MIRROR_QUEUE_CAPACITY)
            .max(1)
    }

    /// Whether to apply pending migrations before serving.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
