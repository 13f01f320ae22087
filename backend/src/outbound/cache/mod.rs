//! Catalogue cache adapters.
//!
//! - [`RedisCatalogueCache`]: `bb8-redis` pool, JSON values, jittered TTLs.
//! - [`MemoryCatalogueCache`]: process-local fallback when no Redis URL is
//!   configured.
//!
//! Neither adapter is authoritative. The domain treats every failure here as
//! a cache miss.

mod memory_catalogue_cache;
mod redis_catalogue_cache;

pub use memory_catalogue_cache::MemoryCatalogueCache;
pub use redis_catalogue_cache::{RedisCatalogueCache, TOP_EVENTS_TTL};
