//! Redis-backed `CatalogueCache` using a `bb8-redis` pool.
//!
//! Values are JSON documents. The sellable index is a Redis set written
//! together with a marker key in one `MULTI` block, so readers can tell an
//! emptied index apart from one that was never built. TTLs carry up to 10%
//! random jitter to spread expiry.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{self, AsyncCommands};
use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ports::{CacheKey, CatalogueCache, CatalogueCacheError, IndexUpdate};
use crate::domain::{Event, EventId, TopEvent, TopEventsLimit};

/// TTL applied to cached top events rankings.
pub const TOP_EVENTS_TTL: Duration = Duration::from_secs(600);

/// Redis implementation of [`CatalogueCache`].
#[derive(Clone)]
pub struct RedisCatalogueCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Duration,
}

impl RedisCatalogueCache {
    /// Connect to Redis and build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueCacheError::Backend`] when the URL is invalid or the
    /// pool cannot be built.
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, CatalogueCacheError> {
        let manager = RedisConnectionManager::new(redis_url).map_err(backend)?;
        let pool = Pool::builder().build(manager).await.map_err(backend)?;
        Ok(Self { pool, ttl })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, CatalogueCacheError> {
        self.pool.get().await.map_err(backend)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> Result<Option<T>, CatalogueCacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(key.as_str()).await.map_err(backend)?;
        raw.map(|payload| serde_json::from_str(&payload).map_err(serialization))
            .transpose()
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CatalogueCacheError> {
        let payload = serde_json::to_string(value).map_err(serialization)?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key.as_str(), payload, jittered_secs(ttl))
            .await
            .map_err(backend)
    }
}

fn backend(err: impl std::fmt::Display) -> CatalogueCacheError {
    CatalogueCacheError::backend(err.to_string())
}

fn serialization(err: serde_json::Error) -> CatalogueCacheError {
    CatalogueCacheError::serialization(err.to_string())
}

/// Whole seconds for `ttl` plus up to 10% jitter, never below one second.
fn jittered_secs(ttl: Duration) -> u64 {
    let base = ttl.as_secs().max(1);
    let spread = base / 10;
    if spread == 0 {
        return base;
    }
    base + rand::thread_rng().gen_range(0..=spread)
}

#[async_trait]
impl CatalogueCache for RedisCatalogueCache {
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, CatalogueCacheError> {
        self.read_json(&CacheKey::event(id)).await
    }

    async fn put_event(&self, event: &Event) -> Result<(), CatalogueCacheError> {
        self.write_json(&CacheKey::event(event.id()), event, self.ttl)
            .await
    }

    async fn invalidate_event(&self, id: &EventId) -> Result<(), CatalogueCacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(CacheKey::event(id).as_str())
            .await
            .map_err(backend)
    }

    async fn sellable_index(&self) -> Result<Option<BTreeSet<EventId>>, CatalogueCacheError> {
        let mut conn = self.connection().await?;
        let built: bool = conn
            .exists(CacheKey::sellable_index_marker().as_str())
            .await
            .map_err(backend)?;
        if !built {
            return Ok(None);
        }
        let members: Vec<String> = conn
            .smembers(CacheKey::sellable_index().as_str())
            .await
            .map_err(backend)?;
        members
            .into_iter()
            .map(|raw| {
                EventId::new(&raw).map_err(|err| CatalogueCacheError::serialization(err.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some)
    }

    async fn store_sellable_index(
        &self,
        event_ids: &BTreeSet<EventId>,
    ) -> Result<(), CatalogueCacheError> {
        let index = CacheKey::sellable_index();
        let marker = CacheKey::sellable_index_marker();
        let ttl = jittered_secs(self.ttl);
        let members: Vec<&str> = event_ids.iter().map(AsRef::as_ref).collect();

        let mut pipe = redis::pipe();
        pipe.atomic().del(index.as_str()).ignore();
        if !members.is_empty() {
            pipe.sadd(index.as_str(), &members)
                .ignore()
                .expire(index.as_str(), i64::try_from(ttl).unwrap_or(i64::MAX))
                .ignore();
        }
        pipe.set_ex(marker.as_str(), "1", ttl).ignore();

        let mut conn = self.connection().await?;
        pipe.query_async::<()>(&mut *conn).await.map_err(backend)
    }

    async fn remove_from_sellable_index(
        &self,
        id: &EventId,
    ) -> Result<IndexUpdate, CatalogueCacheError> {
        let mut conn = self.connection().await?;
        let built: bool = conn
            .exists(CacheKey::sellable_index_marker().as_str())
            .await
            .map_err(backend)?;
        if !built {
            return Ok(IndexUpdate::IndexAbsent);
        }
        let removed: u32 = conn
            .srem(CacheKey::sellable_index().as_str(), id.as_ref())
            .await
            .map_err(backend)?;
        debug!(event_id = %id, removed, "sellable index updated");
        Ok(IndexUpdate::Applied)
    }

    async fn top_events(
        &self,
        limit: TopEventsLimit,
    ) -> Result<Option<Vec<TopEvent>>, CatalogueCacheError> {
        self.read_json(&CacheKey::top_events(limit)).await
    }

    async fn put_top_events(
        &self,
        limit: TopEventsLimit,
        events: &[TopEvent],
    ) -> Result<(), CatalogueCacheError> {
        self.write_json(&CacheKey::top_events(limit), events, TOP_EVENTS_TTL)
            .await
    }
}
