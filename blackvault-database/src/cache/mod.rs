mod memory_store;
mod noop_store;
mod redis_store;

use std::time::Duration;

use memory_store::MemoryCacheStore;
use noop_store::NoopCacheStore;
use redis_store::RedisCacheStore;

/// Marker value stored under cooldown keys; only presence matters.
pub(crate) const MARKER: &str = "true";

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled(NoopCacheStore),
    Memory(MemoryCacheStore),
    Redis(RedisCacheStore),
}

/// Key-value cache used for per-player cooldown markers.
///
/// Three backends: `Redis` for deployments, `Memory` for single-process use
/// (markers live in the process and expire by wall clock), and `Disabled`,
/// which keeps the whole service functional without any store — markers are
/// never found and never kept, turning the cooldown gate off rather than
/// failing requests.
#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled(NoopCacheStore),
        }
    }

    pub fn memory(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Memory(MemoryCacheStore::default()),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    /// Whether a live (non-expired) marker exists under `key`.
    ///
    /// Store errors propagate to the caller; the gate fails closed instead of
    /// silently admitting the request.
    pub async fn marker_exists(&self, key: &str) -> anyhow::Result<bool> {
        let value = match &self.backend {
            CacheBackend::Disabled(store) => store.get(key).await,
            CacheBackend::Memory(store) => store.get(key).await,
            CacheBackend::Redis(store) => store.get(key).await,
        }?;

        Ok(value.is_some())
    }

    /// Store a presence marker under `key` that expires after `ttl`.
    pub async fn set_marker(&self, key: &str, ttl: Duration) -> anyhow::Result<()> {
        let ttl_seconds = ttl.as_secs().max(1);

        match &self.backend {
            CacheBackend::Disabled(store) => store.set(key, ttl_seconds).await,
            CacheBackend::Memory(store) => store.set(key, ttl_seconds).await,
            CacheBackend::Redis(store) => store.set(key, ttl_seconds).await,
        }
    }

    /// Round-trip health check, meaningful only on the Redis backend.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(_) | CacheBackend::Memory(_) => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
        }
    }
}
