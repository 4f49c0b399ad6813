//! Cache layer
//!
//! `Cache` wraps an optional backend. Without a backend every operation is a
//! no-op: reads miss, writes and deletes report `false`/`0`. Backend errors are
//! logged and degrade the same way, so a cache outage never fails a request.
//! Invalidation is explicit: mutations delete the key patterns returned by
//! [`keys::invalidation_patterns`].

mod backend;
pub mod keys;
mod memory;
#[cfg(feature = "redis")]
mod redis;

pub use backend::{CacheBackend, CacheError};
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use self::redis::RedisCache;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{CacheBackendKind, CacheSettings};
use crate::error::AdminResult;
use crate::models::ResourceKind;

/// Best-effort cache handle shared by the services
pub struct Cache {
    backend: Option<Box<dyn CacheBackend>>,
    default_ttl: Duration,
}

impl Cache {
    /// A cache with no backend
    pub fn disabled() -> Self {
        Self {
            backend: None,
            default_ttl: Duration::from_secs(300),
        }
    }

    pub fn new(backend: Box<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self {
            backend: Some(backend),
            default_ttl,
        }
    }

    /// In-process cache with the given default TTL
    pub fn memory(default_ttl: Duration) -> Self {
        Self::new(Box::new(MemoryCache::new()), default_ttl)
    }

    /// Build the cache selected in settings
    ///
    /// A Redis backend that cannot be reached (or a build without the `redis`
    /// feature) yields a disabled cache and a warning.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        let ttl = Duration::from_secs(settings.default_ttl_secs);
        match settings.backend {
            CacheBackendKind::None => Self::disabled(),
            CacheBackendKind::Memory => Self::memory(ttl),
            CacheBackendKind::Redis => Self::connect_redis(settings.redis_url.as_deref(), ttl),
        }
    }

    #[cfg(feature = "redis")]
    fn connect_redis(url: Option<&str>, ttl: Duration) -> Self {
        let url = url.unwrap_or("redis://127.0.0.1:6379");
        match RedisCache::connect(url) {
            Ok(backend) => {
                tracing::info!(url, "connected to redis cache");
                Self::new(Box::new(backend), ttl)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "redis unavailable, caching disabled");
                Self::disabled()
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    fn connect_redis(_url: Option<&str>, _ttl: Duration) -> Self {
        tracing::warn!("built without the redis feature, caching disabled");
        Self::disabled()
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Backend name, or `none`
    pub fn backend_name(&self) -> &'static str {
        self.backend.as_ref().map(|b| b.name()).unwrap_or("none")
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn report(&self, op: &str, key: &str, err: &CacheError) {
        match err {
            CacheError::ConnectionClosed => {
                tracing::debug!(op, key, "cache connection closed")
            }
            _ => tracing::warn!(op, key, error = %err, "cache operation failed"),
        }
    }

    /// Read and deserialize a cached value
    pub fn get_cache<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;
        let raw = match backend.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                self.report("get", key, &e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    /// Serialize and store a value; `ttl` defaults to the configured TTL
    pub fn set_cache<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "value not cacheable");
                return false;
            }
        };
        match backend.set(key, raw, ttl.unwrap_or(self.default_ttl)) {
            Ok(()) => true,
            Err(e) => {
                self.report("set", key, &e);
                false
            }
        }
    }

    pub fn delete_cache(&self, key: &str) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };
        match backend.delete(key) {
            Ok(existed) => existed,
            Err(e) => {
                self.report("delete", key, &e);
                false
            }
        }
    }

    /// Delete every key matching a glob pattern, returning the count
    pub fn delete_cache_pattern(&self, pattern: &str) -> usize {
        let Some(backend) = self.backend.as_ref() else {
            return 0;
        };
        match backend.delete_pattern(pattern) {
            Ok(removed) => removed,
            Err(e) => {
                self.report("delete_pattern", pattern, &e);
                0
            }
        }
    }

    /// Drop every cached entry derived from a resource family
    pub fn invalidate(&self, kind: ResourceKind) -> usize {
        let removed = keys::invalidation_patterns(kind)
            .iter()
            .map(|p| self.delete_cache_pattern(p))
            .sum();
        tracing::debug!(resource = %kind, removed, "cache invalidated");
        removed
    }

    /// Cache-through read: return the cached value or load and cache it
    pub fn get_or_load<T, F>(&self, key: &str, load: F) -> AdminResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> AdminResult<T>,
    {
        if let Some(hit) = self.get_cache(key) {
            return Ok(hit);
        }
        let value = load()?;
        self.set_cache(key, &value, None);
        Ok(value)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::Cell;

    struct BrokenBackend {
        closed: bool,
    }

    impl BrokenBackend {
        fn fail(&self) -> CacheError {
            if self.closed {
                CacheError::ConnectionClosed
            } else {
                CacheError::Backend("boom".into())
            }
        }
    }

    impl CacheBackend for BrokenBackend {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(self.fail())
        }

        fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(self.fail())
        }

        fn delete(&self, _key: &str) -> Result<bool, CacheError> {
            Err(self.fail())
        }

        fn delete_pattern(&self, _pattern: &str) -> Result<usize, CacheError> {
            Err(self.fail())
        }
    }

    #[test]
    fn test_disabled_cache_is_noop() {
        let cache = Cache::disabled();
        assert!(!cache.is_enabled());
        assert!(!cache.set_cache("k", &json!(1), None));
        assert!(cache.get_cache::<Value>("k").is_none());
        assert!(!cache.delete_cache("k"));
        assert_eq!(cache.delete_cache_pattern("*"), 0);
    }

    #[test]
    fn test_memory_roundtrip() {
        let cache = Cache::memory(Duration::from_secs(60));
        assert!(cache.set_cache("equipment:1", &json!({"name": "Truss"}), None));
        assert_eq!(
            cache.get_cache::<Value>("equipment:1"),
            Some(json!({"name": "Truss"}))
        );
        assert!(cache.delete_cache("equipment:1"));
        assert!(cache.get_cache::<Value>("equipment:1").is_none());
    }

    #[test]
    fn test_backend_errors_degrade() {
        for closed in [true, false] {
            let cache = Cache::new(Box::new(BrokenBackend { closed }), Duration::from_secs(60));
            assert!(cache.get_cache::<Value>("k").is_none());
            assert!(!cache.set_cache("k", &json!(1), None));
            assert!(!cache.delete_cache("k"));
            assert_eq!(cache.delete_cache_pattern("k*"), 0);
        }
    }

    #[test]
    fn test_invalidate_resource_family() {
        let cache = Cache::memory(Duration::from_secs(60));
        cache.set_cache("equipment:abc", &1, None);
        cache.set_cache("api:/api/equipment?", &2, None);
        cache.set_cache(keys::DASHBOARD_STATS_KEY, &3, None);
        cache.set_cache("project:abc", &4, None);

        assert_eq!(cache.invalidate(ResourceKind::Equipment), 3);
        assert_eq!(cache.get_cache::<i32>("project:abc"), Some(4));
    }

    #[test]
    fn test_get_or_load_caches() {
        let cache = Cache::memory(Duration::from_secs(60));
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok(vec![1, 2, 3])
        };

        assert_eq!(cache.get_or_load("list", load).unwrap(), vec![1, 2, 3]);
        assert_eq!(cache.get_or_load("list", load).unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_from_settings() {
        let none = CacheSettings {
            backend: CacheBackendKind::None,
            ..CacheSettings::default()
        };
        assert_eq!(Cache::from_settings(&none).backend_name(), "none");
        assert_eq!(
            Cache::from_settings(&CacheSettings::default()).backend_name(),
            "memory"
        );
    }
}
