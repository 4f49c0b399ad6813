//! In-process cache backend

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use globset::Glob;

use super::backend::{CacheBackend, CacheError};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// HashMap-backed cache with lazy expiry
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Backend(format!("memory cache poisoned: {}", e)))
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .map(|entries| entries.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheBackend for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn delete_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        let matcher = Glob::new(pattern)
            .map_err(|e| CacheError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?
            .compile_matcher();

        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|key, _| !matcher.is_match(key.as_str()));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_set_get_delete() {
        let cache = MemoryCache::new();
        cache.set("equipment:1", "{}".into(), TTL).unwrap();

        assert_eq!(cache.get("equipment:1").unwrap().as_deref(), Some("{}"));
        assert!(cache.delete("equipment:1").unwrap());
        assert!(!cache.delete("equipment:1").unwrap());
        assert!(cache.get("equipment:1").unwrap().is_none());
    }

    #[test]
    fn test_expired_entries_are_misses() {
        let cache = MemoryCache::new();
        cache.set("k", "v".into(), Duration::ZERO).unwrap();
        assert!(cache.get("k").unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_pattern_crosses_separators() {
        let cache = MemoryCache::new();
        for key in [
            "equipment:a",
            "equipment:b",
            "api:/api/equipment?status=AVAILABLE",
            "api:/api/equipment",
            "api:/api/projects?",
            "dashboard:stats",
        ] {
            cache.set(key, "x".into(), TTL).unwrap();
        }

        assert_eq!(cache.delete_pattern("equipment:*").unwrap(), 2);
        assert_eq!(cache.delete_pattern("api:/api/equipment*").unwrap(), 2);
        assert_eq!(cache.delete_pattern("dashboard:*").unwrap(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("api:/api/projects?").unwrap().is_some());
    }

    #[test]
    fn test_invalid_pattern() {
        let cache = MemoryCache::new();
        let err = cache.delete_pattern("equipment:[").unwrap_err();
        assert!(matches!(err, CacheError::InvalidPattern { .. }));
    }
}
