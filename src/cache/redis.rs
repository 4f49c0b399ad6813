//! Redis cache backend

use std::time::Duration;

use redis::Commands;

use super::backend::{CacheBackend, CacheError};

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_dropped() {
            CacheError::ConnectionClosed
        } else {
            CacheError::Backend(err.to_string())
        }
    }
}

/// Cache backed by a Redis server
///
/// A connection is opened per operation; the client only holds the parsed URL.
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    /// Open a client and check the server is reachable
    pub fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let mut con = client.get_connection()?;
        redis::cmd("PING").query::<String>(&mut con)?;
        Ok(Self { client })
    }

    fn connection(&self) -> Result<redis::Connection, CacheError> {
        Ok(self.client.get_connection()?)
    }
}

impl CacheBackend for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.connection()?.get(key)?)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let secs = ttl.as_secs().max(1);
        self.connection()?.set_ex::<_, _, ()>(key, value, secs)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let removed: usize = self.connection()?.del(key)?;
        Ok(removed > 0)
    }

    fn delete_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        let mut con = self.connection()?;
        let keys: Vec<String> = con.scan_match::<_, String>(pattern)?.collect();
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: usize = con.del(keys)?;
        Ok(removed)
    }
}
