//! Cache backend abstraction

use std::time::Duration;

use thiserror::Error;

/// Errors a cache backend can report
#[derive(Error, Debug)]
pub enum CacheError {
    /// The connection to the cache server went away
    #[error("cache connection closed")]
    ConnectionClosed,

    /// The key pattern could not be compiled
    #[error("invalid key pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("{0}")]
    Backend(String),
}

/// A string key/value store with per-entry TTL and glob deletion
///
/// Patterns use glob syntax where `*` matches any run of characters,
/// including `/` and `:`.
pub trait CacheBackend: Send + Sync {
    /// Short name for logs (`memory`, `redis`)
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Remove one key, returning whether it existed
    fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every key matching `pattern`, returning how many were removed
    fn delete_pattern(&self, pattern: &str) -> Result<usize, CacheError>;
}
