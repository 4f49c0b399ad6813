//! Configuration module for SK Production Admin
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - Settings persistence (cache backend, audit paging, display)

pub mod paths;
pub mod settings;

pub use paths::SkpPaths;
pub use settings::{AuditSettings, CacheBackendKind, CacheSettings, Settings};
