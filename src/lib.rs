//! SK Production Admin core
//!
//! This library provides the backend core of the SK Production Admin platform:
//! equipment inventory, projects, tasks, clients, maintenance and dashboard
//! widgets, with an append-only audit log, per-document version history and a
//! best-effort cache invalidated on every mutation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Core data models (equipment, projects, tasks, etc.)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `history`: Version snapshots and diffs
//! - `cache`: Cache backends and key conventions
//! - `services`: Business logic layer
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `skp` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use sk_production::audit::RequestContext;
//! use sk_production::cache::Cache;
//! use sk_production::config::{SkpPaths, Settings};
//! use sk_production::models::EquipmentStatus;
//! use sk_production::services::{EquipmentService, NewEquipment};
//! use sk_production::storage::Storage;
//!
//! let paths = SkpPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! let cache = Cache::from_settings(&settings.cache);
//!
//! let service = EquipmentService::new(&storage, &cache);
//! let ctx = RequestContext::system();
//! let mixer = service.create(NewEquipment::new("Digital Mixer", "Audio"), &ctx)?;
//! service.set_status(mixer.id, EquipmentStatus::InUse, &ctx)?;
//! ```

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod history;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{AdminError, AdminResult};
