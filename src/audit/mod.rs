//! Audit logging system
//!
//! Records who did what to which resource, with field-level changes and the
//! originating request, in an append-only log.
//!
//! # Architecture
//!
//! - `RequestContext`: the acting user plus request metadata (IP, user agent,
//!   method, endpoint).
//! - `AuditLog`: one entry with action, resource, resource id and changes.
//! - `AuditLogger`: best-effort writer (JSON Lines) and filtered, paginated
//!   reader.
//! - `extract_changes`: top-level field diff shared with version history.
//!
//! # Example
//!
//! ```rust,ignore
//! use sk_production::audit::{extract_changes, AuditAction, AuditLogger, RequestContext};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let changes = extract_changes(&before_json, &after_json);
//! logger.log_action(&ctx, AuditAction::Update, ResourceKind::Equipment, &id, changes);
//! ```

mod context;
mod diff;
mod entry;
mod logger;

pub use context::RequestContext;
pub use diff::{extract_changes, is_internal_field, summarize_changes, FieldChange, INTERNAL_FIELDS};
pub use entry::{AuditAction, AuditLog, RequestMetadata};
pub use logger::{AuditFilter, AuditLogger, AuditPage};
