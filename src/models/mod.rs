//! Core data models for SK Production Admin
//!
//! This module contains the documents managed by the platform: equipment,
//! projects, tasks, clients, maintenance records and dashboard widgets.

pub mod client;
pub mod equipment;
pub mod ids;
pub mod maintenance;
pub mod money;
pub mod project;
pub mod resource;
pub mod status;
pub mod task;
pub mod widget;

pub use client::Client;
pub use equipment::Equipment;
pub use ids::{
    is_valid_object_id, AuditLogId, ClientId, EquipmentId, MaintenanceId, ProjectId, TaskId,
    UserId, VersionId, WidgetId,
};
pub use maintenance::Maintenance;
pub use money::Money;
pub use project::Project;
pub use resource::{Document, ResourceKind};
pub use status::{
    EquipmentStatus, MaintenanceStatus, MaintenanceType, ProjectStatus, TaskPriority, TaskStatus,
    WidgetType,
};
pub use task::Task;
pub use widget::{Widget, WidgetPosition};
