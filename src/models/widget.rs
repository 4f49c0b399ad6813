//! Dashboard widget model
//!
//! Per-user dashboard tile configuration. Pure UI state persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{UserId, WidgetId};
use super::resource::{Document, ResourceKind};
use super::status::WidgetType;

/// Grid placement of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Default for WidgetPosition {
    fn default() -> Self {
        Self { x: 0, y: 0, w: 4, h: 2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(rename = "_id")]
    pub id: WidgetId,

    pub user: UserId,

    #[serde(rename = "type")]
    pub widget_type: WidgetType,

    #[serde(default)]
    pub position: WidgetPosition,

    /// Tile-specific settings, stored as given
    #[serde(default)]
    pub settings: serde_json::Value,

    #[serde(default)]
    pub order: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Widget {
    pub fn new(user: UserId, widget_type: WidgetType) -> Self {
        let now = Utc::now();
        Self {
            id: WidgetId::new(),
            user,
            widget_type,
            position: WidgetPosition::default(),
            settings: serde_json::Value::Object(Default::default()),
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Widget {
    type Id = WidgetId;

    const KIND: ResourceKind = ResourceKind::Widget;

    fn id(&self) -> WidgetId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
