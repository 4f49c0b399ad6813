//! Dashboard widget service
//!
//! Widgets are per-user layout state: audited and dashboard-invalidating, but
//! never versioned.

use serde_json::Value;

use crate::audit::RequestContext;
use crate::cache::Cache;
use crate::error::{AdminError, AdminResult};
use crate::models::{Document, UserId, Widget, WidgetId, WidgetPosition, WidgetType};
use crate::storage::Storage;

use super::effects::Effects;

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct WidgetPatch {
    pub widget_type: Option<WidgetType>,
    pub position: Option<WidgetPosition>,
    pub settings: Option<Value>,
}

pub struct WidgetService<'a> {
    storage: &'a Storage,
    cache: &'a Cache,
}

impl<'a> WidgetService<'a> {
    pub fn new(storage: &'a Storage, cache: &'a Cache) -> Self {
        Self { storage, cache }
    }

    fn effects(&self) -> Effects<'a> {
        Effects::new(self.storage, self.cache)
    }

    fn owned(&self, user: UserId, id: WidgetId) -> AdminResult<Widget> {
        self.storage
            .widgets
            .get(id)?
            .filter(|w| w.user == user)
            .ok_or_else(|| AdminError::not_found("Widget", id.to_string()))
    }

    /// A user's widgets in display order
    pub fn list_for_user(&self, user: UserId) -> AdminResult<Vec<Widget>> {
        let mut widgets = self.storage.widgets.find(|w| w.user == user)?;
        widgets.sort_by_key(|w| w.order);
        Ok(widgets)
    }

    /// Add a widget at the end of the user's dashboard
    pub fn create(
        &self,
        user: UserId,
        widget_type: WidgetType,
        position: Option<WidgetPosition>,
        settings: Option<Value>,
        ctx: &RequestContext,
    ) -> AdminResult<Widget> {
        let next_order = self
            .list_for_user(user)?
            .last()
            .map(|w| w.order + 1)
            .unwrap_or(0);

        let mut widget = Widget::new(user, widget_type);
        widget.order = next_order;
        if let Some(position) = position {
            widget.position = position;
        }
        if let Some(settings) = settings {
            if !settings.is_object() {
                return Err(AdminError::Validation(
                    "Widget settings must be a JSON object".into(),
                ));
            }
            widget.settings = settings;
        }

        self.storage.widgets.upsert(widget.clone())?;
        self.storage.widgets.save()?;

        self.effects().created(&widget, ctx);
        Ok(widget)
    }

    pub fn update(
        &self,
        user: UserId,
        id: WidgetId,
        patch: WidgetPatch,
        ctx: &RequestContext,
    ) -> AdminResult<Widget> {
        let before = self.owned(user, id)?;
        let mut widget = before.clone();

        if let Some(widget_type) = patch.widget_type {
            widget.widget_type = widget_type;
        }
        if let Some(position) = patch.position {
            widget.position = position;
        }
        if let Some(settings) = patch.settings {
            if !settings.is_object() {
                return Err(AdminError::Validation(
                    "Widget settings must be a JSON object".into(),
                ));
            }
            widget.settings = settings;
        }
        widget.touch();

        self.storage.widgets.upsert(widget.clone())?;
        self.storage.widgets.save()?;

        self.effects().updated(&before, &widget, ctx, None);
        Ok(widget)
    }

    pub fn delete(&self, user: UserId, id: WidgetId, ctx: &RequestContext) -> AdminResult<Widget> {
        self.owned(user, id)?;
        let widget = self
            .storage
            .widgets
            .delete(id)?
            .ok_or_else(|| AdminError::not_found("Widget", id.to_string()))?;
        self.storage.widgets.save()?;

        self.effects().deleted(&widget, ctx);
        Ok(widget)
    }

    /// Reorder a user's widgets
    ///
    /// `ids` lists widgets in their new order; widgets not listed keep their
    /// relative order after the listed ones.
    pub fn reorder(
        &self,
        user: UserId,
        ids: &[WidgetId],
        ctx: &RequestContext,
    ) -> AdminResult<Vec<Widget>> {
        let current = self.list_for_user(user)?;
        for id in ids {
            if !current.iter().any(|w| w.id == *id) {
                return Err(AdminError::not_found("Widget", id.to_string()));
            }
        }

        let (listed, rest): (Vec<Widget>, Vec<Widget>) =
            current.iter().cloned().partition(|w| ids.contains(&w.id));
        let mut ordered: Vec<Widget> = ids
            .iter()
            .filter_map(|id| listed.iter().find(|w| w.id == *id).cloned())
            .collect();
        ordered.extend(rest);

        let mut changed = Vec::new();
        for (order, widget) in ordered.iter_mut().enumerate() {
            let order = order as u32;
            if widget.order != order {
                let before = widget.clone();
                widget.order = order;
                widget.touch();
                changed.push((before, widget.clone()));
            }
        }

        if !changed.is_empty() {
            self.storage
                .widgets
                .upsert_many(changed.iter().map(|(_, after)| after.clone()).collect())?;
            self.storage.widgets.save()?;

            let effects = self.effects();
            for (before, after) in &changed {
                effects.updated(before, after, ctx, None);
            }
        }

        Ok(ordered)
    }
}
