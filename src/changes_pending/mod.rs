//! Pending-changes tracking for edit views.
//!
//! A [`ChangeTracker`] holds two owned snapshots: the baseline (what was last
//! saved) and the candidate (what the user is editing). After every mutation
//! it recomputes whether any watched property diverges and pushes the result
//! to a [`PendingIndicator`], which the host uses to show or hide a
//! "changes pending" banner.
//!
//! The set of watched properties is fixed at construction. When it is not
//! given explicitly it is the key set of the initial baseline, so keys that
//! only appear after a later [`ChangeTracker::save_changes`] are never
//! observed.

mod compare;

#[cfg(test)]
mod tests;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::UiResult;

pub use compare::{
    compare_property, has_changes, is_empty_value, structurally_equal, values_equivalent,
};

/// A watched object is a map of property names to JSON values.
pub type WatchedObject = Map<String, Value>;

/// Called by [`ChangeTracker::undo`] with the restored watched properties.
pub type UndoCallback = Box<dyn FnMut(&WatchedObject)>;

/// Options for creating a [`ChangeTracker`].
///
/// Field names follow the host widget's camelCase argument names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOptions {
    /// CSS class applied to the whole indicator
    #[serde(default = "default_alert_class")]
    pub alert_class: String,
    /// Icon class name
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Bold title of the indicator
    #[serde(default = "default_title")]
    pub title: String,
    /// Additional message
    #[serde(default)]
    pub message: String,
    /// Whether the undo link is offered
    #[serde(default)]
    pub undo: bool,
    /// Text of the undo link
    #[serde(default = "default_undo_msg")]
    pub undo_msg: String,
    /// The saved object whose properties are watched
    #[serde(default)]
    pub watched_obj: Option<Value>,
    /// Properties to watch, defaults to the keys of `watched_obj`
    #[serde(default)]
    pub watched_properties: Option<Vec<String>>,
    /// Pending edits, defaults to a copy of `watched_obj`
    #[serde(default)]
    pub changes: Option<Value>,
}

fn default_alert_class() -> String {
    "alert-warning".to_string()
}

fn default_icon() -> String {
    "fa-exclamation-circle".to_string()
}

fn default_title() -> String {
    "Changes Pending".to_string()
}

fn default_undo_msg() -> String {
    "Undo Changes".to_string()
}

impl Default for PendingOptions {
    fn default() -> Self {
        Self {
            alert_class: default_alert_class(),
            icon: default_icon(),
            title: default_title(),
            message: String::new(),
            undo: false,
            undo_msg: default_undo_msg(),
            watched_obj: None,
            watched_properties: None,
            changes: None,
        }
    }
}

impl PendingOptions {
    /// Options watching every property of `baseline`.
    pub fn watching(baseline: Value) -> Self {
        Self {
            watched_obj: Some(baseline),
            ..Self::default()
        }
    }

    /// Restrict watching to the given properties.
    pub fn with_watched_properties<S: Into<String>>(
        mut self,
        properties: impl IntoIterator<Item = S>,
    ) -> Self {
        self.watched_properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    /// Offer an undo link with the given label.
    pub fn with_undo(mut self, undo_msg: impl Into<String>) -> Self {
        self.undo = true;
        self.undo_msg = undo_msg.into();
        self
    }
}

/// What the indicator template needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorView {
    pub alert_class: String,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub undo: bool,
    pub undo_msg: String,
}

/// Host-side rendering of the pending-changes indicator.
pub trait PendingIndicator {
    /// Render the indicator template.
    fn render(&mut self, view: &IndicatorView) -> impl Future<Output = UiResult<()>>;

    /// Show or hide the indicator region.
    fn set_visible(&mut self, visible: bool);
}

/// Indicator for callers that only need the dirty signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl PendingIndicator for Headless {
    async fn render(&mut self, _view: &IndicatorView) -> UiResult<()> {
        Ok(())
    }

    fn set_visible(&mut self, _visible: bool) {}
}

/// Tracks divergence between a saved object and its pending edits.
pub struct ChangeTracker<I> {
    view: IndicatorView,
    baseline: WatchedObject,
    candidate: WatchedObject,
    watched_properties: Vec<String>,
    indicator: I,
    undo_callback: Option<UndoCallback>,
}

impl<I: PendingIndicator> ChangeTracker<I> {
    /// Create a tracker. Nothing is rendered until [`render`](Self::render).
    ///
    /// A missing or non-object baseline is treated as an empty object, which
    /// is never dirty.
    pub fn new(options: PendingOptions, indicator: I) -> Self {
        let PendingOptions {
            alert_class,
            icon,
            title,
            message,
            undo,
            undo_msg,
            watched_obj,
            watched_properties,
            changes,
        } = options;

        let baseline = into_object(watched_obj, "watchedObj");
        let watched_properties =
            watched_properties.unwrap_or_else(|| baseline.keys().cloned().collect());
        let candidate = match changes {
            Some(changes) => into_object(Some(changes), "changes"),
            None => baseline.clone(),
        };

        Self {
            view: IndicatorView {
                alert_class,
                icon,
                title,
                message,
                undo,
                undo_msg,
            },
            baseline,
            candidate,
            watched_properties,
            indicator,
            undo_callback: None,
        }
    }

    /// Set the callback invoked by [`undo`](Self::undo).
    pub fn with_undo_callback(mut self, callback: impl FnMut(&WatchedObject) + 'static) -> Self {
        self.undo_callback = Some(Box::new(callback));
        self
    }

    /// Render the indicator, then push the current dirty state to it.
    pub async fn render(&mut self) -> UiResult<()> {
        self.indicator.render(&self.view).await?;
        self.check_changes();
        Ok(())
    }

    /// Render into a new indicator, keeping the tracked state.
    ///
    /// Used when the host view re-rendered and the previous indicator
    /// element no longer exists.
    pub async fn re_render(&mut self, indicator: I) -> UiResult<()> {
        self.indicator = indicator;
        self.render().await
    }

    /// Replace the pending edits with a copy of `changes`.
    pub fn make_changes(&mut self, changes: &Value) {
        self.candidate = into_object(Some(changes.clone()), "changes");
        self.check_changes();
    }

    /// Commit the pending edits as the new baseline.
    ///
    /// The watched property set is left untouched.
    pub fn save_changes(&mut self) {
        self.baseline = self.candidate.clone();
        self.check_changes();
    }

    /// Discard the pending edits and hand the restored watched properties to
    /// the undo callback.
    pub fn undo(&mut self) {
        self.candidate = self.baseline.clone();
        let restored = self.watched_values();
        if let Some(callback) = self.undo_callback.as_mut() {
            callback(&restored);
        }
        self.check_changes();
    }

    /// True if any watched property differs between baseline and candidate.
    pub fn is_changed(&self) -> bool {
        has_changes(&self.watched_properties, &self.baseline, &self.candidate)
    }

    /// The baseline restricted to the watched properties.
    pub fn watched_values(&self) -> WatchedObject {
        self.watched_properties
            .iter()
            .filter_map(|property| {
                self.baseline
                    .get(property)
                    .map(|value| (property.clone(), value.clone()))
            })
            .collect()
    }

    pub fn baseline(&self) -> &WatchedObject {
        &self.baseline
    }

    pub fn candidate(&self) -> &WatchedObject {
        &self.candidate
    }

    pub fn watched_properties(&self) -> &[String] {
        &self.watched_properties
    }

    pub fn view(&self) -> &IndicatorView {
        &self.view
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    fn check_changes(&mut self) {
        let changed = self.is_changed();
        tracing::debug!(
            changed,
            watched = self.watched_properties.len(),
            "pending changes recomputed"
        );
        self.indicator.set_visible(changed);
    }
}

/// Create a tracker and render it.
///
/// The returned future completes once the indicator is rendered and shows
/// the initial dirty state.
pub async fn watch_changes<I: PendingIndicator>(
    options: PendingOptions,
    indicator: I,
) -> UiResult<ChangeTracker<I>> {
    let mut tracker = ChangeTracker::new(options, indicator);
    tracker.render().await?;
    Ok(tracker)
}

fn into_object(value: Option<Value>, field: &str) -> WatchedObject {
    match value {
        Some(Value::Object(fields)) => fields,
        None | Some(Value::Null) => Map::new(),
        Some(other) => {
            tracing::warn!(field, kind = value_kind(&other), "expected an object, treating as empty");
            Map::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
