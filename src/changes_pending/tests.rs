//! Tests for the pending-changes tracker and its comparison rules.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::error::UiError;

/// Indicator that records everything the tracker asks of it.
#[derive(Debug, Default)]
struct RecordingIndicator {
    rendered: Vec<IndicatorView>,
    visibility: Vec<bool>,
    fail_render: bool,
}

impl RecordingIndicator {
    fn visible(&self) -> Option<bool> {
        self.visibility.last().copied()
    }
}

impl PendingIndicator for RecordingIndicator {
    async fn render(&mut self, view: &IndicatorView) -> UiResult<()> {
        if self.fail_render {
            return Err(UiError::Render("template missing".to_string()));
        }
        self.rendered.push(view.clone());
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        self.visibility.push(visible);
    }
}

fn object(value: Value) -> WatchedObject {
    match value {
        Value::Object(fields) => fields,
        other => panic!("expected object, got {other}"),
    }
}

fn compare(a: Value, b: Value) -> bool {
    compare_property("p", &object(a), &object(b))
}

fn tracker(baseline: Value) -> ChangeTracker<RecordingIndicator> {
    ChangeTracker::new(PendingOptions::watching(baseline), RecordingIndicator::default())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Comparison rules
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_string_matches_null() {
    assert!(compare(json!({"p": ""}), json!({"p": null})));
}

#[test]
fn test_empty_string_matches_absent() {
    assert!(compare(json!({"p": ""}), json!({})));
    assert!(compare(json!({"p": []}), json!({"p": null})));
}

#[test]
fn test_empty_array_and_object_differ() {
    assert!(!values_equivalent(Some(&json!([])), Some(&json!({}))));
    assert!(values_equivalent(Some(&json!([])), Some(&Value::Null)));
    assert!(values_equivalent(Some(&json!({})), Some(&Value::Null)));
    assert!(values_equivalent(Some(&json!({})), None));
}

#[test]
fn test_zero_is_not_empty() {
    assert!(!compare(json!({"p": 0}), json!({"p": ""})));
    assert!(!compare(json!({"p": 0}), json!({})));
}

#[test]
fn test_false_is_not_empty() {
    assert!(!compare(json!({"p": false}), json!({})));
    assert!(!compare(json!({"p": false}), json!({"p": null})));
}

#[test]
fn test_equal_falsy_scalars() {
    assert!(compare(json!({"p": 0}), json!({"p": 0})));
    assert!(compare(json!({"p": false}), json!({"p": false})));
    assert!(!compare(json!({"p": false}), json!({"p": 0})));
}

#[test]
fn test_numbers_compare_by_value() {
    assert!(compare(json!({"p": 1}), json!({"p": 1.0})));
    assert!(!compare(json!({"p": 1}), json!({"p": 2})));
}

#[test]
fn test_nested_empty_members_are_stripped() {
    let saved = json!({"p": {"name": "ann", "mail": "", "tags": []}});
    let edited = json!({"p": {"name": "ann", "phone": null}});
    assert!(compare(saved, edited));
}

#[test]
fn test_nested_zero_member_is_kept() {
    let saved = json!({"p": {"count": 0}});
    let edited = json!({"p": {}});
    assert!(!compare(saved, edited));
}

#[test]
fn test_stripping_is_shallow() {
    let saved = json!({"p": {"inner": {"a": "", "b": 1}}});
    let edited = json!({"p": {"inner": {"b": 1}}});
    assert!(!compare(saved, edited));
}

#[test]
fn test_array_positions_are_kept() {
    assert!(compare(json!({"p": ["a", "", "b"]}), json!({"p": ["a", null, "b"]})));
    assert!(!compare(json!({"p": ["a", ""]}), json!({"p": ["a"]})));
    assert!(!compare(json!({"p": ["a", "b"]}), json!({"p": ["b", "a"]})));
}

#[test]
fn test_array_and_object_differ() {
    assert!(!compare(json!({"p": ["x"]}), json!({"p": {"0": "x"}})));
}

#[test]
fn test_compare_does_not_touch_inputs() {
    let a = object(json!({"p": {"x": "", "y": 1}}));
    let b = object(json!({"p": {"y": 1}}));
    let a_before = a.clone();

    assert!(compare_property("p", &a, &b));
    assert_eq!(a, a_before);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tracker lifecycle
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fresh_tracker_is_clean() {
    let tracker = tracker(json!({"name": "ann", "age": 30}));
    assert!(!tracker.is_changed());

    let mut watched = tracker.watched_properties().to_vec();
    watched.sort();
    assert_eq!(watched, ["age", "name"]);
}

#[test]
fn test_missing_baseline_is_empty_and_clean() {
    let mut tracker =
        ChangeTracker::new(PendingOptions::default(), RecordingIndicator::default());
    assert!(tracker.watched_properties().is_empty());

    tracker.make_changes(&json!({"anything": 1}));
    assert!(!tracker.is_changed());
}

#[test]
fn test_non_object_baseline_is_empty() {
    let tracker = tracker(json!(["not", "an", "object"]));
    assert!(tracker.baseline().is_empty());
    assert!(!tracker.is_changed());
}

#[test]
fn test_make_changes_marks_dirty_and_shows_indicator() {
    let mut tracker = tracker(json!({"name": "ann"}));
    tracker.make_changes(&json!({"name": "bob"}));

    assert!(tracker.is_changed());
    assert_eq!(tracker.indicator().visible(), Some(true));
}

#[test]
fn test_unwatched_property_is_ignored() {
    let options = PendingOptions::watching(json!({"name": "ann", "note": "x"}))
        .with_watched_properties(["name"]);
    let mut tracker = ChangeTracker::new(options, RecordingIndicator::default());

    tracker.make_changes(&json!({"name": "ann", "note": "changed", "extra": true}));
    assert!(!tracker.is_changed());
    assert_eq!(tracker.indicator().visible(), Some(false));
}

#[test]
fn test_save_changes_clears_dirty_state() {
    let mut tracker = tracker(json!({"name": "ann"}));
    tracker.make_changes(&json!({"name": "bob"}));
    tracker.save_changes();

    assert!(!tracker.is_changed());
    assert_eq!(tracker.baseline().get("name"), Some(&json!("bob")));
    assert_eq!(tracker.indicator().visibility, vec![true, false]);
}

#[test]
fn test_keys_added_after_save_are_not_watched() {
    let mut tracker = tracker(json!({"name": "ann"}));
    tracker.make_changes(&json!({"name": "ann", "age": 1}));
    tracker.save_changes();

    tracker.make_changes(&json!({"name": "ann", "age": 2}));
    assert!(!tracker.is_changed());
    assert_eq!(tracker.watched_properties(), ["name"]);
}

#[test]
fn test_undo_restores_baseline_and_calls_back_with_watched_subset() {
    let received: Rc<RefCell<Option<WatchedObject>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&received);

    let options = PendingOptions::watching(json!({"name": "ann", "note": "x"}))
        .with_watched_properties(["name", "missing"])
        .with_undo("Revert");
    let mut tracker = ChangeTracker::new(options, RecordingIndicator::default())
        .with_undo_callback(move |restored| {
            *sink.borrow_mut() = Some(restored.clone());
        });

    tracker.make_changes(&json!({"name": "bob", "note": "y"}));
    assert!(tracker.is_changed());

    tracker.undo();
    assert!(!tracker.is_changed());
    assert_eq!(tracker.candidate(), tracker.baseline());
    assert_eq!(tracker.indicator().visible(), Some(false));
    assert_eq!(*received.borrow(), Some(object(json!({"name": "ann"}))));
}

#[test]
fn test_undo_without_callback_is_fine() {
    let mut tracker = tracker(json!({"name": "ann"}));
    tracker.make_changes(&json!({"name": "bob"}));
    tracker.undo();
    assert!(!tracker.is_changed());
}

#[test]
fn test_snapshots_do_not_alias() {
    let mut tracker = tracker(json!({"list": [1, 2]}));
    let mut edit = json!({"list": [1, 2, 3]});
    tracker.make_changes(&edit);
    tracker.save_changes();

    edit["list"] = json!([]);
    tracker.make_changes(&json!({"list": [9]}));

    assert_eq!(tracker.baseline().get("list"), Some(&json!([1, 2, 3])));
}

#[test]
fn test_initial_changes_option_seeds_candidate() {
    let options = PendingOptions {
        changes: Some(json!({"name": "bob"})),
        ..PendingOptions::watching(json!({"name": "ann"}))
    };
    let tracker = ChangeTracker::new(options, RecordingIndicator::default());
    assert!(tracker.is_changed());
}

#[test]
fn test_render_pushes_view_and_visibility() {
    let options = PendingOptions {
        message: "Save to apply".to_string(),
        ..PendingOptions::watching(json!({"name": "ann"}))
    };
    let tracker =
        pollster::block_on(watch_changes(options, RecordingIndicator::default())).unwrap();

    let indicator = tracker.indicator();
    assert_eq!(indicator.rendered.len(), 1);
    assert_eq!(indicator.rendered[0].alert_class, "alert-warning");
    assert_eq!(indicator.rendered[0].icon, "fa-exclamation-circle");
    assert_eq!(indicator.rendered[0].message, "Save to apply");
    assert!(!indicator.rendered[0].undo);
    assert_eq!(indicator.visible(), Some(false));
}

#[test]
fn test_render_failure_propagates() {
    let indicator = RecordingIndicator {
        fail_render: true,
        ..RecordingIndicator::default()
    };
    let result = pollster::block_on(watch_changes(
        PendingOptions::watching(json!({"a": 1})),
        indicator,
    ));
    assert!(matches!(result, Err(UiError::Render(_))));
}

#[test]
fn test_re_render_keeps_state() {
    let mut tracker = tracker(json!({"name": "ann"}));
    tracker.make_changes(&json!({"name": "bob"}));

    pollster::block_on(tracker.re_render(RecordingIndicator::default())).unwrap();

    assert_eq!(tracker.indicator().rendered.len(), 1);
    assert_eq!(tracker.indicator().visible(), Some(true));
}

#[test]
fn test_options_from_host_json() {
    let options: PendingOptions = serde_json::from_value(json!({
        "watchedObj": {"mail": "a@b.c"},
        "undo": true,
        "undoMsg": "Reset",
        "alertClass": "alert-info"
    }))
    .unwrap();

    assert_eq!(options.alert_class, "alert-info");
    assert_eq!(options.undo_msg, "Reset");
    assert_eq!(options.title, "Changes Pending");
    assert!(options.watched_properties.is_none());
}
