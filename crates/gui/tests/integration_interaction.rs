//! Integration tests for picking and drag gestures, driven through the
//! headless harness with synthetic camera rays.

use glam::Vec3;

use habitat_gui_lib::fixtures::{cylinder_envelope, unit_zone};
use habitat_gui_lib::harness::EngineHarness;
use habitat_gui_lib::scene::SceneEvent;
use habitat_gui_lib::viewport::gizmo::{GizmoAxis, GizmoMode};

fn harness_with_zone(id: &str) -> EngineHarness {
    let mut h = EngineHarness::new();
    h.set_envelope(cylinder_envelope(10.0, 12.0));
    h.add_zone(unit_zone(id, 0.0, 0.0));
    h.reconcile();
    h
}

#[test]
fn test_click_on_zone_selects_it() {
    let mut h = harness_with_zone("a");
    assert!(h.click_zone("a"));

    assert!(h.selection.is_selected("a"));
    assert_eq!(
        h.drain_events(),
        vec![SceneEvent::ZoneSelected("a".to_string())]
    );
}

#[test]
fn test_click_on_empty_space_clears_selection() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");
    h.drain_events();

    // Top-left corner: no zone under this ray
    h.click_at(egui::pos2(5.0, 5.0));

    assert!(h.selection.selected().is_none());
    assert!(h.controller.attached_zone().is_none());
    assert_eq!(h.drain_events(), vec![SceneEvent::SelectionCleared]);
}

#[test]
fn test_attach_second_zone_moves_the_single_gizmo() {
    let mut h = EngineHarness::new();
    h.add_zone(unit_zone("a", -4.0, 0.0));
    h.add_zone(unit_zone("b", 4.0, 0.0));
    h.reconcile();

    assert!(h.click_zone("a"));
    assert!(h.click_zone("b"));

    assert_eq!(h.controller.attached_zone().map(String::as_str), Some("b"));
    assert!(h.selection.is_selected("b"));
}

#[test]
fn test_translate_gesture_commits_merged_record() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");
    h.drain_events();

    assert!(h.begin_drag(GizmoAxis::X));
    assert!(!h.camera.enabled, "orbit must pause during a drag");

    h.drag_translate(Vec3::new(2.0, 0.0, 0.0));
    h.drag_translate(Vec3::new(0.0, 0.0, 3.0));
    h.end_drag();
    assert!(h.camera.enabled);

    let events = h.drain_events();
    let transforming: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, SceneEvent::ZoneTransforming(_)))
        .collect();
    assert_eq!(transforming.len(), 2, "one preview event per input event");

    let Some(SceneEvent::ZoneUpdated(zone)) = events.last() else {
        panic!("expected a commit event, got {:?}", events.last());
    };
    assert!((zone.position_x - 2.0).abs() < 1e-6);
    assert!((zone.position_y - 0.0).abs() < 1e-6, "floor height preserved");
    assert!((zone.position_z - 3.0).abs() < 1e-6);

    let stored = h.layout.zone("a").unwrap();
    assert!((stored.position_x - 2.0).abs() < 1e-6);
}

#[test]
fn test_scale_gesture_multiplies_initial_dims() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");
    h.set_mode(GizmoMode::Scale);

    assert!(h.begin_drag(GizmoAxis::Y));
    h.set_scale_factor([1.5, 1.5, 1.5]);
    h.end_drag();

    let zone = h.layout.zone("a").unwrap();
    assert!((zone.width - 3.0).abs() < 1e-6);
    assert!((zone.height - 3.0).abs() < 1e-6);
    assert!((zone.depth - 3.0).abs() < 1e-6);
    // Floor position untouched by scaling
    assert!((zone.position_y - 0.0).abs() < 1e-6);
}

#[test]
fn test_drag_without_movement_commits_nothing() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");
    h.drain_events();

    h.begin_drag(GizmoAxis::X);
    h.end_drag();

    assert!(h
        .drain_events()
        .iter()
        .all(|e| !matches!(e, SceneEvent::ZoneUpdated(_))));
}

#[test]
fn test_zone_deleted_mid_gesture_aborts_silently() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");
    h.begin_drag(GizmoAxis::X);
    h.drag_translate(Vec3::new(1.0, 0.0, 0.0));
    h.drain_events();

    // Host deletes the zone and pushes a new list mid-gesture
    h.remove_zone("a");
    h.reconcile();
    h.end_drag();

    assert!(h.controller.attached_zone().is_none());
    assert!(h
        .drain_events()
        .iter()
        .all(|e| !matches!(e, SceneEvent::ZoneUpdated(_))));
    assert_eq!(h.scene.zone_count(), 0);
}

#[test]
fn test_click_during_drag_cannot_steal_selection() {
    let mut h = EngineHarness::new();
    h.add_zone(unit_zone("a", -4.0, 0.0));
    h.add_zone(unit_zone("b", 4.0, 0.0));
    h.reconcile();

    h.click_zone("a");
    h.begin_drag(GizmoAxis::X);
    h.drain_events();

    // Clicks are ignored while the gesture is in flight
    h.click_zone("b");
    h.click_at(egui::pos2(5.0, 5.0));

    assert!(h.selection.is_selected("a"));
    assert_eq!(h.controller.attached_zone().map(String::as_str), Some("a"));
    assert!(h.drain_events().is_empty());
}

#[test]
fn test_mode_switch_keeps_gizmo_attached() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");

    h.set_mode(GizmoMode::Scale);
    assert_eq!(h.controller.attached_zone().map(String::as_str), Some("a"));

    h.set_mode(GizmoMode::Translate);
    assert_eq!(h.controller.attached_zone().map(String::as_str), Some("a"));
}

#[test]
fn test_escape_style_detach_is_idempotent() {
    let mut h = harness_with_zone("a");
    h.click_zone("a");

    h.controller.detach();
    h.selection.clear();
    h.controller.detach();

    assert!(h.controller.attached_zone().is_none());
    h.reconcile();
    assert_eq!(h.scene.zone_count(), 1);
}
