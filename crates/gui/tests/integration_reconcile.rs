//! Integration tests for declarative scene reconciliation:
//! list diffing, minimal churn, and exactly-once resource disposal.

use habitat_gui_lib::fixtures::{cylinder_envelope, unit_zone};
use habitat_gui_lib::harness::EngineHarness;
use shared::ZoneKind;

#[test]
fn test_scene_tracks_pushed_list_exactly() {
    let mut h = EngineHarness::new();
    h.set_envelope(cylinder_envelope(10.0, 12.0));
    h.add_zone(unit_zone("a", -3.0, 0.0));
    h.add_zone(unit_zone("b", 3.0, 0.0));
    h.reconcile();

    assert_eq!(h.scene.zone_count(), 2);
    assert!(h.scene.zone("a").is_some());
    assert!(h.scene.zone("b").is_some());

    // Second push: b stays, a leaves, c arrives
    h.remove_zone("a");
    h.add_zone(unit_zone("c", 0.0, 3.0));
    h.reconcile();

    assert_eq!(h.scene.zone_count(), 2);
    assert!(h.scene.zone("a").is_none());
    assert!(h.scene.zone("b").is_some());
    assert!(h.scene.zone("c").is_some());
}

#[test]
fn test_identical_push_is_free() {
    let mut h = EngineHarness::new();
    h.set_envelope(cylinder_envelope(10.0, 12.0));
    h.add_zone(unit_zone("a", -3.0, 0.0));
    h.add_zone(unit_zone("b", 3.0, 0.0));
    h.reconcile();

    let stats = h.stats();
    h.reconcile();
    h.reconcile();
    assert_eq!(h.stats(), stats, "identical pushes must rebuild nothing");
}

#[test]
fn test_dimension_edit_rebuilds_only_that_zone() {
    let mut h = EngineHarness::new();
    h.add_zone(unit_zone("a", -3.0, 0.0));
    h.add_zone(unit_zone("b", 3.0, 0.0));
    h.reconcile();

    let built = h.stats().meshes_built;
    let b_version = h.scene.zone("b").unwrap().version;

    let mut edited = h.layout.zone("a").unwrap().clone();
    edited.height = 4.0;
    h.layout.apply_update(edited);
    h.reconcile();

    assert_eq!(h.stats().meshes_built, built + 1);
    assert_eq!(h.scene.zone("b").unwrap().version, b_version);
}

#[test]
fn test_move_and_recolor_rebuild_nothing() {
    let mut h = EngineHarness::new();
    h.add_zone(unit_zone("a", 0.0, 0.0));
    h.reconcile();
    let stats = h.stats();

    let mut edited = h.layout.zone("a").unwrap().clone();
    edited.position_x = 4.0;
    edited.color_hex = Some("#2288ff".to_string());
    h.layout.apply_update(edited);
    h.reconcile();

    assert_eq!(h.stats(), stats);
    let visual = h.scene.zone("a").unwrap();
    assert!((visual.centroid.x - 4.0).abs() < 1e-6);
}

#[test]
fn test_spawn_sequence_stays_valid() {
    // Adding zones from the toolbar must not stack them: each lands on
    // the placement ring, so none overlaps and none leaves the hull.
    let mut h = EngineHarness::new();
    for kind in [
        ZoneKind::Habitation,
        ZoneKind::Laboratory,
        ZoneKind::Greenhouse,
        ZoneKind::Storage,
        ZoneKind::LifeSupport,
    ] {
        h.spawn_zone(kind);
    }
    h.revalidate();
    h.reconcile();

    assert_eq!(h.scene.zone_count(), 5);
    assert!(h.invalid.is_empty(), "fresh zones must not start invalid");
}

#[test]
fn test_invalid_highlight_round_trip() {
    let mut h = EngineHarness::new();
    h.set_envelope(cylinder_envelope(5.0, 10.0));
    // Far outside the radius
    h.add_zone(unit_zone("out", 20.0, 0.0));
    h.add_zone(unit_zone("in", 0.0, 0.0));
    h.revalidate();
    h.reconcile();

    assert!(h.invalid.contains("out"));
    assert!(!h.invalid.contains("in"));
    let stats = h.stats();
    assert_eq!(
        h.scene.zone("out").unwrap().display_color(),
        habitat_gui_lib::scene::INVALID_COLOR
    );

    // Move it inside: highlight clears without any rebuild
    let mut fixed = h.layout.zone("out").unwrap().clone();
    fixed.position_x = 2.0;
    h.layout.apply_update(fixed);
    h.revalidate();
    h.reconcile();

    assert!(!h.invalid.contains("out"));
    assert_ne!(
        h.scene.zone("out").unwrap().display_color(),
        habitat_gui_lib::scene::INVALID_COLOR
    );
    assert_eq!(h.stats(), stats);
}

#[test]
fn test_envelope_transparency_toggle_is_in_place() {
    let mut h = EngineHarness::new();
    h.set_envelope(cylinder_envelope(10.0, 12.0));
    h.reconcile();
    let stats = h.stats();

    let mut env = h.layout.envelope.clone();
    env.transparent = true;
    h.set_envelope(env);
    h.reconcile();

    assert_eq!(h.stats(), stats);
    assert!(h.scene.envelope.as_ref().unwrap().transparent);
}

#[test]
fn test_teardown_disposes_each_visual_exactly_once() {
    let mut h = EngineHarness::new();
    h.set_envelope(cylinder_envelope(10.0, 12.0));
    for i in 0..5 {
        h.add_zone(unit_zone(&format!("z{i}"), i as f64 * 3.0 - 6.0, 0.0));
    }
    h.reconcile();

    // 5 zones + envelope
    assert_eq!(h.stats().meshes_built, 6);

    h.teardown();
    assert_eq!(h.stats().meshes_disposed, 6);

    // A second teardown has nothing left to dispose
    h.teardown();
    assert_eq!(h.stats().meshes_disposed, 6);
}
