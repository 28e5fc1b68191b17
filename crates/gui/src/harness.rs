//! Headless engine harness for integration tests.
//!
//! Wires the authoritative layout, scene reconciler, picking, gesture
//! state machine and camera together without a window or GL context,
//! so the full push-state → reconcile → interact → event cycle can be
//! driven programmatically.

use glam::Vec3;
use std::collections::HashSet;

use shared::{Envelope, Zone, ZoneId, ZoneKind};

use crate::scene::{SceneEvent, SceneSet};
use crate::state::{LayoutState, SelectionState};
use crate::validation::validate_layout;
use crate::viewport::camera::OrbitCamera;
use crate::viewport::gizmo::{GizmoAxis, GizmoMode, TransformController};

/// Headless engine harness with a synthetic 800x600 viewport.
pub struct EngineHarness {
    pub layout: LayoutState,
    pub selection: SelectionState,
    pub invalid: HashSet<ZoneId>,
    pub scene: SceneSet,
    pub controller: TransformController,
    pub camera: OrbitCamera,
    rect: egui::Rect,
    events: Vec<SceneEvent>,
}

impl EngineHarness {
    pub fn new() -> Self {
        Self {
            layout: LayoutState::default(),
            selection: SelectionState::default(),
            invalid: HashSet::new(),
            scene: SceneSet::new(),
            controller: TransformController::new(),
            camera: OrbitCamera::new(),
            rect: egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0)),
            events: Vec::new(),
        }
    }

    pub fn viewport_rect(&self) -> egui::Rect {
        self.rect
    }

    // ── Layout manipulation ───────────────────────────────────

    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.layout.set_envelope(envelope);
    }

    pub fn add_zone(&mut self, zone: Zone) {
        self.layout.add_zone(zone);
    }

    pub fn spawn_zone(&mut self, kind: ZoneKind) -> ZoneId {
        self.layout.spawn_zone(kind)
    }

    pub fn remove_zone(&mut self, id: &str) -> bool {
        self.layout.remove_zone(id)
    }

    // ── Frame cycle ───────────────────────────────────────────

    /// One declarative push: sync gesture and selection against the
    /// current list, then reconcile the scene.
    pub fn reconcile(&mut self) {
        self.controller.sync_with(self.layout.zones());
        self.selection
            .retain_valid(self.layout.zones().iter().map(|z| &z.id));
        self.scene
            .reconcile(&self.layout.envelope, self.layout.zones(), &self.invalid);
    }

    /// Recompute the invalid-id set from the current layout.
    pub fn revalidate(&mut self) {
        self.invalid = validate_layout(&self.layout.envelope, self.layout.zones());
    }

    pub fn stats(&self) -> crate::scene::ResourceStats {
        self.scene.stats()
    }

    /// Full teardown of the reconciled scene.
    pub fn teardown(&mut self) {
        self.scene.clear();
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Picking ───────────────────────────────────────────────

    /// Screen position of a zone's mesh centroid under the synthetic
    /// camera, for aiming clicks in tests.
    pub fn screen_pos_of_zone(&self, id: &str) -> Option<egui::Pos2> {
        let visual = self.scene.zone(id)?;
        self.camera.project(visual.centroid.to_array(), self.rect)
    }

    /// Simulate a click in the viewport. A hit selects and attaches the
    /// gizmo; a miss clears both — unless a drag is in flight, in which
    /// case the click is ignored entirely.
    pub fn click_at(&mut self, pos: egui::Pos2) {
        if self.controller.is_dragging() {
            return;
        }
        let ray = self.camera.screen_ray(pos, self.rect);
        match self.scene.pick(&ray) {
            Some(id) => {
                self.selection.select(id.clone());
                self.controller.attach(id.clone());
                self.events.push(SceneEvent::ZoneSelected(id));
            }
            None => {
                self.selection.clear();
                self.controller.detach();
                self.events.push(SceneEvent::SelectionCleared);
            }
        }
    }

    /// Click on a zone's projected centroid.
    pub fn click_zone(&mut self, id: &str) -> bool {
        match self.screen_pos_of_zone(id) {
            Some(pos) => {
                self.click_at(pos);
                true
            }
            None => false,
        }
    }

    // ── Gestures ──────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.controller.set_mode(mode);
    }

    /// Start a drag on the attached zone; disables camera orbit like
    /// the viewport does.
    pub fn begin_drag(&mut self, axis: GizmoAxis) -> bool {
        let Some(id) = self.controller.attached_zone().cloned() else {
            return false;
        };
        let Some(zone) = self.layout.zone(&id).cloned() else {
            return false;
        };
        let started = self.controller.begin_drag(axis, &zone);
        if started {
            self.camera.enabled = false;
        }
        started
    }

    /// One translation input event. The provisional patch is applied to
    /// the layout so the visual tracks the drag.
    pub fn drag_translate(&mut self, world_delta: Vec3) {
        if let Some(patch) = self.controller.drag_translate(world_delta) {
            self.apply_provisional(&patch);
            self.events.push(SceneEvent::ZoneTransforming(patch));
        }
    }

    /// One scale input event along the active axis.
    pub fn drag_scale(&mut self, world_delta: f32) {
        if let Some(patch) = self.controller.drag_scale(world_delta) {
            self.apply_provisional(&patch);
            self.events.push(SceneEvent::ZoneTransforming(patch));
        }
    }

    /// Set the accumulated scale factors directly.
    pub fn set_scale_factor(&mut self, factor: [f64; 3]) {
        if let Some(patch) = self.controller.set_scale_factor(factor) {
            self.apply_provisional(&patch);
            self.events.push(SceneEvent::ZoneTransforming(patch));
        }
    }

    /// Finish the gesture; re-enables orbit. When movement occurred and
    /// the zone still exists the merged record is committed.
    pub fn end_drag(&mut self) {
        self.camera.enabled = true;
        if let Some(zone) = self.controller.end_drag(self.layout.zones()) {
            self.layout.apply_update(zone.clone());
            self.events.push(SceneEvent::ZoneUpdated(zone));
        }
    }

    fn apply_provisional(&mut self, patch: &shared::ZonePatch) {
        if let Some(zone) = self.layout.zone(&patch.id) {
            let updated = patch.apply_to(zone);
            self.layout.apply_update(updated);
        }
    }
}

impl Default for EngineHarness {
    fn default() -> Self {
        Self::new()
    }
}
