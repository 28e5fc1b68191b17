//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
mod overlays;
pub use habitat_gui_lib::viewport::{camera, gizmo, mesh, picking};

use std::sync::{Arc, Mutex};

use egui::Ui;
use glam::Vec3;

use crate::scene::{SceneEvent, SceneSet};
use crate::state::AppState;
use camera::OrbitCamera;
use gizmo::{build_gizmo_lines, compute_drag_delta, gizmo_hit_test, TransformController};
use gl_renderer::{EnvelopeDraw, GlRenderer, RenderParams, SceneSnapshot, ZoneDraw};
use mesh::LineMeshData;

const GIZMO_LENGTH: f32 = 2.0;

/// 3D viewport panel: owns the camera, the reconciled scene and the
/// gesture state machine; returns the frame's scene events.
pub struct ViewportPanel {
    camera: OrbitCamera,
    scene: SceneSet,
    controller: TransformController,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    events: Vec<SceneEvent>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: OrbitCamera::new(),
            scene: SceneSet::new(),
            controller: TransformController::new(),
            gl_renderer: None,
            events: Vec::new(),
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        let renderer = GlRenderer::new(gl);
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
    }

    pub fn reset_camera(&mut self) {
        let enabled = self.camera.enabled;
        self.camera = OrbitCamera::new();
        self.camera.enabled = enabled;
    }

    /// Point the camera at a world position
    pub fn focus_on(&mut self, target: Vec3) {
        self.camera.target = target;
    }

    /// Centroid of a reconciled zone visual
    pub fn zone_center(&self, id: &str) -> Option<Vec3> {
        self.scene.zone(id).map(|v| v.centroid)
    }

    /// Drop the gizmo attachment (Escape, zone deletion)
    pub fn detach_gizmo(&mut self) {
        self.controller.detach();
        self.camera.enabled = true;
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Tear down GPU resources; called once on app exit.
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
        self.scene.clear();
    }

    /// Run one viewport frame: sync declarative state, handle input,
    /// render, and return the scene events produced.
    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) -> Vec<SceneEvent> {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Declarative push: reconcile before anything renders ──
        self.controller.set_mode(state.transform_mode);
        self.controller.sync_with(state.layout.zones());
        state
            .selection
            .retain_valid(state.layout.zones().iter().map(|z| &z.id));
        self.scene
            .reconcile(&state.layout.envelope, state.layout.zones(), &state.invalid);

        // Keep the gizmo bound to the selection
        match state.selection.selected() {
            Some(id) => {
                self.controller.attach(id.clone());
            }
            None => {
                if !self.controller.is_dragging() {
                    self.controller.detach();
                }
            }
        }

        // ── Gizmo and camera controls ────────────────────────
        self.handle_gizmo_and_camera(&response, ui, rect, state);

        // ── Scroll zoom ──────────────────────────────────────
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            self.camera.zoom(scroll * 0.01);
        }

        // ── Zone selection via click ─────────────────────────
        self.handle_selection(&response, rect, state);

        // Keep repainting while the camera coasts or a drag is live
        if self.camera.update() || self.controller.is_dragging() {
            ui.ctx().request_repaint();
        }

        if !ui.is_rect_visible(rect) {
            return std::mem::take(&mut self.events);
        }

        // ── Gizmo lines ──────────────────────────────────────
        let gizmo_lines = self.build_gizmo(state);

        // ── GL rendering ─────────────────────────────────────
        self.render_gl(ui, rect, state, gizmo_lines);

        // ── Overlays ─────────────────────────────────────────
        self.draw_overlays(ui, rect, state);

        std::mem::take(&mut self.events)
    }

    fn handle_gizmo_and_camera(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        state: &mut AppState,
    ) {
        if self.controller.is_dragging() {
            if response.dragged_by(egui::PointerButton::Primary) {
                let delta = response.drag_delta();
                if delta != egui::Vec2::ZERO {
                    self.apply_drag_delta(delta, rect);
                }
            }
            if response.drag_stopped() || !response.dragged_by(egui::PointerButton::Primary) {
                self.camera.enabled = true;
                if let Some(zone) = self.controller.end_drag(state.layout.zones()) {
                    self.events.push(SceneEvent::ZoneUpdated(zone));
                }
            }
        } else {
            // ── Camera controls (only when not dragging gizmo) ──
            if response.dragged_by(egui::PointerButton::Middle)
                || (response.dragged_by(egui::PointerButton::Primary)
                    && ui.input(|i| i.modifiers.alt))
            {
                let delta = response.drag_delta();
                self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
            }

            if response.dragged_by(egui::PointerButton::Secondary) {
                let delta = response.drag_delta();
                self.camera.pan(delta.x * 0.01, delta.y * 0.01);
            }

            // ── Gizmo drag start on LMB drag ───────────────────
            if response.drag_started_by(egui::PointerButton::Primary)
                && !ui.input(|i| i.modifiers.alt)
            {
                let pointer_pos = response
                    .interact_pointer_pos()
                    .or_else(|| response.hover_pos());
                if let (Some(pos), Some(id)) =
                    (pointer_pos, self.controller.attached_zone().cloned())
                {
                    if let Some(visual) = self.scene.zone(&id) {
                        let center = visual.centroid;
                        let ray = self.camera.screen_ray(pos, rect);
                        if let Some(axis) = gizmo_hit_test(&ray, center, GIZMO_LENGTH) {
                            if let Some(zone) = state.layout.zone(&id) {
                                if self.controller.begin_drag(axis, zone) {
                                    // Orbit and manipulation are mutually
                                    // exclusive for the gesture's duration
                                    self.camera.enabled = false;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn apply_drag_delta(&mut self, screen_delta: egui::Vec2, rect: egui::Rect) {
        let Some(id) = self.controller.attached_zone().cloned() else {
            return;
        };
        let Some(visual) = self.scene.zone(&id) else {
            return;
        };
        let center = visual.centroid;
        let Some(drag) = self.controller.active_axis() else {
            return;
        };
        let world_delta = compute_drag_delta(&self.camera, center, drag, screen_delta, rect);

        let patch = match self.controller.mode() {
            gizmo::GizmoMode::Translate => self.controller.drag_translate(world_delta),
            gizmo::GizmoMode::Scale => self
                .controller
                .drag_scale(world_delta[drag.index()]),
        };
        if let Some(patch) = patch {
            self.events.push(SceneEvent::ZoneTransforming(patch));
        }
    }

    fn handle_selection(&mut self, response: &egui::Response, rect: egui::Rect, state: &mut AppState) {
        if !response.clicked() || self.controller.is_dragging() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let ray = self.camera.screen_ray(pos, rect);
        match self.scene.pick(&ray) {
            Some(id) => {
                state.selection.select(id.clone());
                self.controller.attach(id.clone());
                self.events.push(SceneEvent::ZoneSelected(id));
            }
            None => {
                state.selection.clear();
                self.controller.detach();
                self.events.push(SceneEvent::SelectionCleared);
            }
        }
    }

    fn build_gizmo(&self, _state: &AppState) -> Option<LineMeshData> {
        let id = self.controller.attached_zone()?;
        let visual = self.scene.zone(id)?;
        Some(build_gizmo_lines(
            visual.centroid,
            GIZMO_LENGTH,
            self.controller.mode(),
        ))
    }

    fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            envelope: self.scene.envelope.as_ref().map(|env| EnvelopeDraw {
                version: env.version,
                mesh: env.mesh.clone(),
                transparent: env.transparent,
            }),
            zones: self
                .scene
                .iter_zones()
                .map(|(id, v)| ZoneDraw {
                    id: id.clone(),
                    version: v.version,
                    mesh: v.mesh.clone(),
                    offset: v.centroid.to_array(),
                    color: v.display_color(),
                })
                .collect(),
        }
    }

    fn render_gl(
        &self,
        ui: &mut Ui,
        rect: egui::Rect,
        state: &AppState,
        gizmo_lines: Option<LineMeshData>,
    ) {
        let Some(gl_renderer) = &self.gl_renderer else {
            // Headless or GL-less environment: skip the paint callback
            return;
        };

        let renderer_clone = gl_renderer.clone();
        let camera = self.camera.clone();
        let snapshot = self.snapshot();

        let grid_settings = state.settings.grid.clone();
        let axes_settings = state.settings.axes.clone();
        let bg_color = state.settings.viewport.background_color;
        let envelope_opacity = state.settings.viewport.envelope_opacity;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer_clone.lock() {
                    r.update_grid(gl, &grid_settings);
                    r.update_axes(gl, &axes_settings);
                    r.sync_scene(gl, &snapshot);
                    r.sync_gizmo(gl, gizmo_lines.as_ref());

                    let render_params = RenderParams {
                        viewport,
                        grid_visible: grid_settings.visible,
                        axes_visible: axes_settings.visible,
                        bg_color,
                        envelope_opacity,
                    };
                    r.paint(gl, &camera, &snapshot, &render_params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);

        if state.settings.axes.show_labels {
            overlays::draw_axis_labels(&painter, rect, &self.camera, state.settings.axes.length);
        }

        overlays::draw_zone_labels(&painter, rect, &self.camera, &self.scene, &state.selection);

        if state.layout.zones().is_empty() {
            overlays::draw_nav_hint(&painter, rect);
        }

        if let Some(status) = &state.transforming_status {
            overlays::draw_drag_status(&painter, rect, status);
        }
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}
