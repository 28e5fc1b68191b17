//! Transform gizmo: drag-gesture state machine plus the axis-handle
//! geometry and hit testing that back it.
//!
//! The state machine is plain data — no renderer, no input system — so
//! every transition can be unit-tested by calling it directly. The
//! viewport feeds it world-space deltas computed from pointer motion.

use glam::{DVec3, Vec3};
use shared::{Zone, ZoneId, ZonePatch};

use super::camera::OrbitCamera;
use super::mesh::{push_line_vert, LineMeshData, MIN_DIMENSION};
use super::picking::Ray;

/// Process-wide manipulation mode applied to the attached gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Scale,
}

/// Which axis a gizmo handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub fn index(&self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }

    pub fn direction(&self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }
}

/// Baseline captured at drag-begin plus accumulated motion.
///
/// Scale needs the initial dimensions because the gizmo reports a
/// multiplicative factor, not an absolute size.
#[derive(Debug, Clone)]
pub struct DragState {
    pub axis: GizmoAxis,
    /// Zone dimensions when the drag began
    initial_dims: DVec3,
    /// Mesh centroid when the drag began (zone origin + half height on Y)
    initial_center: DVec3,
    /// Accumulated world-space translation
    translation: DVec3,
    /// Accumulated per-axis scale factors (starts at 1)
    scale: DVec3,
    moved: bool,
}

/// Exactly one gesture state at a time
#[derive(Debug, Clone)]
pub enum Gesture {
    Idle,
    Attached { zone_id: ZoneId },
    Dragging { zone_id: ZoneId, drag: DragState },
}

/// Drag-gesture state machine bound to at most one zone.
#[derive(Debug, Default)]
pub struct TransformController {
    mode: GizmoMode,
    gesture: Gesture,
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}

impl TransformController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Switch mode without detaching; the next drag update uses it.
    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    /// Zone the gizmo is currently bound to, if any
    pub fn attached_zone(&self) -> Option<&ZoneId> {
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Attached { zone_id } | Gesture::Dragging { zone_id, .. } => Some(zone_id),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Axis of the drag in flight, if any
    pub fn active_axis(&self) -> Option<GizmoAxis> {
        match &self.gesture {
            Gesture::Dragging { drag, .. } => Some(drag.axis),
            _ => None,
        }
    }

    /// Bind the gizmo to a zone. If a different zone was attached it is
    /// detached first — at most one gizmo is ever active. Returns the
    /// previously attached zone id when one was replaced.
    pub fn attach(&mut self, zone_id: ZoneId) -> Option<ZoneId> {
        if self.attached_zone() == Some(&zone_id) {
            return None;
        }
        let previous = self.attached_zone().cloned();
        self.gesture = Gesture::Attached { zone_id };
        previous
    }

    /// Unbind the gizmo. Safe to call when already idle.
    pub fn detach(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Start a drag on an axis handle. Captures the zone's current
    /// dimensions and centroid as the gesture baseline. The caller is
    /// responsible for disabling camera orbit for the drag's duration.
    pub fn begin_drag(&mut self, axis: GizmoAxis, zone: &Zone) -> bool {
        match &self.gesture {
            Gesture::Attached { zone_id } if *zone_id == zone.id => {}
            _ => return false,
        }
        let dims = DVec3::new(zone.width, zone.height, zone.depth);
        let center = DVec3::new(
            zone.position_x,
            zone.position_y + zone.height * 0.5,
            zone.position_z,
        );
        self.gesture = Gesture::Dragging {
            zone_id: zone.id.clone(),
            drag: DragState {
                axis,
                initial_dims: dims,
                initial_center: center,
                translation: DVec3::ZERO,
                scale: DVec3::ONE,
                moved: false,
            },
        };
        true
    }

    /// Accumulate a world-space translation step. Returns the partial
    /// update for a live-preview event, one per input event.
    pub fn drag_translate(&mut self, world_delta: Vec3) -> Option<ZonePatch> {
        let Gesture::Dragging { drag, .. } = &mut self.gesture else {
            return None;
        };
        let delta = world_delta.as_dvec3();
        if delta != DVec3::ZERO {
            drag.translation += delta;
            drag.moved = true;
        }
        self.current_patch()
    }

    /// Accumulate a world-space extent change along the active axis and
    /// fold it into that axis' scale factor.
    pub fn drag_scale(&mut self, world_delta: f32) -> Option<ZonePatch> {
        let Gesture::Dragging { drag, .. } = &mut self.gesture else {
            return None;
        };
        let i = drag.axis.index();
        let initial = drag.initial_dims[i];
        if initial > 0.0 && world_delta != 0.0 {
            let extent = (initial * drag.scale[i] + world_delta as f64).max(MIN_DIMENSION as f64);
            drag.scale[i] = extent / initial;
            drag.moved = true;
        }
        self.current_patch()
    }

    /// Set the accumulated scale factors directly (all axes).
    pub fn set_scale_factor(&mut self, factor: [f64; 3]) -> Option<ZonePatch> {
        let Gesture::Dragging { drag, .. } = &mut self.gesture else {
            return None;
        };
        drag.scale = DVec3::from_array(factor).max(DVec3::splat(1e-6));
        drag.moved = true;
        self.current_patch()
    }

    /// Partial update for the current mode and accumulated motion
    fn current_patch(&self) -> Option<ZonePatch> {
        let Gesture::Dragging { zone_id, drag } = &self.gesture else {
            return None;
        };
        let mut patch = ZonePatch::new(zone_id.clone());
        match self.mode {
            GizmoMode::Translate => {
                let center = drag.initial_center + drag.translation;
                // Mesh centroid back to zone origin: Y loses the
                // half-height offset.
                patch.position_x = Some(center.x);
                patch.position_y = Some(center.y - drag.initial_dims.y * 0.5);
                patch.position_z = Some(center.z);
            }
            GizmoMode::Scale => {
                let dims = (drag.initial_dims * drag.scale).max(DVec3::splat(MIN_DIMENSION as f64));
                patch.width = Some(dims.x);
                patch.height = Some(dims.y);
                patch.depth = Some(dims.z);
            }
        }
        Some(patch)
    }

    /// Finish the gesture. Returns the full merged zone record when any
    /// movement occurred; the caller commits it and re-enables orbit.
    /// If the zone vanished from the authoritative list mid-gesture the
    /// gesture aborts silently (detach, no record).
    pub fn end_drag(&mut self, zones: &[Zone]) -> Option<Zone> {
        let Gesture::Dragging { zone_id, drag } = &self.gesture else {
            return None;
        };
        let zone_id = zone_id.clone();
        let moved = drag.moved;
        let patch = self.current_patch();

        match zones.iter().find(|z| z.id == zone_id) {
            Some(zone) => {
                let result = if moved {
                    patch.map(|p| p.apply_to(zone))
                } else {
                    None
                };
                self.gesture = Gesture::Attached { zone_id };
                result
            }
            None => {
                self.gesture = Gesture::Idle;
                None
            }
        }
    }

    /// Reconcile against a freshly pushed zone list: a gesture bound to
    /// a zone that no longer exists is silently dropped.
    pub fn sync_with(&mut self, zones: &[Zone]) {
        if let Some(id) = self.attached_zone() {
            if !zones.iter().any(|z| z.id == *id) {
                tracing::debug!("attached zone {id} vanished, dropping gesture");
                self.gesture = Gesture::Idle;
            }
        }
    }
}

// ── Handle hit testing and drag projection ───────────────────

/// Test if a ray hits one of the gizmo axes.
/// Returns the axis if the ray passes within a threshold of an axis line.
pub fn gizmo_hit_test(ray: &Ray, center: Vec3, axis_length: f32) -> Option<GizmoAxis> {
    let axes = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    let threshold = 0.15;
    let mut best: Option<(GizmoAxis, f32)> = None;

    for axis in &axes {
        let line_start = center;
        let line_end = center + axis.direction() * axis_length;

        let dist = ray_line_distance(ray, line_start, line_end);

        if dist < threshold && best.as_ref().is_none_or(|(_, d)| dist < *d) {
            best = Some((*axis, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// Compute the world-space translation delta for a gizmo drag.
/// Projects the screen-space drag delta along the axis direction in screen space.
pub fn compute_drag_delta(
    camera: &OrbitCamera,
    center: Vec3,
    axis: GizmoAxis,
    screen_delta: egui::Vec2,
    rect: egui::Rect,
) -> Vec3 {
    let axis_dir = axis.direction();

    // Project axis direction to screen space
    let p0 = camera.project(center.to_array(), rect);
    let p1 = camera.project((center + axis_dir).to_array(), rect);

    let (Some(screen_p0), Some(screen_p1)) = (p0, p1) else {
        return Vec3::ZERO;
    };

    let screen_axis = egui::vec2(screen_p1.x - screen_p0.x, screen_p1.y - screen_p0.y);
    let screen_axis_len = screen_axis.length();

    if screen_axis_len < 1.0 {
        return Vec3::ZERO;
    }

    let screen_axis_norm = screen_axis / screen_axis_len;

    // Dot product of screen drag delta with screen axis direction
    let projected = screen_delta.dot(screen_axis_norm);

    // Convert back to world units: 1 world unit = screen_axis_len pixels
    let world_delta = projected / screen_axis_len;

    axis_dir * world_delta
}

/// Build gizmo line mesh at the given center point. Translate mode gets
/// arrowhead tips, scale mode gets small box tips.
pub fn build_gizmo_lines(center: Vec3, length: f32, mode: GizmoMode) -> LineMeshData {
    let mut vertices = Vec::new();

    let colors = [
        [0.9_f32, 0.2, 0.2, 1.0],
        [0.2_f32, 0.8, 0.2, 1.0],
        [0.2_f32, 0.3, 0.9, 1.0],
    ];
    let axes = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    for (axis, color) in axes.iter().zip(colors) {
        let dir = axis.direction();
        let tip = center + dir * length;

        push_line(&mut vertices, center, tip, color);

        match mode {
            GizmoMode::Translate => {
                // Two short barbs angled back from the tip
                let side = perpendicular(dir);
                let arrow = length * 0.15;
                push_line(&mut vertices, tip, tip - dir * arrow + side * arrow * 0.5, color);
                push_line(&mut vertices, tip, tip - dir * arrow - side * arrow * 0.5, color);
            }
            GizmoMode::Scale => {
                // Small square outline at the tip
                let half = length * 0.06;
                let u = perpendicular(dir) * half;
                let v = dir.cross(perpendicular(dir)).normalize_or_zero() * half;
                let corners = [tip + u + v, tip - u + v, tip - u - v, tip + u - v];
                for i in 0..4 {
                    push_line(&mut vertices, corners[i], corners[(i + 1) % 4], color);
                }
            }
        }
    }

    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_line(v: &mut Vec<f32>, a: Vec3, b: Vec3, c: [f32; 4]) {
    push_line_vert(v, a.x, a.y, a.z, c);
    push_line_vert(v, b.x, b.y, b.z, c);
}

fn perpendicular(dir: Vec3) -> Vec3 {
    if dir.y.abs() > 0.9 {
        Vec3::X
    } else {
        Vec3::Y
    }
}

/// Minimum distance between a ray and a line segment.
fn ray_line_distance(ray: &Ray, line_start: Vec3, line_end: Vec3) -> f32 {
    let u = ray.direction;
    let v = line_end - line_start;
    let w = ray.origin - line_start;

    let a = u.dot(u); // always >= 0
    let b = u.dot(v);
    let c = v.dot(v); // always >= 0
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;

    let (sc, tc);

    if denom < 1e-7 {
        // Nearly parallel
        sc = 0.0;
        tc = if b > c { d / b } else { e / c };
    } else {
        sc = (b * e - c * d) / denom;
        tc = (a * e - b * d) / denom;
    }

    // Clamp tc to [0,1] (line segment)
    let tc = tc.clamp(0.0, 1.0);
    // Only consider positive ray parameter
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_line = line_start + v * tc;

    (closest_ray - closest_line).length()
}
