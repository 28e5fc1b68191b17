//! Viewport overlay drawing (axis labels, zone name labels, hints).
//!
//! Overlays are derived per-frame from the reconciled scene and painted
//! with egui's `Painter`, which never intercepts pointer input, so
//! picking underneath is unaffected. A label exists exactly while its
//! zone's visual does.

use egui::Painter;

use habitat_gui_lib::scene::SceneSet;
use habitat_gui_lib::state::SelectionState;
use habitat_gui_lib::viewport::camera::OrbitCamera;

/// Draw axis labels just beyond the axis arrow tips
pub fn draw_axis_labels(painter: &Painter, rect: egui::Rect, camera: &OrbitCamera, length: f32) {
    let tip = length + 0.1;
    let labels = [
        ([tip, 0.0, 0.0], "X", egui::Color32::from_rgb(220, 70, 70)),
        ([0.0, tip, 0.0], "Y", egui::Color32::from_rgb(70, 200, 70)),
        ([0.0, 0.0, tip], "Z", egui::Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in &labels {
        if let Some(screen) = camera.project(*pos, rect) {
            if rect.contains(screen) {
                painter.text(
                    screen,
                    egui::Align2::LEFT_BOTTOM,
                    *label,
                    egui::FontId::monospace(12.0),
                    *color,
                );
            }
        }
    }
}

/// Draw one name label per zone visual, anchored above its top face
pub fn draw_zone_labels(
    painter: &Painter,
    rect: egui::Rect,
    camera: &OrbitCamera,
    scene: &SceneSet,
    selection: &SelectionState,
) {
    for (id, visual) in scene.iter_zones() {
        let Some(screen) = camera.project(visual.label_anchor().to_array(), rect) else {
            continue;
        };
        if !rect.contains(screen) {
            continue;
        }
        let color = if selection.is_selected(id) {
            egui::Color32::from_rgb(0, 220, 255)
        } else {
            egui::Color32::from_rgb(210, 210, 215)
        };
        let galley_rect = painter.text(
            screen,
            egui::Align2::CENTER_BOTTOM,
            &visual.name,
            egui::FontId::proportional(12.0),
            color,
        );
        painter.rect_filled(
            galley_rect.expand(2.0),
            3.0,
            egui::Color32::from_rgba_premultiplied(0, 0, 0, 90),
        );
        // Repaint text over the backdrop
        painter.text(
            screen,
            egui::Align2::CENTER_BOTTOM,
            &visual.name,
            egui::FontId::proportional(12.0),
            color,
        );
    }
}

/// Hint shown while the layout is empty
pub fn draw_nav_hint(painter: &Painter, rect: egui::Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        "Add a zone to start  |  Middle-drag: orbit  |  Right-drag: pan  |  Scroll: zoom",
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(100, 100, 110),
    );
}

/// Live readout of an in-flight drag
pub fn draw_drag_status(painter: &Painter, rect: egui::Rect, status: &str) {
    let overlay_rect = egui::Rect::from_min_size(
        egui::pos2(rect.left() + 8.0, rect.top() + 8.0),
        egui::vec2(220.0, 22.0),
    );
    painter.rect_filled(
        overlay_rect,
        4.0,
        egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
    );
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        egui::Align2::LEFT_TOP,
        status,
        egui::FontId::monospace(11.0),
        egui::Color32::from_rgb(180, 180, 190),
    );
}
