//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;
use crate::viewport::gizmo::GizmoMode;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, delete, translate, scale, focus) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::Delete),
            i.key_pressed(egui::Key::G),
            i.key_pressed(egui::Key::S),
            i.key_pressed(egui::Key::F),
        )
    });

    // Escape — detach gizmo and deselect
    if escape {
        viewport.detach_gizmo();
        state.selection.clear();
        state.transforming_status = None;
    }

    // Delete — remove selected zone
    if delete && !viewport.is_dragging() {
        if let Some(id) = state.selection.selected().cloned() {
            viewport.detach_gizmo();
            state.selection.clear();
            state.layout.remove_zone(&id);
        }
    }

    // G / S — transform mode
    if translate {
        state.transform_mode = GizmoMode::Translate;
    }
    if scale {
        state.transform_mode = GizmoMode::Scale;
    }

    // F — focus camera on selected zone
    if focus {
        if let Some(id) = state.selection.selected() {
            if let Some(center) = viewport.zone_center(id) {
                viewport.focus_on(center);
            }
        }
    }
}
