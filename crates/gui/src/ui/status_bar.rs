use egui::Ui;

use crate::state::AppState;
use crate::viewport::gizmo::GizmoMode;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.weak(format!("Zones: {}", state.layout.zones().len()));

        ui.separator();

        let invalid = state.invalid.len();
        if invalid > 0 {
            ui.colored_label(
                egui::Color32::from_rgb(240, 80, 80),
                format!("{invalid} invalid"),
            );
            ui.separator();
        }

        let mode = match state.transform_mode {
            GizmoMode::Translate => "Move",
            GizmoMode::Scale => "Scale",
        };
        ui.weak(format!("Mode: {mode}"));

        ui.separator();

        if let Some(status) = &state.transforming_status {
            ui.monospace(status);
        } else if let Some(id) = state.selection.selected() {
            if let Some(zone) = state.layout.zone(id) {
                ui.weak(format!(
                    "{} — {:.1} x {:.1} x {:.1}",
                    zone.name, zone.width, zone.height, zone.depth
                ));
            }
        } else {
            ui.weak("Click a zone to select it");
        }
    });
}
