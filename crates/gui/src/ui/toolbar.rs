//! Toolbar actions and UI

use egui::Ui;
use shared::ZoneKind;

use crate::state::AppState;
use crate::viewport::gizmo::GizmoMode;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        // ── Add zone ─────────────────────────────────────────
        ui.menu_button("+ Zone", |ui| {
            for kind in ZoneKind::all() {
                let swatch = color_swatch(kind.default_color_hex());
                if ui
                    .add(egui::Button::new(kind.display_name()).fill(swatch.gamma_multiply(0.25)))
                    .clicked()
                {
                    let id = state.layout.spawn_zone(*kind);
                    state.selection.select(id);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        // ── Transform mode ───────────────────────────────────
        if ui
            .selectable_label(state.transform_mode == GizmoMode::Translate, "Move (G)")
            .clicked()
        {
            state.transform_mode = GizmoMode::Translate;
        }
        if ui
            .selectable_label(state.transform_mode == GizmoMode::Scale, "Scale (S)")
            .clicked()
        {
            state.transform_mode = GizmoMode::Scale;
        }

        ui.separator();

        // ── Envelope transparency ────────────────────────────
        let mut transparent = state.layout.envelope.transparent;
        if ui.checkbox(&mut transparent, "See-through hull").changed() {
            let mut envelope = state.layout.envelope.clone();
            envelope.transparent = transparent;
            state.layout.set_envelope(envelope);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Settings").clicked() {
                state.show_settings_window = !state.show_settings_window;
            }
            ui.toggle_value(&mut state.panels.properties, "Properties");
            ui.toggle_value(&mut state.panels.zone_list, "Zones");
        });
    });
}

pub fn color_swatch(hex: &str) -> egui::Color32 {
    let rgb = habitat_gui_lib::scene::parse_color_hex(hex);
    egui::Color32::from_rgb(
        (rgb[0] * 255.0) as u8,
        (rgb[1] * 255.0) as u8,
        (rgb[2] * 255.0) as u8,
    )
}
