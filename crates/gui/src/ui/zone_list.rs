//! Zone list panel

use egui::Ui;

use crate::state::AppState;
use crate::ui::toolbar::color_swatch;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Zones");
    ui.separator();

    if state.layout.zones().is_empty() {
        ui.weak("No zones yet. Use + Zone to add one.");
        return;
    }

    let mut clicked: Option<String> = None;
    let mut removed: Option<String> = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for zone in state.layout.zones() {
            let selected = state.selection.is_selected(&zone.id);
            let invalid = state.invalid.contains(&zone.id);

            ui.horizontal(|ui| {
                let (swatch_rect, _) =
                    ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().rect_filled(
                    swatch_rect,
                    2.0,
                    color_swatch(zone.effective_color_hex()),
                );

                let mut text = egui::RichText::new(&zone.name);
                if invalid {
                    text = text.color(egui::Color32::from_rgb(240, 80, 80));
                }
                if ui.selectable_label(selected, text).clicked() {
                    clicked = Some(zone.id.clone());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("x").clicked() {
                        removed = Some(zone.id.clone());
                    }
                    if invalid {
                        ui.weak("!");
                    }
                });
            });
        }
    });

    if let Some(id) = clicked {
        state.selection.select(id);
    }
    if let Some(id) = removed {
        if state.selection.is_selected(&id) {
            state.selection.clear();
        }
        state.layout.remove_zone(&id);
    }
}
