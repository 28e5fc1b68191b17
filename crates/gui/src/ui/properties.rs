//! Properties panel: envelope parameters and the selected-zone editor.
//!
//! Edits mutate copies and commit through the layout, so every change
//! bumps the layout version and triggers revalidation.

use egui::Ui;
use shared::{EnvelopeShape, Zone, ZoneKind};

use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Envelope");
    ui.separator();
    envelope_section(ui, state);

    ui.add_space(10.0);
    ui.heading("Selected zone");
    ui.separator();

    let Some(zone) = state
        .selection
        .selected()
        .and_then(|id| state.layout.zone(id))
        .cloned()
    else {
        ui.weak("Nothing selected");
        return;
    };
    zone_section(ui, state, zone);
}

fn envelope_section(ui: &mut Ui, state: &mut AppState) {
    let mut envelope = state.layout.envelope.clone();
    let mut changed = false;

    egui::ComboBox::from_label("Shape")
        .selected_text(shape_name(envelope.shape))
        .show_ui(ui, |ui| {
            for shape in [EnvelopeShape::Cylinder, EnvelopeShape::Sphere] {
                if ui
                    .selectable_value(&mut envelope.shape, shape, shape_name(shape))
                    .changed()
                {
                    changed = true;
                }
            }
        });

    changed |= drag_value(ui, "Radius", &mut envelope.radius, 0.5..=100.0);
    if envelope.shape == EnvelopeShape::Cylinder {
        changed |= drag_value(ui, "Height", &mut envelope.height, 0.5..=200.0);
    }
    changed |= ui.checkbox(&mut envelope.transparent, "Transparent").changed();

    ui.add_space(4.0);
    ui.weak(format!("Volume: {:.1} m\u{b3}", envelope.volume()));

    if changed {
        state.layout.set_envelope(envelope);
    }
}

fn zone_section(ui: &mut Ui, state: &mut AppState, mut zone: Zone) {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Name");
        changed |= ui.text_edit_singleline(&mut zone.name).changed();
    });

    egui::ComboBox::from_label("Kind")
        .selected_text(zone.kind.display_name())
        .show_ui(ui, |ui| {
            for kind in ZoneKind::all() {
                if ui
                    .selectable_value(&mut zone.kind, *kind, kind.display_name())
                    .changed()
                {
                    changed = true;
                }
            }
        });

    ui.add_space(4.0);
    ui.label("Dimensions");
    changed |= drag_value(ui, "Width", &mut zone.width, 0.1..=50.0);
    changed |= drag_value(ui, "Height", &mut zone.height, 0.1..=50.0);
    changed |= drag_value(ui, "Depth", &mut zone.depth, 0.1..=50.0);

    ui.add_space(4.0);
    ui.label("Position");
    changed |= drag_value(ui, "X", &mut zone.position_x, -100.0..=100.0);
    changed |= drag_value(ui, "Y", &mut zone.position_y, -100.0..=100.0);
    changed |= drag_value(ui, "Z", &mut zone.position_z, -100.0..=100.0);

    ui.add_space(4.0);
    changed |= color_row(ui, &mut zone);

    if changed {
        state.layout.apply_update(zone);
    }
}

fn color_row(ui: &mut Ui, zone: &mut Zone) -> bool {
    // Resolved every frame; the non-logging parse keeps a bad stored
    // value from warning at display rate
    let rgb = habitat_gui_lib::scene::try_parse_color_hex(zone.effective_color_hex())
        .unwrap_or(habitat_gui_lib::scene::FALLBACK_COLOR);
    let mut srgb = [
        (rgb[0] * 255.0) as u8,
        (rgb[1] * 255.0) as u8,
        (rgb[2] * 255.0) as u8,
    ];
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Color");
        if ui.color_edit_button_srgb(&mut srgb).changed() {
            zone.color_hex = Some(format!("#{:02x}{:02x}{:02x}", srgb[0], srgb[1], srgb[2]));
            changed = true;
        }
        if zone.color_hex.is_some() && ui.small_button("Reset").clicked() {
            zone.color_hex = None;
            changed = true;
        }
    });
    changed
}

fn drag_value(
    ui: &mut Ui,
    label: &str,
    value: &mut f64,
    range: std::ops::RangeInclusive<f64>,
) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).speed(0.1).range(range))
            .changed()
    })
    .inner
}

fn shape_name(shape: EnvelopeShape) -> &'static str {
    match shape {
        EnvelopeShape::Cylinder => "Cylinder",
        EnvelopeShape::Sphere => "Sphere",
    }
}
