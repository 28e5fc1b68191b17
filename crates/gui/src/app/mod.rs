//! Main application module

mod keyboard;
mod styles;

use eframe::egui;

use crate::scene::SceneEvent;
use crate::state::{AppState, LayoutFile, LayoutState};
use crate::ui::{properties, status_bar, toolbar, zone_list};
use crate::validation::validate_layout;
use crate::viewport::ViewportPanel;

/// Main application
pub struct HabitatApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl HabitatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_layout: Option<LayoutFile>) -> Self {
        let mut state = AppState::default();

        if let Some(layout) = initial_layout {
            state.layout = LayoutState::from_file(layout);
        }

        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
        }
    }

    /// Revalidate zone placement whenever the layout changed
    fn revalidate_if_needed(&mut self) {
        let version = self.state.layout.version();
        if self.state.validated_version != Some(version) {
            self.state.invalid =
                validate_layout(&self.state.layout.envelope, self.state.layout.zones());
            self.state.validated_version = Some(version);
        }
    }

    /// Apply the events the viewport produced this frame
    fn apply_events(&mut self, events: Vec<SceneEvent>) {
        for event in events {
            match event {
                SceneEvent::ZoneSelected(id) => {
                    tracing::debug!(zone = %id, "zone selected");
                }
                SceneEvent::SelectionCleared => {
                    self.state.transforming_status = None;
                }
                SceneEvent::ZoneTransforming(patch) => {
                    // Provisional update so the visual tracks the drag
                    if let Some(zone) = self.state.layout.zone(&patch.id) {
                        let updated = patch.apply_to(zone);
                        self.state.transforming_status = Some(format!(
                            "{}  ({:.1}, {:.1}, {:.1})  {:.1} x {:.1} x {:.1}",
                            updated.name,
                            updated.position_x,
                            updated.position_y,
                            updated.position_z,
                            updated.width,
                            updated.height,
                            updated.depth,
                        ));
                        self.state.layout.apply_update(updated);
                    }
                }
                SceneEvent::ZoneUpdated(zone) => {
                    tracing::info!(zone = %zone.id, "transform committed");
                    self.state.layout.apply_update(zone);
                    self.state.transforming_status = None;
                }
            }
        }
    }
}

impl eframe::App for HabitatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        self.revalidate_if_needed();

        // ── Toolbar ──────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.state);
            });

        // ── Settings window ──────────────────────────────────
        if self.state.show_settings_window {
            self.show_settings_window(ctx);
        }

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Left panel: zone list ────────────────────────────
        if self.state.panels.zone_list {
            egui::SidePanel::left("zone_list")
                .default_width(210.0)
                .width_range(140.0..=400.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    zone_list::show(ui, &mut self.state);
                });
        }

        // ── Right panel: properties ──────────────────────────
        if self.state.panels.properties {
            egui::SidePanel::right("properties")
                .default_width(250.0)
                .width_range(180.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    properties::show(ui, &mut self.state);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        let events = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.viewport.show(ui, &mut self.state))
            .inner;

        self.apply_events(events);
        self.revalidate_if_needed();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.state.settings.save();
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}

impl HabitatApp {
    fn show_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.state.show_settings_window;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                let s = &mut self.state.settings;
                ui.heading("Grid");
                ui.checkbox(&mut s.grid.visible, "Visible");
                ui.add(egui::Slider::new(&mut s.grid.range, 4..=40).text("Range"));
                ui.add(egui::Slider::new(&mut s.grid.opacity, 0.0..=1.0).text("Opacity"));
                ui.separator();
                ui.heading("Axes");
                ui.checkbox(&mut s.axes.visible, "Visible");
                ui.checkbox(&mut s.axes.show_labels, "Labels");
                ui.separator();
                ui.heading("Viewport");
                ui.add(
                    egui::Slider::new(&mut s.viewport.envelope_opacity, 0.05..=0.9)
                        .text("Envelope opacity"),
                );
                ui.separator();
                ui.add(egui::Slider::new(&mut s.ui.font_size, 10.0..=20.0).text("Font size"));
            });
        self.state.show_settings_window = open;
    }
}
