mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::scene`, `crate::state`,
// etc. resolve to the lib crate types everywhere in the binary.
pub use habitat_gui_lib::scene;
pub use habitat_gui_lib::state;
pub use habitat_gui_lib::validation;

use app::HabitatApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitat_gui=info".into()),
        )
        .init();

    // Parse --layout <path> argument
    let initial_layout = parse_layout_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Habitat Studio — Zone Designer")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "habitat-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(HabitatApp::new(cc, initial_layout)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_layout_arg() -> Option<state::LayoutFile> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--layout" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<state::LayoutFile>(&json) {
                    Ok(layout) => {
                        tracing::info!("Loaded layout from {path} ({} zones)", layout.zones.len());
                        return Some(layout);
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse layout JSON from {path}: {e}");
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read layout file {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
