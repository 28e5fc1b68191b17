pub mod layout;
pub mod selection;
pub mod settings;

use std::collections::HashSet;

pub use layout::{LayoutFile, LayoutState};
pub use selection::SelectionState;
pub use settings::AppSettings;
use shared::ZoneId;

use crate::viewport::gizmo::GizmoMode;

/// Panel visibility flags
pub struct PanelVisibility {
    pub zone_list: bool,
    pub properties: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            zone_list: true,
            properties: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    /// Authoritative envelope + zone list
    pub layout: LayoutState,
    pub selection: SelectionState,
    /// Zones failing geometric validation (rendering hint only)
    pub invalid: HashSet<ZoneId>,
    /// Process-wide gizmo mode
    pub transform_mode: GizmoMode,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
    /// Layout version the invalid set was last computed for
    pub validated_version: Option<u64>,
    /// Live drag readout for the status bar
    pub transforming_status: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            layout: LayoutState::default(),
            selection: SelectionState::default(),
            invalid: HashSet::new(),
            transform_mode: GizmoMode::default(),
            panels: PanelVisibility::default(),
            settings: AppSettings::load(),
            show_settings_window: false,
            validated_version: None,
            transforming_status: None,
        }
    }
}
