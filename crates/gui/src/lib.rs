// Library crate: all headless-testable engine logic (reconciliation,
// picking, gesture state machine, camera math, validation, harness).
// GUI-specific modules (app, ui panels, GL rendering) live in the
// binary crate.

pub mod fixtures;
pub mod harness;
pub mod scene;
pub mod state;
pub mod validation;

/// Viewport logic that needs no GL context (camera, picking, gizmo
/// state machine, mesh builders). The renderer and panel stay in the
/// binary crate.
pub mod viewport {
    pub mod camera;
    pub mod gizmo;
    pub mod mesh;
    pub mod picking;
}
