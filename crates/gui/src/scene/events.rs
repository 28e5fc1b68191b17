//! Events the engine emits back to the owning application.

use shared::{Zone, ZoneId, ZonePatch};

/// Structured notifications produced by picking and drag gestures.
///
/// The host drains these once per frame and applies them to its
/// authoritative layout: `ZoneUpdated` is the only committing event,
/// `ZoneTransforming` is a live preview of an in-flight drag.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// A zone mesh was clicked
    ZoneSelected(ZoneId),
    /// A click landed on empty space (never emitted mid-drag)
    SelectionCleared,
    /// A drag gesture is in flight; partial update, one per input event
    ZoneTransforming(ZonePatch),
    /// A drag gesture finished with actual movement; full merged record
    ZoneUpdated(Zone),
}
