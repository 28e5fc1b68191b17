//! Authoritative habitat layout owned by the host application.
//!
//! The engine never mutates this directly: it reads the list each
//! frame and hands edits back as events, which the host applies here.

use serde::{Deserialize, Serialize};
use shared::{Envelope, Zone, ZoneId, ZoneKind};

/// On-disk layout format for `--layout <file.json>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutFile {
    pub envelope: Envelope,
    pub zones: Vec<Zone>,
}

/// Envelope plus zone list, with a version counter so downstream
/// consumers (validation) can cheaply detect change.
pub struct LayoutState {
    pub envelope: Envelope,
    zones: Vec<Zone>,
    version: u64,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            envelope: Envelope::default(),
            zones: Vec::new(),
            version: 0,
        }
    }
}

impl LayoutState {
    pub fn from_file(file: LayoutFile) -> Self {
        Self {
            envelope: file.envelope,
            zones: file.zones,
            version: 0,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Bumped on every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = envelope;
        self.version += 1;
    }

    /// Add a new zone of the given kind with a fresh id and the kind's
    /// default dimensions. Returns its id.
    ///
    /// New zones are spread on a ring at 60% of the envelope radius,
    /// stepped by the current zone count, so consecutive adds land
    /// apart instead of stacking at the origin. The ring wraps after
    /// five zones.
    pub fn spawn_zone(&mut self, kind: ZoneKind) -> ZoneId {
        let id = uuid::Uuid::new_v4().to_string();
        let n = self.zones.iter().filter(|z| z.kind == kind).count() + 1;
        let angle = self.zones.len() as f64 * (std::f64::consts::TAU / 5.0);
        let ring = self.envelope.radius * 0.6;
        let [width, height, depth] = kind.default_dimensions();
        self.zones.push(Zone {
            id: id.clone(),
            kind,
            name: format!("{} {n}", kind.display_name()),
            width,
            height,
            depth,
            position_x: angle.cos() * ring,
            position_y: 0.0,
            position_z: angle.sin() * ring,
            color_hex: None,
        });
        self.version += 1;
        id
    }

    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
        self.version += 1;
    }

    /// Replace the stored record with a committed update. A stale id is
    /// ignored; the zone was deleted while the edit was in flight.
    pub fn apply_update(&mut self, updated: Zone) {
        if let Some(existing) = self.zones.iter_mut().find(|z| z.id == updated.id) {
            *existing = updated;
            self.version += 1;
        } else {
            tracing::debug!(zone = %updated.id, "dropping update for removed zone");
        }
    }

    pub fn remove_zone(&mut self, id: &str) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.id != id);
        if self.zones.len() != before {
            self.version += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_names_count_per_kind() {
        let mut layout = LayoutState::default();
        layout.spawn_zone(ZoneKind::Laboratory);
        let id = layout.spawn_zone(ZoneKind::Laboratory);
        assert_eq!(layout.zone(&id).unwrap().name, "Laboratory 2");
    }

    #[test]
    fn test_spawn_places_zones_on_a_ring() {
        let mut layout = LayoutState::default();
        let a = layout.spawn_zone(ZoneKind::Habitation);
        let b = layout.spawn_zone(ZoneKind::Habitation);
        let za = layout.zone(&a).unwrap().clone();
        let zb = layout.zone(&b).unwrap().clone();

        // First zone sits on +X at 60% of the envelope radius
        assert!((za.position_x - 3.0).abs() < 1e-9);
        assert!(za.position_z.abs() < 1e-9);
        assert_eq!(za.position_y, 0.0);

        // The ring step keeps consecutive adds from stacking
        let dx = za.position_x - zb.position_x;
        let dz = za.position_z - zb.position_z;
        assert!((dx * dx + dz * dz).sqrt() > za.width.max(zb.width));
    }

    #[test]
    fn test_spawn_uses_kind_default_dimensions() {
        let mut layout = LayoutState::default();
        let id = layout.spawn_zone(ZoneKind::Storage);
        let z = layout.zone(&id).unwrap();
        let [w, h, d] = ZoneKind::Storage.default_dimensions();
        assert_eq!((z.width, z.height, z.depth), (w, h, d));
    }

    #[test]
    fn test_apply_update_ignores_stale_id() {
        let mut layout = LayoutState::default();
        let id = layout.spawn_zone(ZoneKind::Storage);
        let mut z = layout.zone(&id).unwrap().clone();
        layout.remove_zone(&id);
        let version = layout.version();

        z.position_x = 9.0;
        layout.apply_update(z);
        assert_eq!(layout.version(), version);
        assert!(layout.zone(&id).is_none());
    }

    #[test]
    fn test_apply_update_commits() {
        let mut layout = LayoutState::default();
        let id = layout.spawn_zone(ZoneKind::Gym);
        let mut z = layout.zone(&id).unwrap().clone();
        z.width = 7.5;
        layout.apply_update(z);
        assert_eq!(layout.zone(&id).unwrap().width, 7.5);
    }

    #[test]
    fn test_remove_bumps_version_once() {
        let mut layout = LayoutState::default();
        let id = layout.spawn_zone(ZoneKind::Habitation);
        let version = layout.version();
        assert!(layout.remove_zone(&id));
        assert_eq!(layout.version(), version + 1);
        assert!(!layout.remove_zone(&id));
        assert_eq!(layout.version(), version + 1);
    }
}
