//! Declarative scene reconciliation.
//!
//! The host pushes its authoritative state (envelope, zone list,
//! invalid-id set) every frame; `SceneSet::reconcile` diffs that
//! against the retained visuals and performs the minimal mutation:
//! geometry is rebuilt only when the dimensions that shaped it change,
//! everything else (position, color, transparency, highlight) is
//! updated in place. A second identical call performs zero rebuilds.

mod events;

pub use events::SceneEvent;

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use shared::{Envelope, EnvelopeShape, Zone, ZoneId};

use crate::viewport::mesh::{envelope_mesh, zone_box, MeshData};
use crate::viewport::picking::{pick_nearest, Aabb, Ray};

/// Tint applied to zones in the invalid set
pub const INVALID_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// Mesh allocation/disposal counters, kept exact so tests can verify
/// that every visual is disposed exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub meshes_built: u64,
    pub meshes_disposed: u64,
}

/// Retained envelope visual plus the parameters its mesh was built from
pub struct EnvelopeVisual {
    shape: EnvelopeShape,
    radius: f64,
    height: f64,
    pub transparent: bool,
    pub mesh: MeshData,
    /// Bumped on every geometry rebuild; the renderer re-uploads on change
    pub version: u64,
}

/// Retained visual for one zone.
///
/// The mesh is built about its own centroid; `centroid` carries the
/// world placement, so moving a zone never touches vertex data.
pub struct ZoneVisual {
    pub name: String,
    dims: Vec3,
    /// Effective hex the current color was resolved from; colors are
    /// reparsed (and bad values logged) only when this changes
    color_hex: String,
    /// Mesh centroid in world space (zone origin + half height on Y)
    pub centroid: Vec3,
    /// Display color resolved from the record's hex or the kind default
    pub color: [f32; 3],
    /// Zone is in the invalid set; the renderer tints it [`INVALID_COLOR`]
    pub highlighted: bool,
    pub mesh: MeshData,
    pub aabb: Aabb,
    pub version: u64,
}

/// Vertical gap between a box's top face and its name label
const LABEL_OFFSET: f32 = 0.5;

impl ZoneVisual {
    /// Color the renderer should actually draw with
    pub fn display_color(&self) -> [f32; 3] {
        if self.highlighted {
            INVALID_COLOR
        } else {
            self.color
        }
    }

    /// World-space point the name label is projected from: a fixed
    /// offset above the top face.
    pub fn label_anchor(&self) -> Vec3 {
        self.centroid + Vec3::new(0.0, self.dims.y * 0.5 + LABEL_OFFSET, 0.0)
    }
}

/// Side table mapping zone ids to their retained visuals.
///
/// Invariant: after every `reconcile`, the table's key set equals the
/// id set of the zone list that was pushed.
#[derive(Default)]
pub struct SceneSet {
    pub envelope: Option<EnvelopeVisual>,
    zones: HashMap<ZoneId, ZoneVisual>,
    /// Zone ids in list order, for deterministic iteration
    order: Vec<ZoneId>,
    stats: ResourceStats,
    next_version: u64,
}

impl SceneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ResourceStats {
        self.stats
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn zone(&self, id: &str) -> Option<&ZoneVisual> {
        self.zones.get(id)
    }

    /// Visuals in list order
    pub fn iter_zones(&self) -> impl Iterator<Item = (&ZoneId, &ZoneVisual)> {
        self.order.iter().filter_map(|id| self.zones.get(id).map(|v| (id, v)))
    }

    /// Pick targets in list order; the envelope never participates.
    pub fn zone_aabbs(&self) -> impl Iterator<Item = (&ZoneId, &Aabb)> {
        self.iter_zones().map(|(id, v)| (id, &v.aabb))
    }

    /// Nearest zone under the ray, if any
    pub fn pick(&self, ray: &Ray) -> Option<ZoneId> {
        pick_nearest(ray, self.zone_aabbs())
    }

    /// Bring the retained visuals in line with the pushed state.
    ///
    /// Never fails: degenerate dimensions are clamped by the mesh
    /// builders and logged here.
    pub fn reconcile(&mut self, envelope: &Envelope, zones: &[Zone], invalid: &HashSet<ZoneId>) {
        self.reconcile_envelope(envelope);
        self.reconcile_zones(zones);

        // Color and highlight pass, always in place
        for zone in zones {
            if let Some(visual) = self.zones.get_mut(&zone.id) {
                let hex = zone.effective_color_hex();
                if visual.color_hex != hex {
                    visual.color = parse_color_hex(hex);
                    visual.color_hex = hex.to_string();
                }
                visual.highlighted = invalid.contains(&zone.id);
            }
        }
    }

    fn reconcile_envelope(&mut self, envelope: &Envelope) {
        let needs_rebuild = match &self.envelope {
            Some(v) => {
                v.shape != envelope.shape
                    || v.radius != envelope.radius
                    || v.height != envelope.height
            }
            None => true,
        };

        if needs_rebuild {
            // Only on rebuild, so a persistently bad record does not
            // warn every frame
            if envelope.radius <= 0.0 || envelope.height <= 0.0 {
                tracing::warn!(
                    radius = envelope.radius,
                    height = envelope.height,
                    "degenerate envelope dimensions, clamping"
                );
            }
            if self.envelope.take().is_some() {
                self.stats.meshes_disposed += 1;
            }
            let mesh = envelope_mesh(envelope.shape, envelope.radius as f32, envelope.height as f32);
            self.stats.meshes_built += 1;
            self.envelope = Some(EnvelopeVisual {
                shape: envelope.shape,
                radius: envelope.radius,
                height: envelope.height,
                transparent: envelope.transparent,
                mesh,
                version: self.bump_version(),
            });
        } else if let Some(v) = &mut self.envelope {
            // Opacity only, never a rebuild
            v.transparent = envelope.transparent;
        }
    }

    fn reconcile_zones(&mut self, zones: &[Zone]) {
        // Removal pass: visuals whose id left the list
        let live: HashSet<&ZoneId> = zones.iter().map(|z| &z.id).collect();
        let stale: Vec<ZoneId> = self
            .zones
            .keys()
            .filter(|id| !live.contains(id))
            .cloned()
            .collect();
        for id in stale {
            if self.zones.remove(&id).is_some() {
                self.stats.meshes_disposed += 1;
                tracing::debug!(zone = %id, "disposed visual for removed zone");
            }
        }

        // Insert / in-place update pass
        for zone in zones {
            let dims = Vec3::new(zone.width as f32, zone.height as f32, zone.depth as f32);
            let centroid = Vec3::new(
                zone.position_x as f32,
                (zone.position_y + zone.height * 0.5) as f32,
                zone.position_z as f32,
            );

            match self.zones.get_mut(&zone.id) {
                Some(visual) => {
                    if visual.dims != dims {
                        // Dimensions shape the mesh: rebuild
                        warn_if_degenerate(zone);
                        self.stats.meshes_disposed += 1;
                        self.stats.meshes_built += 1;
                        visual.mesh = zone_box(Vec3::ZERO, dims.x, dims.y, dims.z);
                        visual.dims = dims;
                        visual.version = self.next_version;
                        self.next_version += 1;
                    }
                    if visual.centroid != centroid {
                        visual.centroid = centroid;
                        visual.aabb = Aabb::from_center_size(centroid, dims);
                    }
                    if visual.name != zone.name {
                        visual.name.clone_from(&zone.name);
                    }
                }
                None => {
                    warn_if_degenerate(zone);
                    let mesh = zone_box(Vec3::ZERO, dims.x, dims.y, dims.z);
                    self.stats.meshes_built += 1;
                    let version = self.bump_version();
                    self.zones.insert(
                        zone.id.clone(),
                        ZoneVisual {
                            name: zone.name.clone(),
                            dims,
                            color_hex: String::new(),
                            centroid,
                            color: [1.0, 1.0, 1.0],
                            highlighted: false,
                            mesh,
                            aabb: Aabb::from_center_size(centroid, dims),
                            version,
                        },
                    );
                }
            }
        }

        self.order = zones.iter().map(|z| z.id.clone()).collect();
    }

    /// Tear the whole side table down, disposing every visual once.
    pub fn clear(&mut self) {
        if self.envelope.take().is_some() {
            self.stats.meshes_disposed += 1;
        }
        self.stats.meshes_disposed += self.zones.len() as u64;
        self.zones.clear();
        self.order.clear();
    }

    fn bump_version(&mut self) -> u64 {
        let v = self.next_version;
        self.next_version += 1;
        v
    }
}

fn warn_if_degenerate(zone: &Zone) {
    if zone.width <= 0.0 || zone.height <= 0.0 || zone.depth <= 0.0 {
        tracing::warn!(zone = %zone.id, "degenerate zone dimensions, clamping");
    }
}

/// Color drawn when a stored hex string cannot be parsed
pub const FALLBACK_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

/// Parse "#rrggbb" into RGB floats
pub fn try_parse_color_hex(hex: &str) -> Option<[f32; 3]> {
    let s = hex.trim().trim_start_matches('#');
    if s.len() != 6 {
        return None;
    }
    let v = u32::from_str_radix(s, 16).ok()?;
    Some([
        ((v >> 16) & 0xff) as f32 / 255.0,
        ((v >> 8) & 0xff) as f32 / 255.0,
        (v & 0xff) as f32 / 255.0,
    ])
}

/// Like [`try_parse_color_hex`] but never fails: an unparsable value
/// logs a warning and falls back to neutral grey. Callers that resolve
/// colors every frame should cache by source string so the warning
/// fires on change, not at display rate.
pub fn parse_color_hex(hex: &str) -> [f32; 3] {
    match try_parse_color_hex(hex) {
        Some(color) => color,
        None => {
            tracing::warn!(color = hex, "unparsable color, using fallback");
            FALLBACK_COLOR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ZoneKind;

    fn envelope() -> Envelope {
        Envelope::default()
    }

    fn zone(id: &str, x: f64) -> Zone {
        Zone {
            id: id.to_string(),
            kind: ZoneKind::Habitation,
            name: format!("Zone {id}"),
            width: 2.0,
            height: 2.0,
            depth: 2.0,
            position_x: x,
            position_y: 0.0,
            position_z: 0.0,
            color_hex: None,
        }
    }

    #[test]
    fn test_reconcile_matches_list() {
        let mut scene = SceneSet::new();
        let zones = vec![zone("a", 0.0), zone("b", 4.0)];
        scene.reconcile(&envelope(), &zones, &HashSet::new());
        assert_eq!(scene.zone_count(), 2);
        assert!(scene.zone("a").is_some());
        assert!(scene.zone("b").is_some());

        // Remove one, add one
        let zones = vec![zone("b", 4.0), zone("c", 8.0)];
        scene.reconcile(&envelope(), &zones, &HashSet::new());
        assert_eq!(scene.zone_count(), 2);
        assert!(scene.zone("a").is_none());
        assert!(scene.zone("c").is_some());
    }

    #[test]
    fn test_idempotent_reconcile_rebuilds_nothing() {
        let mut scene = SceneSet::new();
        let zones = vec![zone("a", 0.0), zone("b", 4.0)];
        scene.reconcile(&envelope(), &zones, &HashSet::new());
        let before = scene.stats();
        scene.reconcile(&envelope(), &zones, &HashSet::new());
        assert_eq!(scene.stats(), before);
    }

    #[test]
    fn test_position_change_is_in_place() {
        let mut scene = SceneSet::new();
        scene.reconcile(&envelope(), &[zone("a", 0.0)], &HashSet::new());
        let built = scene.stats().meshes_built;
        let version = scene.zone("a").unwrap().version;

        scene.reconcile(&envelope(), &[zone("a", 5.0)], &HashSet::new());
        assert_eq!(scene.stats().meshes_built, built);
        assert_eq!(scene.zone("a").unwrap().version, version);
        assert!((scene.zone("a").unwrap().centroid.x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_change_rebuilds_geometry() {
        let mut scene = SceneSet::new();
        scene.reconcile(&envelope(), &[zone("a", 0.0)], &HashSet::new());
        let built = scene.stats().meshes_built;
        let version = scene.zone("a").unwrap().version;

        let mut z = zone("a", 0.0);
        z.width = 6.0;
        scene.reconcile(&envelope(), &[z], &HashSet::new());
        assert_eq!(scene.stats().meshes_built, built + 1);
        assert_eq!(scene.stats().meshes_disposed, 1);
        assert_ne!(scene.zone("a").unwrap().version, version);
    }

    #[test]
    fn test_color_change_never_rebuilds() {
        let mut scene = SceneSet::new();
        scene.reconcile(&envelope(), &[zone("a", 0.0)], &HashSet::new());
        let before = scene.stats();

        let mut z = zone("a", 0.0);
        z.color_hex = Some("#00ff00".to_string());
        scene.reconcile(&envelope(), &[z], &HashSet::new());
        assert_eq!(scene.stats(), before);
        assert_eq!(scene.zone("a").unwrap().color, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_invalid_set_highlights_red() {
        let mut scene = SceneSet::new();
        let invalid: HashSet<ZoneId> = ["a".to_string()].into();
        scene.reconcile(&envelope(), &[zone("a", 0.0), zone("b", 4.0)], &invalid);
        assert_eq!(scene.zone("a").unwrap().display_color(), INVALID_COLOR);
        assert_ne!(scene.zone("b").unwrap().display_color(), INVALID_COLOR);

        // Clearing the set restores the record color
        scene.reconcile(&envelope(), &[zone("a", 0.0), zone("b", 4.0)], &HashSet::new());
        assert_ne!(scene.zone("a").unwrap().display_color(), INVALID_COLOR);
    }

    #[test]
    fn test_envelope_transparency_in_place() {
        let mut scene = SceneSet::new();
        let mut env = envelope();
        scene.reconcile(&env, &[], &HashSet::new());
        let before = scene.stats();

        env.transparent = true;
        scene.reconcile(&env, &[], &HashSet::new());
        assert_eq!(scene.stats(), before);
        assert!(scene.envelope.as_ref().unwrap().transparent);
    }

    #[test]
    fn test_envelope_shape_change_rebuilds() {
        let mut scene = SceneSet::new();
        let mut env = envelope();
        scene.reconcile(&env, &[], &HashSet::new());
        let version = scene.envelope.as_ref().unwrap().version;

        env.shape = EnvelopeShape::Sphere;
        scene.reconcile(&env, &[], &HashSet::new());
        assert_ne!(scene.envelope.as_ref().unwrap().version, version);
        assert_eq!(scene.stats().meshes_disposed, 1);
    }

    #[test]
    fn test_clear_disposes_everything_once() {
        let mut scene = SceneSet::new();
        scene.reconcile(&envelope(), &[zone("a", 0.0), zone("b", 4.0)], &HashSet::new());
        scene.clear();
        let stats = scene.stats();
        // envelope + 2 zones
        assert_eq!(stats.meshes_built, 3);
        assert_eq!(stats.meshes_disposed, 3);
        assert_eq!(scene.zone_count(), 0);
        assert!(scene.envelope.is_none());

        // Idempotent
        scene.clear();
        assert_eq!(scene.stats().meshes_disposed, 3);
    }

    #[test]
    fn test_pick_through_scene() {
        let mut scene = SceneSet::new();
        scene.reconcile(&envelope(), &[zone("a", 0.0)], &HashSet::new());
        let ray = Ray {
            origin: Vec3::new(0.0, 10.0, 0.0),
            direction: Vec3::NEG_Y,
        };
        assert_eq!(scene.pick(&ray).as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_color_fallback() {
        assert_eq!(parse_color_hex("#ff0000"), [1.0, 0.0, 0.0]);
        assert_eq!(parse_color_hex("not-a-color"), FALLBACK_COLOR);
        assert_eq!(try_parse_color_hex("not-a-color"), None);
    }

    #[test]
    fn test_label_anchor_sits_above_top_face() {
        let mut scene = SceneSet::new();
        scene.reconcile(&envelope(), &[zone("a", 3.0)], &HashSet::new());
        let anchor = scene.zone("a").unwrap().label_anchor();
        // Floor at 0, height 2: top face at y=2, label offset above it
        assert!((anchor.y - (2.0 + LABEL_OFFSET)).abs() < 1e-6);
        assert!((anchor.x - 3.0).abs() < 1e-6);
        assert!(anchor.z.abs() < 1e-6);
    }

    /// Counts warn-level events by counting writer handouts.
    struct WarnCounter(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for WarnCounter {
        type Writer = std::io::Sink;

        fn make_writer(&'a self) -> Self::Writer {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            std::io::sink()
        }
    }

    fn count_warns(body: impl FnOnce()) -> usize {
        let hits = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(WarnCounter(hits.clone()))
            .finish();
        tracing::subscriber::with_default(subscriber, body);
        hits.load(std::sync::atomic::Ordering::SeqCst)
    }

    #[test]
    fn test_degenerate_dimensions_warn_once_not_per_frame() {
        let warns = count_warns(|| {
            let mut scene = SceneSet::new();
            let mut z = zone("a", 0.0);
            z.width = 0.0;
            for _ in 0..5 {
                scene.reconcile(&envelope(), &[z.clone()], &HashSet::new());
            }
        });
        assert_eq!(warns, 1);
    }

    #[test]
    fn test_unparsable_color_warns_once_not_per_frame() {
        let warns = count_warns(|| {
            let mut scene = SceneSet::new();
            let mut z = zone("a", 0.0);
            z.color_hex = Some("not-a-color".to_string());
            for _ in 0..5 {
                scene.reconcile(&envelope(), &[z.clone()], &HashSet::new());
            }
        });
        assert_eq!(warns, 1);
        // Fixing the record reparses and clears the fallback
        let mut scene = SceneSet::new();
        let mut z = zone("a", 0.0);
        z.color_hex = Some("not-a-color".to_string());
        scene.reconcile(&envelope(), &[z.clone()], &HashSet::new());
        assert_eq!(scene.zone("a").unwrap().color, FALLBACK_COLOR);
        z.color_hex = Some("#00ff00".to_string());
        scene.reconcile(&envelope(), &[z], &HashSet::new());
        assert_eq!(scene.zone("a").unwrap().color, [0.0, 1.0, 0.0]);
    }
}
