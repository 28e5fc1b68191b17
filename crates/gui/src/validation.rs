//! Geometric layout validation.
//!
//! Runs host-side after every layout change and produces the
//! invalid-id set the scene consumes as a highlight hint. A zone is
//! invalid when it pokes outside the envelope or overlaps another
//! zone; both zones of an overlapping pair are flagged.

use std::collections::HashSet;

use glam::Vec3;
use shared::{Envelope, EnvelopeShape, Zone, ZoneId};

use crate::viewport::picking::Aabb;

/// Collect the ids of all zones violating a placement constraint.
pub fn validate_layout(envelope: &Envelope, zones: &[Zone]) -> HashSet<ZoneId> {
    let mut invalid = HashSet::new();

    let aabbs: Vec<(&ZoneId, Aabb)> = zones.iter().map(|z| (&z.id, zone_aabb(z))).collect();

    for zone in zones {
        if !fits_envelope(envelope, zone) {
            invalid.insert(zone.id.clone());
        }
    }

    for i in 0..aabbs.len() {
        for j in (i + 1)..aabbs.len() {
            if aabbs[i].1.intersects(&aabbs[j].1) {
                invalid.insert(aabbs[i].0.clone());
                invalid.insert(aabbs[j].0.clone());
            }
        }
    }

    invalid
}

fn zone_aabb(zone: &Zone) -> Aabb {
    let dims = Vec3::new(zone.width as f32, zone.height as f32, zone.depth as f32);
    let centroid = Vec3::new(
        zone.position_x as f32,
        (zone.position_y + zone.height * 0.5) as f32,
        zone.position_z as f32,
    );
    Aabb::from_center_size(centroid, dims)
}

/// True when the zone's box lies entirely inside the envelope volume.
fn fits_envelope(envelope: &Envelope, zone: &Zone) -> bool {
    // Radial extent of the box corners from the vertical axis
    let half_w = zone.width * 0.5;
    let half_d = zone.depth * 0.5;
    let corner_x = zone.position_x.abs() + half_w;
    let corner_z = zone.position_z.abs() + half_d;

    match envelope.shape {
        EnvelopeShape::Cylinder => {
            let radial = (corner_x * corner_x + corner_z * corner_z).sqrt();
            radial <= envelope.radius
                && zone.position_y >= 0.0
                && zone.position_y + zone.height <= envelope.height
        }
        EnvelopeShape::Sphere => {
            // Sphere is centered at (0, radius/2, 0); the farthest box
            // corner must stay within the radius.
            let center_y = envelope.radius * 0.5;
            let dy_low = (zone.position_y - center_y).abs();
            let dy_high = (zone.position_y + zone.height - center_y).abs();
            let dy = dy_low.max(dy_high);
            (corner_x * corner_x + dy * dy + corner_z * corner_z).sqrt() <= envelope.radius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ZoneKind;

    fn zone(id: &str, x: f64, w: f64) -> Zone {
        Zone {
            id: id.to_string(),
            kind: ZoneKind::Habitation,
            name: id.to_string(),
            width: w,
            height: 2.0,
            depth: 2.0,
            position_x: x,
            position_y: 0.0,
            position_z: 0.0,
            color_hex: None,
        }
    }

    fn cylinder() -> Envelope {
        Envelope {
            shape: EnvelopeShape::Cylinder,
            radius: 5.0,
            height: 10.0,
            transparent: false,
        }
    }

    #[test]
    fn test_zone_inside_cylinder_is_valid() {
        let invalid = validate_layout(&cylinder(), &[zone("a", 0.0, 2.0)]);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_zone_outside_radius_is_invalid() {
        let invalid = validate_layout(&cylinder(), &[zone("a", 5.0, 2.0)]);
        assert!(invalid.contains("a"));
    }

    #[test]
    fn test_zone_above_height_is_invalid() {
        let mut z = zone("a", 0.0, 2.0);
        z.position_y = 9.5;
        let invalid = validate_layout(&cylinder(), &[z]);
        assert!(invalid.contains("a"));
    }

    #[test]
    fn test_overlap_flags_both_zones() {
        let invalid = validate_layout(&cylinder(), &[zone("a", 0.0, 2.0), zone("b", 1.0, 2.0)]);
        assert!(invalid.contains("a"));
        assert!(invalid.contains("b"));
    }

    #[test]
    fn test_touching_zones_do_not_overlap() {
        // Share a face exactly; no interior volume in common
        let invalid = validate_layout(&cylinder(), &[zone("a", -1.0, 2.0), zone("b", 1.0, 2.0)]);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_sphere_envelope_fit() {
        let env = Envelope {
            shape: EnvelopeShape::Sphere,
            radius: 6.0,
            height: 10.0,
            transparent: false,
        };
        assert!(validate_layout(&env, &[zone("a", 0.0, 2.0)]).is_empty());
        assert!(validate_layout(&env, &[zone("b", 5.5, 2.0)]).contains("b"));
    }
}
