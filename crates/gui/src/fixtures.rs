//! Factory functions for creating test data.

use shared::{Envelope, EnvelopeShape, Zone, ZoneKind};

/// Create a zone with the given floor position and dimensions.
pub fn zone_at(id: &str, pos: [f64; 3], dims: [f64; 3]) -> Zone {
    Zone {
        id: id.to_string(),
        kind: ZoneKind::Habitation,
        name: format!("Zone {id}"),
        width: dims[0],
        height: dims[1],
        depth: dims[2],
        position_x: pos[0],
        position_y: pos[1],
        position_z: pos[2],
        color_hex: None,
    }
}

/// Create a 2x2x2 zone resting on the floor at (x, 0, z).
pub fn unit_zone(id: &str, x: f64, z: f64) -> Zone {
    zone_at(id, [x, 0.0, z], [2.0, 2.0, 2.0])
}

/// Create a zone of a specific kind (name and default color follow).
pub fn kind_zone(id: &str, kind: ZoneKind, x: f64, z: f64) -> Zone {
    Zone {
        kind,
        name: kind.display_name().to_string(),
        ..zone_at(id, [x, 0.0, z], [2.0, 2.0, 2.0])
    }
}

/// Default cylinder envelope, opaque.
pub fn cylinder_envelope(radius: f64, height: f64) -> Envelope {
    Envelope {
        shape: EnvelopeShape::Cylinder,
        radius,
        height,
        transparent: false,
    }
}

/// Sphere envelope, opaque.
pub fn sphere_envelope(radius: f64) -> Envelope {
    Envelope {
        shape: EnvelopeShape::Sphere,
        radius,
        height: radius,
        transparent: false,
    }
}
