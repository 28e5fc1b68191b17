//! Data model shared between the habitat engine and its host UI.
//!
//! The host owns the authoritative zone list; the engine only ever
//! receives these records as declarative state and hands back full or
//! partial records through events.

use serde::{Deserialize, Serialize};

/// Unique identifier of a functional zone (opaque; the host mints UUIDs)
pub type ZoneId = String;

/// Outer habitat shell shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeShape {
    #[default]
    Cylinder,
    Sphere,
}

/// Outer habitat shell parameters.
///
/// `transparent` is an opacity hint only; changing it never forces a
/// mesh rebuild. Shape and dimensions do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub shape: EnvelopeShape,
    pub radius: f64,
    pub height: f64,
    #[serde(default)]
    pub transparent: bool,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            shape: EnvelopeShape::Cylinder,
            radius: 5.0,
            height: 10.0,
            transparent: false,
        }
    }
}

impl Envelope {
    /// Enclosed volume in cubic meters. For a sphere the height only
    /// affects placement, never the volume.
    pub fn volume(&self) -> f64 {
        use std::f64::consts::PI;
        match self.shape {
            EnvelopeShape::Cylinder => PI * self.radius * self.radius * self.height,
            EnvelopeShape::Sphere => 4.0 / 3.0 * PI * self.radius.powi(3),
        }
    }
}

/// Functional zone category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[default]
    Habitation,
    Laboratory,
    Greenhouse,
    Storage,
    LifeSupport,
    Gym,
}

impl ZoneKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ZoneKind::Habitation => "Habitation",
            ZoneKind::Laboratory => "Laboratory",
            ZoneKind::Greenhouse => "Greenhouse",
            ZoneKind::Storage => "Storage",
            ZoneKind::LifeSupport => "Life support",
            ZoneKind::Gym => "Gym",
        }
    }

    /// Default fill color when a zone carries no explicit `color_hex`
    pub fn default_color_hex(&self) -> &'static str {
        match self {
            ZoneKind::Habitation => "#4f8fd0",
            ZoneKind::Laboratory => "#b06fd0",
            ZoneKind::Greenhouse => "#5fba6a",
            ZoneKind::Storage => "#b0a060",
            ZoneKind::LifeSupport => "#d08050",
            ZoneKind::Gym => "#d05f7a",
        }
    }

    /// Default `[width, height, depth]` for a freshly added zone of
    /// this kind, in meters
    pub fn default_dimensions(&self) -> [f64; 3] {
        match self {
            ZoneKind::Habitation => [2.5, 2.4, 2.5],
            ZoneKind::Laboratory => [2.5, 2.4, 2.0],
            ZoneKind::Greenhouse => [2.0, 2.2, 2.5],
            ZoneKind::Storage => [2.0, 2.0, 2.0],
            ZoneKind::LifeSupport => [2.0, 2.2, 2.0],
            ZoneKind::Gym => [2.5, 2.4, 2.5],
        }
    }

    pub fn all() -> &'static [ZoneKind] {
        &[
            ZoneKind::Habitation,
            ZoneKind::Laboratory,
            ZoneKind::Greenhouse,
            ZoneKind::Storage,
            ZoneKind::LifeSupport,
            ZoneKind::Gym,
        ]
    }
}

/// A rectangular functional sub-volume placed inside the envelope.
///
/// `position_y` is the floor of the box; the rendered mesh centroid
/// sits at `position_y + height / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub kind: ZoneKind,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

impl Zone {
    /// Effective display color (explicit color, or the kind's default)
    pub fn effective_color_hex(&self) -> &str {
        self.color_hex
            .as_deref()
            .unwrap_or_else(|| self.kind.default_color_hex())
    }
}

/// Partial zone update produced while a transform gesture is running.
///
/// Carries only the fields the gesture changed. `ZoneTransforming`
/// events hold one of these for live preview; the final commit merges
/// it into the full record via [`ZonePatch::apply_to`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZonePatch {
    pub id: ZoneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl ZonePatch {
    pub fn new(id: impl Into<ZoneId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.position_x.is_none()
            && self.position_y.is_none()
            && self.position_z.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.depth.is_none()
    }

    /// Merge this patch into a full zone record
    pub fn apply_to(&self, zone: &Zone) -> Zone {
        let mut merged = zone.clone();
        if let Some(x) = self.position_x {
            merged.position_x = x;
        }
        if let Some(y) = self.position_y {
            merged.position_y = y;
        }
        if let Some(z) = self.position_z {
            merged.position_z = z;
        }
        if let Some(w) = self.width {
            merged.width = w;
        }
        if let Some(h) = self.height {
            merged.height = h;
        }
        if let Some(d) = self.depth {
            merged.depth = d;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Zone {
        Zone {
            id: "z1".to_string(),
            kind: ZoneKind::Laboratory,
            name: "Lab".to_string(),
            width: 2.0,
            height: 2.5,
            depth: 3.0,
            position_x: 1.0,
            position_y: 0.0,
            position_z: -1.0,
            color_hex: None,
        }
    }

    #[test]
    fn test_patch_apply_positions() {
        let p = ZonePatch {
            position_x: Some(4.0),
            position_z: Some(5.0),
            ..ZonePatch::new("z1")
        };
        let merged = p.apply_to(&zone());
        assert_eq!(merged.position_x, 4.0);
        assert_eq!(merged.position_y, 0.0);
        assert_eq!(merged.position_z, 5.0);
        assert_eq!(merged.width, 2.0);
    }

    #[test]
    fn test_patch_apply_dimensions() {
        let p = ZonePatch {
            width: Some(3.0),
            height: Some(3.75),
            depth: Some(4.5),
            ..ZonePatch::new("z1")
        };
        let merged = p.apply_to(&zone());
        assert_eq!(merged.width, 3.0);
        assert_eq!(merged.height, 3.75);
        assert_eq!(merged.depth, 4.5);
        assert_eq!(merged.position_x, 1.0);
    }

    #[test]
    fn test_patch_empty() {
        assert!(ZonePatch::new("z1").is_empty());
        let p = ZonePatch {
            width: Some(1.0),
            ..ZonePatch::new("z1")
        };
        assert!(!p.is_empty());
    }

    #[test]
    fn test_effective_color_falls_back_to_kind() {
        let mut z = zone();
        assert_eq!(z.effective_color_hex(), "#b06fd0");
        z.color_hex = Some("#112233".to_string());
        assert_eq!(z.effective_color_hex(), "#112233");
    }

    #[test]
    fn test_zone_roundtrip_json() {
        let z = zone();
        let json = serde_json::to_string(&z).unwrap();
        let back: Zone = serde_json::from_str(&json).unwrap();
        assert_eq!(z, back);
    }

    #[test]
    fn test_envelope_volume() {
        let cylinder = Envelope::default();
        assert!((cylinder.volume() - std::f64::consts::PI * 250.0).abs() < 1e-9);

        let sphere = Envelope {
            shape: EnvelopeShape::Sphere,
            radius: 3.0,
            ..Envelope::default()
        };
        assert!((sphere.volume() - 4.0 / 3.0 * std::f64::consts::PI * 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_shape_tags() {
        let json = serde_json::to_string(&EnvelopeShape::Sphere).unwrap();
        assert_eq!(json, "\"sphere\"");
    }
}
