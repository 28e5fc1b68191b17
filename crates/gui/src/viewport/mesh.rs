//! CPU-side mesh construction for the envelope, zones, grid and axes.
//!
//! Builders are pure: they allocate vertex data and nothing else.
//! Display color is applied as a per-object tint uniform at draw time,
//! so solid meshes are built with white vertices and a color change
//! never touches a vertex buffer.

use glam::Vec3;
use shared::EnvelopeShape;

/// Smallest dimension a degenerate input is clamped to. Keeps the
/// render loop renderable instead of failing on bad declarative state.
pub const MIN_DIMENSION: f32 = 1e-3;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Box mesh for a functional zone, centered on `center` (the mesh
/// centroid, not the zone floor). Degenerate extents are clamped.
pub fn zone_box(center: Vec3, w: f32, h: f32, d: f32) -> MeshData {
    let hw = w.max(MIN_DIMENSION) * 0.5;
    let hh = h.max(MIN_DIMENSION) * 0.5;
    let hd = d.max(MIN_DIMENSION) * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * 9);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / 9) as u32;
        for v in quad {
            let p = *v + center;
            push_vert(&mut vertices, p.x, p.y, p.z, *normal, WHITE);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// Habitat envelope mesh, resting on the floor plane.
///
/// The cylinder is centered at y = height/2; the sphere at y = radius/2
/// (height only affects vertical placement, never sphere geometry).
pub fn envelope_mesh(shape: EnvelopeShape, radius: f32, height: f32) -> MeshData {
    let radius = radius.max(MIN_DIMENSION);
    let height = height.max(MIN_DIMENSION);
    match shape {
        EnvelopeShape::Cylinder => {
            cylinder(Vec3::new(0.0, height * 0.5, 0.0), radius, height, 32)
        }
        EnvelopeShape::Sphere => sphere(Vec3::new(0.0, radius * 0.5, 0.0), radius, 24, 32),
    }
}

fn cylinder(center: Vec3, radius: f32, height: f32, segments: u32) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side faces
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let c0 = a0.cos();
        let s0 = a0.sin();
        let c1 = a1.cos();
        let s1 = a1.sin();

        let n0 = Vec3::new(c0, 0.0, s0);
        let n1 = Vec3::new(c1, 0.0, s1);

        let base = (vertices.len() / 9) as u32;

        push_vert_at(&mut vertices, center + Vec3::new(radius * c0, -hh, radius * s0), n0);
        push_vert_at(&mut vertices, center + Vec3::new(radius * c1, -hh, radius * s1), n1);
        push_vert_at(&mut vertices, center + Vec3::new(radius * c1, hh, radius * s1), n1);
        push_vert_at(&mut vertices, center + Vec3::new(radius * c0, hh, radius * s0), n0);

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    // Top cap
    add_cap(&mut vertices, &mut indices, center, radius, hh, segments, Vec3::Y, false);
    // Bottom cap
    add_cap(&mut vertices, &mut indices, center, radius, -hh, segments, Vec3::NEG_Y, true);

    MeshData { vertices, indices }
}

fn sphere(center: Vec3, radius: f32, rings: u32, sectors: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let sp = phi.sin();
        let cp = phi.cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let st = theta.sin();
            let ct = theta.cos();

            let n = Vec3::new(sp * ct, cp, sp * st);
            push_vert_at(&mut vertices, center + n * radius, n);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    MeshData { vertices, indices }
}

// ── Grid and axes ────────────────────────────────────────────

pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let origin_color_x = [0.5_f32, 0.2, 0.2, opacity * 0.7];
    let origin_color_z = [0.2_f32, 0.2, 0.5, opacity * 0.7];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 { origin_color_z } else { grid_color };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.0, -extent, color);
        push_line_vert(&mut vertices, f, 0.0, extent, color);

        let color = if i == 0 { origin_color_x } else { grid_color };
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.0, f, color);
        push_line_vert(&mut vertices, extent, 0.0, f, color);
    }

    LineMeshData { vertices }
}

pub fn axes(length: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];

    // X axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, r);
    push_line_vert(&mut vertices, length, 0.0, 0.0, r);
    // Y axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, g);
    push_line_vert(&mut vertices, 0.0, length, 0.0, g);
    // Z axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, b);
    push_line_vert(&mut vertices, 0.0, 0.0, length, b);

    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_vert_at(v: &mut Vec<f32>, p: Vec3, n: Vec3) {
    push_vert(v, p.x, p.y, p.z, n, WHITE);
}

pub(crate) fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    center: Vec3,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    reversed: bool,
) {
    let center_idx = (vertices.len() / 9) as u32;
    push_vert_at(vertices, center + Vec3::new(0.0, y, 0.0), normal);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert_at(
            vertices,
            center + Vec3::new(radius * angle.cos(), y, radius * angle.sin()),
            normal,
        );
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        if reversed {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + next, center_idx + 1 + i]);
        } else {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + i, center_idx + 1 + next]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_box_counts() {
        let m = zone_box(Vec3::ZERO, 2.0, 1.0, 3.0);
        assert_eq!(m.vertex_count(), 24);
        assert_eq!(m.triangle_count(), 12);
    }

    #[test]
    fn test_zone_box_centered() {
        let m = zone_box(Vec3::new(1.0, 2.0, 3.0), 2.0, 4.0, 6.0);
        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for i in 0..m.vertex_count() {
            let y = m.vertices[i * 9 + 1];
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        assert!((min_y - 0.0).abs() < 1e-5);
        assert!((max_y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_dims_clamped() {
        let m = zone_box(Vec3::ZERO, 0.0, -1.0, 2.0);
        // Still a renderable box, just vanishingly thin
        assert_eq!(m.triangle_count(), 12);
        for i in 0..m.vertex_count() {
            assert!(m.vertices[i * 9].abs() <= MIN_DIMENSION);
        }
    }

    #[test]
    fn test_envelope_cylinder_rests_on_floor() {
        let m = envelope_mesh(EnvelopeShape::Cylinder, 5.0, 10.0);
        let min_y = (0..m.vertex_count())
            .map(|i| m.vertices[i * 9 + 1])
            .fold(f32::MAX, f32::min);
        assert!((min_y - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_envelope_sphere_ignores_height() {
        let a = envelope_mesh(EnvelopeShape::Sphere, 4.0, 10.0);
        let b = envelope_mesh(EnvelopeShape::Sphere, 4.0, 50.0);
        assert_eq!(a.vertices, b.vertices);
    }
}
