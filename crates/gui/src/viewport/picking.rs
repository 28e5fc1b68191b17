//! Ray casting against zone bounding boxes.
//!
//! Picking only ever considers zone meshes; the envelope is not a pick
//! target, so a click "through" the shell still selects the zone under
//! the cursor.

use glam::Vec3;
use shared::ZoneId;

/// A ray in world space
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// AABB of a box with the given centroid and full extents
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// True when the two boxes share interior volume
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the nearest zone whose AABB is intersected by the ray.
/// Nearest intersection distance wins.
pub fn pick_nearest<'a, I>(ray: &Ray, aabbs: I) -> Option<ZoneId>
where
    I: IntoIterator<Item = (&'a ZoneId, &'a Aabb)>,
{
    let mut best: Option<(&ZoneId, f32)> = None;

    for (id, aabb) in aabbs {
        if let Some(dist) = ray_aabb(ray, aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((id, dist));
            }
        }
    }

    best.map(|(id, _)| id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::new(0.0, -1.0, 0.0),
        }
    }

    #[test]
    fn test_ray_hits_box() {
        let aabb = Aabb::from_center_size(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(2.0));
        let dist = ray_aabb(&down_ray(0.0, 0.0), &aabb).unwrap();
        assert!((dist - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_box() {
        let aabb = Aabb::from_center_size(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(2.0));
        assert!(ray_aabb(&down_ray(5.0, 0.0), &aabb).is_none());
    }

    #[test]
    fn test_pick_nearest_prefers_closer() {
        let near = ("near".to_string(), Aabb::from_center_size(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(1.0)));
        let far = ("far".to_string(), Aabb::from_center_size(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(1.0)));
        let ray = down_ray(0.0, 0.0);
        let picked = pick_nearest(&ray, [(&near.0, &near.1), (&far.0, &far.1)]);
        assert_eq!(picked.as_deref(), Some("near"));
    }

    #[test]
    fn test_pick_none_outside_all() {
        let a = ("a".to_string(), Aabb::from_center_size(Vec3::ZERO, Vec3::splat(1.0)));
        assert!(pick_nearest(&down_ray(9.0, 9.0), [(&a.0, &a.1)]).is_none());
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_center_size(Vec3::new(1.5, 0.0, 0.0), Vec3::splat(2.0));
        let c = Aabb::from_center_size(Vec3::new(4.0, 0.0, 0.0), Vec3::splat(2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
