//! Orbit camera for the habitat viewport.

use glam::{Mat4, Vec3, Vec4};

use super::picking::Ray;

/// Velocity fraction kept per damping step
const DAMPING: f32 = 0.82;
/// Below this angular speed (radians/frame) inertia stops
const REST_EPSILON: f32 = 1e-4;

/// Orbit camera with inertial damping.
///
/// `enabled` gates all navigation input; the viewport clears it for
/// the duration of a gizmo drag so orbiting and object manipulation
/// are mutually exclusive.
#[derive(Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Navigation input accepted when true
    pub enabled: bool,
    yaw_vel: f32,
    pitch_vel: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.785,
            pitch: 0.62,
            distance: 26.0,
            target: Vec3::new(0.0, 4.0, 0.0),
            fov: 45.0_f32.to_radians(),
            enabled: true,
            yaw_vel: 0.0,
            pitch_vel: 0.0,
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let dyaw = dx.to_radians();
        let dpitch = dy.to_radians();
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-1.5, 1.5);
        self.yaw_vel = dyaw;
        self.pitch_vel = dpitch;
    }

    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 200.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    /// Advance orbit inertia one frame. Returns true while still
    /// coasting, so the caller knows to keep repainting.
    pub fn update(&mut self) -> bool {
        if self.yaw_vel.abs() < REST_EPSILON && self.pitch_vel.abs() < REST_EPSILON {
            self.yaw_vel = 0.0;
            self.pitch_vel = 0.0;
            return false;
        }
        self.yaw_vel *= DAMPING;
        self.pitch_vel *= DAMPING;
        self.yaw += self.yaw_vel;
        self.pitch = (self.pitch + self.pitch_vel).clamp(-1.5, 1.5);
        true
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 500.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: [f32; 3], rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point[0], point[1], point[2], 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        let aspect = rect.width() / rect.height();

        // Screen → NDC
        let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

        // Inverse view-projection
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_ndc = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_ndc = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_world = vp_inv * near_ndc;
        let far_world = vp_inv * far_ndc;

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        let direction = (far - near).normalize_or_zero();

        Ray {
            origin: self.eye_position(),
            direction,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_disabled_is_ignored() {
        let mut cam = OrbitCamera::new();
        let yaw = cam.yaw;
        cam.enabled = false;
        cam.rotate(30.0, 10.0);
        assert_eq!(cam.yaw, yaw);
    }

    #[test]
    fn test_damping_comes_to_rest() {
        let mut cam = OrbitCamera::new();
        cam.rotate(10.0, 0.0);
        let mut frames = 0;
        while cam.update() {
            frames += 1;
            assert!(frames < 200, "damping never settled");
        }
        assert!(!cam.update());
    }

    #[test]
    fn test_screen_ray_through_center_hits_target() {
        let cam = OrbitCamera::new();
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0));
        let ray = cam.screen_ray(rect.center(), rect);
        // Ray through the viewport center passes through the look target
        let to_target = (cam.target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }

    #[test]
    fn test_project_roundtrip_center() {
        let cam = OrbitCamera::new();
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0));
        let screen = cam.project(cam.target.to_array(), rect).unwrap();
        assert!((screen.x - rect.center().x).abs() < 1.0);
        assert!((screen.y - rect.center().y).abs() < 1.0);
    }
}
