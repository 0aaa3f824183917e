//! Perspective camera and pick rays.

use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3};

/// A half-line in world or model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed through `matrix`.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let origin = matrix.transform_point3(self.origin);
        let direction = matrix.transform_vector3(self.direction);
        Self::new(origin, direction)
    }

    /// Closest point on the ray to `point`. Points behind the origin map to the origin.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let t = (point - self.origin).dot(self.direction);
        if t < 0.0 {
            self.origin
        } else {
            self.at(t)
        }
    }

    /// Squared distance from `point` to the ray.
    #[inline]
    pub fn distance_sq_to_point(&self, point: Vec3) -> f32 {
        self.closest_point(point).distance_squared(point)
    }
}

/// Fixed perspective camera on the +z axis looking at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    viewport: (u32, u32),
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
            fov_y: config.fov_y_degrees.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
            viewport: (1, 1),
        };
        camera.set_viewport(config.viewport.0, config.viewport.1);
        camera
    }

    /// Update the viewport and aspect ratio. Zero sizes are clamped to one pixel.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        self.aspect = self.viewport.0 as f32 / self.viewport.1 as f32;
    }

    /// Viewport in physical pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Normalized device coordinates of a pixel position.
    ///
    /// x grows to the right and y grows upward, both in `-1.0..=1.0`.
    pub fn pixel_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let (w, h) = self.viewport;
        Vec2::new(x / w as f32 * 2.0 - 1.0, -(y / h as f32) * 2.0 + 1.0)
    }

    /// World-space ray from the camera through an NDC position.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far_point - self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn test_center_ray_points_down_z() {
        let camera = Camera::default();
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 15.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_project_then_ray_hits_point() {
        let camera = Camera::default();
        let point = Vec3::new(3.0, -2.0, 2.0);
        let clip = camera.view_projection() * point.extend(1.0);
        let ray = camera.ray_from_ndc(clip.xy() / clip.w);
        assert!(ray.distance_sq_to_point(point) < 1e-4);
    }

    #[test]
    fn test_pixel_to_ndc_corners() {
        let mut camera = Camera::default();
        camera.set_viewport(200, 100);
        assert_eq!(camera.pixel_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(camera.pixel_to_ndc(200.0, 100.0), Vec2::new(1.0, -1.0));
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_zero_viewport_is_clamped() {
        let mut camera = Camera::default();
        camera.set_viewport(0, 0);
        assert_eq!(camera.viewport(), (1, 1));
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn test_closest_point_clamps_behind_origin() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.closest_point(Vec3::new(-5.0, 1.0, 0.0)), Vec3::ZERO);
        assert_eq!(ray.closest_point(Vec3::new(4.0, 1.0, 0.0)), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(ray.distance_sq_to_point(Vec3::new(4.0, 1.0, 0.0)), 1.0);
    }
}
