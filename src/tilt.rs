//! Pointer-driven tilt and idle breathing of the whole particle system.

use glam::{EulerRot, Mat4, Vec2, Vec3};

/// Pointer NDC is scaled by this before it becomes a tilt target.
const POINTER_SENSITIVITY: f32 = 0.5;
/// Radians of tilt per unit of scaled pointer offset.
const TILT_GAIN: f32 = 0.05;
/// Share of the remaining distance covered per reference tick.
const EASING: f32 = 0.05;
const BREATH_FREQUENCY: f32 = 2.0;
const BREATH_AMPLITUDE: f32 = 0.02;

/// Scene rotation that follows the pointer with smoothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneTilt {
    /// Current x and y rotation in radians.
    rotation: Vec2,
    target: Vec2,
    /// Seconds since mount, drives the z breathing.
    time: f32,
}

impl SceneTilt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aim the tilt at a pointer position in NDC.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        let scaled = ndc * POINTER_SENSITIVITY;
        self.target = Vec2::new(-scaled.y * TILT_GAIN, scaled.x * TILT_GAIN);
    }

    /// Ease toward the target once per elapsed reference tick.
    pub fn advance(&mut self, ticks: u32, time: f32) {
        for _ in 0..ticks {
            self.rotation += (self.target - self.rotation) * EASING;
        }
        self.time = time;
    }

    /// Current x, y and z rotation in radians.
    pub fn rotation(&self) -> Vec3 {
        let z = (self.time * BREATH_FREQUENCY).sin() * BREATH_AMPLITUDE;
        self.rotation.extend(z)
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Model matrix applied to every particle when drawing and picking.
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation();
        Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_pointer() {
        let mut tilt = SceneTilt::new();
        tilt.set_pointer(Vec2::new(1.0, 1.0));
        assert!((tilt.target() - Vec2::new(-0.025, 0.025)).length() < 1e-7);
    }

    #[test]
    fn test_eases_five_percent_per_tick() {
        let mut tilt = SceneTilt::new();
        tilt.set_pointer(Vec2::new(1.0, 0.0));
        tilt.advance(1, 0.0);
        assert!((tilt.rotation().y - 0.025 * 0.05).abs() < 1e-7);

        tilt.advance(500, 0.0);
        assert!((tilt.rotation().y - 0.025).abs() < 1e-5);
    }

    #[test]
    fn test_breathing_is_bounded() {
        let mut tilt = SceneTilt::new();
        for step in 0..100 {
            tilt.advance(0, step as f32 * 0.1);
            assert!(tilt.rotation().z.abs() <= 0.02);
        }
    }

    #[test]
    fn test_rest_pose_is_identity() {
        let tilt = SceneTilt::new();
        assert_eq!(tilt.model_matrix(), Mat4::IDENTITY);
    }
}
