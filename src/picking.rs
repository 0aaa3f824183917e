//! CPU ray picking against particle positions.
//!
//! A particle is hit when its perpendicular distance to the pick ray is below
//! the threshold. The ray is moved into the field's model space first, so a
//! tilted scene picks what is drawn. Among hits the one whose closest ray
//! point is nearest the ray origin wins; ties keep the lower index.

use crate::camera::Ray;
use crate::field::ParticleField;
use crate::section::SectionId;
use glam::{Mat4, Vec3};

/// A particle under the pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub index: usize,
    pub section: Option<SectionId>,
    /// World-space distance from the ray origin to the closest ray point.
    pub distance: f32,
    /// Distance between the particle and the ray, in model space.
    pub distance_to_ray: f32,
    /// Closest point on the ray, in world space.
    pub point: Vec3,
}

/// Ray-vs-points hit test used for hover.
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    pub threshold: f32,
    pub near: f32,
    pub far: f32,
}

impl Picker {
    pub fn new(threshold: f32, near: f32, far: f32) -> Self {
        Self {
            threshold,
            near,
            far,
        }
    }

    /// Nearest particle within the threshold of `ray`.
    ///
    /// `ray` is in world space; `model` places the field in the world.
    pub fn pick(&self, field: &ParticleField, ray: &Ray, model: Mat4) -> Option<PickHit> {
        let inverse = model.inverse();
        let local_ray = ray.transformed(inverse);

        let (scale, _, _) = model.to_scale_rotation_translation();
        let mean_scale = (scale.x + scale.y + scale.z) / 3.0;
        let local_threshold = self.threshold / mean_scale.max(f32::EPSILON);
        let threshold_sq = local_threshold * local_threshold;

        let mut best: Option<PickHit> = None;
        for (index, particle) in field.particles().iter().enumerate() {
            let distance_sq = local_ray.distance_sq_to_point(particle.position);
            if distance_sq >= threshold_sq {
                continue;
            }

            let point = model.transform_point3(local_ray.closest_point(particle.position));
            let distance = ray.origin.distance(point);
            if distance < self.near || distance > self.far {
                continue;
            }

            if best.map_or(true, |b| distance < b.distance) {
                best = Some(PickHit {
                    index,
                    section: particle.section,
                    distance,
                    distance_to_ray: distance_sq.sqrt(),
                    point,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Particle;

    fn field_at(points: &[Vec3]) -> ParticleField {
        ParticleField::from_particles(points.iter().map(|p| Particle::at(*p, 0.05)).collect())
    }

    fn picker() -> Picker {
        Picker::new(0.9, 0.051, 1000.0)
    }

    #[test]
    fn test_nearest_hit_wins() {
        let field = field_at(&[
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(0.2, 0.0, 2.0),
            Vec3::new(5.0, 0.0, 2.0),
        ]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z);
        let hit = picker().pick(&field, &ray, Mat4::IDENTITY).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 13.0).abs() < 1e-4);
        assert!((hit.distance_to_ray - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_miss_outside_threshold() {
        let field = field_at(&[Vec3::new(1.0, 0.0, 0.0)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z);
        assert!(picker().pick(&field, &ray, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn test_ties_keep_lower_index() {
        let field = field_at(&[Vec3::new(0.3, 0.0, 0.0), Vec3::new(-0.3, 0.0, 0.0)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z);
        assert_eq!(picker().pick(&field, &ray, Mat4::IDENTITY).unwrap().index, 0);
    }

    #[test]
    fn test_model_transform_is_applied() {
        // Drawn at x = 4 after a translation, stored at x = 0.
        let field = field_at(&[Vec3::ZERO]);
        let model = Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(4.0, 0.0, 15.0), Vec3::NEG_Z);
        let hit = picker().pick(&field, &ray, model).unwrap();
        assert_eq!(hit.index, 0);
        assert!((hit.point - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);

        let straight = Ray::new(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z);
        assert!(picker().pick(&field, &straight, model).is_none());
    }

    #[test]
    fn test_points_behind_origin_are_clipped_by_near() {
        let field = field_at(&[Vec3::new(0.0, 0.0, 15.5)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z);
        // Closest ray point is the origin itself, at distance zero.
        assert!(picker().pick(&field, &ray, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn test_hit_reports_section() {
        let mut p = Particle::at(Vec3::ZERO, 0.01);
        p.section = Some(SectionId::About);
        p.interactive = true;
        let field = ParticleField::from_particles(vec![p]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 15.0), Vec3::NEG_Z);
        let hit = picker().pick(&field, &ray, Mat4::IDENTITY).unwrap();
        assert_eq!(hit.section, Some(SectionId::About));
    }
}
