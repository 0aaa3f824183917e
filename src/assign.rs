//! Distribution of particles across words and background.
//!
//! [`AssignmentEngine::assign`] rebuilds every particle's role for a view
//! index. It is a full O(N) pass: membership is cleared first, each section
//! then takes its share of particles from one shared cursor, and whatever is
//! left becomes background.
//!
//! Each section's share is `min(floor(text_fraction * N / 4), |cloud|)`. The
//! cloud is sampled with `stride = max(1, floor(|cloud| / share))`, so a dense
//! word is thinned evenly instead of being truncated.

use crate::config::BackgroundConfig;
use crate::field::ParticleField;
use crate::layout::{slot_for, Slot};
use crate::raster::PointCloud;
use crate::section::{SectionId, SECTION_COUNT};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// What one section received in an assignment pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionAssignment {
    pub section: SectionId,
    pub slot: Slot,
    /// Points available in the section's cloud.
    pub cloud_len: usize,
    /// Particles now forming the word.
    pub assigned: usize,
    /// Sampling stride over the cloud; zero when nothing was assigned.
    pub stride: usize,
}

/// Summary of an assignment pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentReport {
    pub view_index: usize,
    /// Upper bound on particles per section.
    pub per_section: usize,
    pub sections: [SectionAssignment; SECTION_COUNT],
    pub background: usize,
}

impl AssignmentReport {
    /// Particles assigned to `section`.
    pub fn assigned_to(&self, section: SectionId) -> usize {
        self.sections[section.order_index()].assigned
    }

    /// Total particles forming words.
    pub fn text_total(&self) -> usize {
        self.sections.iter().map(|s| s.assigned).sum()
    }
}

/// Places particles onto section point clouds for a given view.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    clouds: [Arc<PointCloud>; SECTION_COUNT],
    text_fraction: f64,
    text_size: f32,
    background: BackgroundConfig,
    seed: u64,
}

impl AssignmentEngine {
    /// `clouds` is indexed by [`SectionId::order_index`].
    pub fn new(
        clouds: [Arc<PointCloud>; SECTION_COUNT],
        text_fraction: f64,
        text_size: f32,
        background: BackgroundConfig,
        seed: u64,
    ) -> Self {
        Self {
            clouds,
            text_fraction,
            text_size,
            background,
            seed,
        }
    }

    /// Point cloud of a section.
    pub fn cloud(&self, section: SectionId) -> &Arc<PointCloud> {
        &self.clouds[section.order_index()]
    }

    /// Upper bound on particles per section for a field of `count`.
    pub fn per_section(&self, count: usize) -> usize {
        (self.text_fraction * count as f64 / SECTION_COUNT as f64).floor() as usize
    }

    /// Rebuild every particle's role for `view_index`.
    ///
    /// Background targets come from a stream seeded by the engine seed and
    /// the view index, so repeating a call reproduces the same layout.
    pub fn assign(&self, field: &mut ParticleField, view_index: usize) -> AssignmentReport {
        let count = field.len();
        let per_section = self.per_section(count);
        let mut rng = SmallRng::seed_from_u64(self.view_seed(view_index));

        field.reset_membership();

        let mut cursor = 0;
        let sections = SectionId::ALL.map(|section| {
            let placement = slot_for(section.order_index(), view_index);
            let cloud = self.cloud(section);
            let needed = per_section.min(cloud.len());
            let stride = if needed == 0 { 0 } else { (cloud.len() / needed).max(1) };

            let base_size = self.text_size * placement.size_factor;
            let color = section.display_color() * placement.opacity_factor;
            let mut assigned = 0;

            for i in 0..needed {
                if cursor >= count {
                    break;
                }
                let point = cloud.points()[(i * stride) % cloud.len()];
                field.set_text_target(cursor, point + placement.position, section, base_size, color);
                cursor += 1;
                assigned += 1;
            }

            SectionAssignment {
                section,
                slot: placement.slot,
                cloud_len: cloud.len(),
                assigned,
                stride,
            }
        });

        let bg = &self.background;
        for index in cursor..count {
            let target = Vec3::new(
                rng.gen_range(-bg.half_extent..bg.half_extent),
                rng.gen_range(-bg.half_extent..bg.half_extent),
                rng.gen_range(bg.depth_far..bg.depth_near),
            );
            let size = rng.gen_range(bg.size_min..bg.size_max);
            field.set_background_target(index, target, size, bg.color);
        }

        field.sync_vertices();

        let report = AssignmentReport {
            view_index,
            per_section,
            sections,
            background: count - cursor,
        };
        log::debug!(
            "Assigned view {}: {} text, {} background ({:?})",
            view_index,
            report.text_total(),
            report.background,
            report.sections.map(|s| s.assigned)
        );
        report
    }

    fn view_seed(&self, view_index: usize) -> u64 {
        self.seed ^ (view_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Particle;

    fn cloud_of(n: usize) -> Arc<PointCloud> {
        Arc::new(PointCloud::new(
            (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
        ))
    }

    fn engine(sizes: [usize; 4]) -> AssignmentEngine {
        AssignmentEngine::new(
            sizes.map(cloud_of),
            0.9,
            0.01,
            BackgroundConfig::default(),
            42,
        )
    }

    fn field(n: usize) -> ParticleField {
        ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05); n])
    }

    #[test]
    fn test_small_cloud_gets_all_points() {
        let engine = engine([30, 500, 500, 500]);
        let mut field = field(1000);
        let report = engine.assign(&mut field, 0);

        // per_section = floor(0.9 * 1000 / 4) = 225
        assert_eq!(report.per_section, 225);
        assert_eq!(report.assigned_to(SectionId::Home), 30);
        assert_eq!(report.sections[0].stride, 1);
        assert_eq!(report.assigned_to(SectionId::Projects), 225);
        assert_eq!(report.sections[1].stride, 2);
        assert_eq!(report.background, 1000 - 30 - 3 * 225);
        assert_eq!(field.count_in(SectionId::Home), 30);
    }

    #[test]
    fn test_strided_sampling_spans_cloud() {
        // per_section = 225, so a 451-point cloud samples every second point.
        let engine = engine([451; 4]);
        let mut field = field(1000);
        let report = engine.assign(&mut field, 3);

        for (s, section) in SectionId::ALL.into_iter().enumerate() {
            let info = report.sections[s];
            assert_eq!(info.stride, 2);
            assert_eq!(info.assigned, 225);

            let offset = slot_for(s, 3).position;
            let cloud = engine.cloud(section);
            let mut previous = None;
            for k in 0..225 {
                let p = field.get(s * 225 + k).unwrap();
                assert_eq!(p.section, Some(section));
                assert_eq!(p.target, cloud.points()[k * info.stride] + offset);

                let index = (p.target - offset).x as usize;
                if let Some(prev) = previous {
                    assert!(index > prev && index - prev <= info.stride);
                }
                previous = Some(index);
            }
        }
    }

    #[test]
    fn test_cloud_under_twice_share_keeps_leading_points() {
        let engine = engine([300, 10, 10, 10]);
        let mut field = field(1000);
        let report = engine.assign(&mut field, 0);

        assert_eq!(report.sections[0].stride, 1);
        assert_eq!(report.assigned_to(SectionId::Home), 225);
        let last = field.get(224).unwrap();
        assert_eq!(last.target, Vec3::new(224.0, 0.0, 2.0));
        assert!(field
            .particles()
            .iter()
            .filter(|p| p.section == Some(SectionId::Home))
            .all(|p| p.target.x < 225.0));
    }

    #[test]
    fn test_shared_cursor_is_contiguous() {
        let engine = engine([10, 20, 30, 40]);
        let mut field = field(1000);
        engine.assign(&mut field, 0);

        let sections: Vec<Option<SectionId>> = field.particles().iter().map(|p| p.section).collect();
        assert!(sections[..10].iter().all(|s| *s == Some(SectionId::Home)));
        assert!(sections[10..30].iter().all(|s| *s == Some(SectionId::Projects)));
        assert!(sections[30..60].iter().all(|s| *s == Some(SectionId::About)));
        assert!(sections[60..100].iter().all(|s| *s == Some(SectionId::Contact)));
        assert!(sections[100..].iter().all(|s| s.is_none()));
    }

    #[test]
    fn test_targets_are_offset_by_slot() {
        let engine = engine([4, 4, 4, 4]);
        let mut field = field(100);
        engine.assign(&mut field, 1);

        // View 1: Projects in front, Home on the left.
        let home = field.get(0).unwrap();
        assert_eq!(home.target, Vec3::new(-20.0, 0.0, -15.0));
        let projects = field.get(4).unwrap();
        assert_eq!(projects.target, Vec3::new(0.0, 0.0, 2.0));
        assert!((projects.base_size - 0.01).abs() < 1e-7);
        assert!((home.base_size - 0.008).abs() < 1e-7);
        assert_eq!(home.color, SectionId::Home.display_color() * 0.6);
    }

    #[test]
    fn test_empty_cloud_contributes_nothing() {
        let engine = engine([0, 50, 0, 50]);
        let mut field = field(1000);
        let report = engine.assign(&mut field, 2);
        assert_eq!(report.assigned_to(SectionId::Home), 0);
        assert_eq!(report.sections[0].stride, 0);
        assert_eq!(report.text_total(), 100);
        assert_eq!(field.background_count(), 900);
    }

    #[test]
    fn test_background_stays_in_volume() {
        let engine = engine([5, 5, 5, 5]);
        let mut field = field(500);
        engine.assign(&mut field, 3);
        for p in field.particles().iter().filter(|p| !p.is_text()) {
            assert!(p.target.x.abs() <= 20.0 && p.target.y.abs() <= 20.0);
            assert!((-15.0..=-5.0).contains(&p.target.z));
            assert!((0.02..0.03).contains(&p.base_size));
            assert_eq!(p.color, Vec3::new(0.3, 0.3, 0.5));
            assert!(!p.interactive);
        }
    }

    #[test]
    fn test_reassign_clears_stale_membership() {
        let engine = engine([5, 5, 5, 5]);
        let mut field = field(50);
        engine.assign(&mut field, 0);

        let smaller = self::engine([5, 5, 5, 0]);
        smaller.assign(&mut field, 0);
        assert_eq!(field.count_in(SectionId::Contact), 0);
        assert_eq!(field.text_count(), 15);
    }

    #[test]
    fn test_assign_is_repeatable() {
        let engine = engine([40, 60, 80, 100]);
        let mut a = field(2000);
        let mut b = field(2000);
        engine.assign(&mut a, 2);
        engine.assign(&mut b, 1);
        engine.assign(&mut b, 2);
        assert_eq!(a.particles(), b.particles());
    }
}
