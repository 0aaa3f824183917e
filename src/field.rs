//! The particle store.
//!
//! [`ParticleField`] owns every particle and the matching render vertices.
//! Assignment and simulation mutate it only through the methods here; the
//! particle count never changes while the field is alive.
//!
//! # Render layout
//!
//! [`ParticleVertex`] is a 32-byte `Pod` struct, so the whole vertex array can
//! be uploaded with a single `bytemuck::cast_slice`:
//!
//! | offset | field    | format      |
//! |--------|----------|-------------|
//! | 0      | position | `vec3<f32>` |
//! | 12     | size     | `f32`       |
//! | 16     | color    | `vec3<f32>` |
//! | 28     | padding  | `f32`       |

use crate::section::SectionId;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// One simulated body.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Where the spring pulls this particle.
    pub target: Vec3,
    /// Scatter position from when the field was created.
    pub original_position: Vec3,
    /// Word this particle belongs to, if any.
    pub section: Option<SectionId>,
    /// Always equal to `section.is_some()`.
    pub interactive: bool,
    pub size: f32,
    pub base_size: f32,
    pub color: Vec3,
}

impl Particle {
    /// A resting background particle at `position`.
    pub fn at(position: Vec3, size: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            target: Vec3::ZERO,
            original_position: position,
            section: None,
            interactive: false,
            size,
            base_size: size,
            color: Vec3::ONE,
        }
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.section.is_some()
    }
}

/// GPU-ready per-particle vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl From<&Particle> for ParticleVertex {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            size: p.size,
            color: p.color.to_array(),
            _pad: 0.0,
        }
    }
}

/// Owned store of all particle state.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    vertices: Vec<ParticleVertex>,
}

impl ParticleField {
    /// Scatter `count` particles uniformly in a cube of edge `spread`.
    ///
    /// Sizes are drawn from `0.02..0.08` so the unformed swarm has depth.
    pub fn scattered<R: Rng + ?Sized>(count: usize, spread: f32, rng: &mut R) -> Self {
        let half = spread * 0.5;
        let particles = (0..count)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                );
                let size = rng.gen_range(0.02..0.08);
                Particle::at(position, size)
            })
            .collect();
        Self::from_particles(particles)
    }

    /// Build a field from explicit particles.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let mut field = Self {
            particles,
            vertices: Vec::new(),
        };
        field.sync_vertices();
        field
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for the integrator.
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    // ========== Membership ==========

    /// Detach every particle from its word.
    pub fn reset_membership(&mut self) {
        for p in &mut self.particles {
            p.section = None;
            p.interactive = false;
        }
    }

    /// Make particle `index` part of `section`'s word, pulled toward `target`.
    pub fn set_text_target(
        &mut self,
        index: usize,
        target: Vec3,
        section: SectionId,
        base_size: f32,
        color: Vec3,
    ) {
        if let Some(p) = self.particles.get_mut(index) {
            p.target = target;
            p.section = Some(section);
            p.interactive = true;
            p.base_size = base_size;
            p.size = base_size;
            p.color = color;
        }
    }

    /// Make particle `index` a background particle drifting toward `target`.
    pub fn set_background_target(&mut self, index: usize, target: Vec3, base_size: f32, color: Vec3) {
        if let Some(p) = self.particles.get_mut(index) {
            p.target = target;
            p.section = None;
            p.interactive = false;
            p.base_size = base_size;
            p.size = base_size;
            p.color = color;
        }
    }

    /// Add a random kick in `-strength/2..strength/2` on every axis of every particle.
    pub fn apply_impulse<R: Rng + ?Sized>(&mut self, strength: f32, rng: &mut R) {
        for p in &mut self.particles {
            p.velocity += Vec3::new(
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
            ) * strength;
        }
    }

    // ========== Queries ==========

    /// Number of particles currently forming a word.
    pub fn text_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_text()).count()
    }

    pub fn background_count(&self) -> usize {
        self.len() - self.text_count()
    }

    /// Number of particles forming `section`'s word.
    pub fn count_in(&self, section: SectionId) -> usize {
        self.particles
            .iter()
            .filter(|p| p.section == Some(section))
            .count()
    }

    // ========== Render buffers ==========

    /// Copy positions, sizes and colors into the vertex array.
    pub fn sync_vertices(&mut self) {
        self.vertices.clear();
        self.vertices.extend(self.particles.iter().map(ParticleVertex::from));
    }

    /// Vertices as of the last [`sync_vertices`](Self::sync_vertices).
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// Vertex array as raw bytes for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Drop all particle and vertex storage.
    pub fn release(&mut self) {
        self.particles = Vec::new();
        self.vertices = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 32);
        assert_eq!(std::mem::align_of::<ParticleVertex>(), 4);
    }

    #[test]
    fn test_scattered_field() {
        let mut rng = SmallRng::seed_from_u64(3);
        let field = ParticleField::scattered(1000, 30.0, &mut rng);
        assert_eq!(field.len(), 1000);
        assert_eq!(field.vertices().len(), 1000);
        assert_eq!(field.vertex_bytes().len(), 1000 * 32);
        assert_eq!(field.text_count(), 0);
        for p in field.particles() {
            assert!(p.position.abs().max_element() <= 15.0);
            assert_eq!(p.position, p.original_position);
            assert!((0.02..0.08).contains(&p.size));
        }
    }

    #[test]
    fn test_membership_round_trip() {
        let mut field = ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05); 4]);
        field.set_text_target(1, Vec3::X, SectionId::About, 0.01, Vec3::ONE);
        field.set_text_target(2, Vec3::Y, SectionId::About, 0.01, Vec3::ONE);

        assert_eq!(field.count_in(SectionId::About), 2);
        assert_eq!(field.background_count(), 2);
        assert!(field.get(1).unwrap().interactive);

        field.reset_membership();
        assert_eq!(field.text_count(), 0);
        assert!(field.particles().iter().all(|p| !p.interactive));
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut field = ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05)]);
        field.set_text_target(5, Vec3::X, SectionId::Home, 0.01, Vec3::ONE);
        assert_eq!(field.text_count(), 0);
    }

    #[test]
    fn test_impulse_is_bounded() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut field = ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05); 100]);
        field.apply_impulse(0.3, &mut rng);
        assert!(field.particles().iter().all(|p| p.velocity.abs().max_element() <= 0.15));
        assert!(field.particles().iter().any(|p| p.velocity != Vec3::ZERO));
    }

    #[test]
    fn test_vertices_follow_sync() {
        let mut field = ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05)]);
        field.particles_mut()[0].position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(field.vertices()[0].position, [0.0, 0.0, 0.0]);
        field.sync_vertices();
        assert_eq!(field.vertices()[0].position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut field = ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05); 3]);
        field.release();
        field.release();
        assert!(field.is_empty());
        assert!(field.vertex_bytes().is_empty());
    }
}
