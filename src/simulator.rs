//! Spring-damper integration of the particle field.
//!
//! Every reference tick, each particle is pulled toward its target:
//!
//! - beyond `sqrt(far_distance_sq)` the pull points straight at the target
//!   with magnitude `min(max_force, stiffness * distance)`, so a far target
//!   can never launch a particle;
//! - closer in, the pull is proportional: `displacement * stiffness * near_gain`.
//!
//! Velocity is then damped, background particles occasionally receive a tiny
//! random nudge, and position integrates velocity. Text particles use the
//! stiffer spring so words snap into shape while the background drifts.

use crate::config::SpringParams;
use crate::field::{Particle, ParticleField};
use crate::time::FixedStep;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Advances a [`ParticleField`] in fixed reference ticks.
#[derive(Debug, Clone)]
pub struct Simulator {
    params: SpringParams,
    stepper: FixedStep,
    rng: SmallRng,
}

impl Simulator {
    pub fn new(params: SpringParams, seed: u64) -> Self {
        let stepper = FixedStep::new(params.tick_rate, params.max_substeps);
        Self {
            params,
            stepper,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Advance the field by `dt` seconds of frame time.
    ///
    /// Runs as many reference ticks as are due and returns that count. The
    /// render vertices are refreshed once afterwards.
    pub fn step(&mut self, field: &mut ParticleField, dt: f32) -> u32 {
        let ticks = self.stepper.advance(dt);
        for _ in 0..ticks {
            self.integrate(field);
        }
        if ticks > 0 {
            field.sync_vertices();
        }
        ticks
    }

    /// Run exactly one reference tick and refresh the vertices.
    pub fn tick(&mut self, field: &mut ParticleField) {
        self.integrate(field);
        field.sync_vertices();
    }

    fn integrate(&mut self, field: &mut ParticleField) {
        let params = &self.params;
        let rng = &mut self.rng;
        for p in field.particles_mut() {
            let jitter = if !p.interactive && rng.gen_bool(params.jitter_probability) {
                Some(Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                ) * params.jitter_amplitude)
            } else {
                None
            };
            integrate_particle(p, params, jitter);
        }
    }
}

/// One tick of spring-damper motion for a single particle.
#[inline]
pub fn integrate_particle(p: &mut Particle, params: &SpringParams, jitter: Option<Vec3>) {
    let (stiffness, damping) = if p.interactive {
        (params.text_stiffness, params.text_damping)
    } else {
        (params.background_stiffness, params.background_damping)
    };

    let displacement = p.target - p.position;
    let distance_sq = displacement.length_squared();

    if distance_sq > params.far_distance_sq {
        let distance = distance_sq.sqrt();
        let magnitude = params.max_force.min(stiffness * distance);
        p.velocity += displacement / distance * magnitude;
    } else {
        p.velocity += displacement * stiffness * params.near_gain;
    }

    p.velocity *= damping;

    if let Some(kick) = jitter {
        p.velocity += kick;
    }

    p.position += p.velocity;
}
