//! Engine configuration.
//!
//! Every tunable of the engine lives here, grouped by the component that
//! reads it. Defaults reproduce the reference look: 100,000 particles, 90% of
//! them forming words, stiff springs for text and soft ones for background.
//!
//! ```ignore
//! use particle_nav::prelude::*;
//!
//! let config = EngineConfig::new()
//!     .with_particle_count(50_000)
//!     .with_seed(7)
//!     .with_lock_duration(Duration::from_millis(600));
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use glam::Vec3;
use std::time::Duration;

/// Text-to-point rasterization settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Pixels brighter than this become points.
    pub threshold: u8,
    /// Height of a drawn glyph in pixels.
    ///
    /// Glyphs are a 5x7 bitmap scaled to whole-pixel cells, so taller glyphs
    /// light more pixels. A cloud larger than the per-section share is
    /// sampled from its first points with stride 1 when it holds fewer than
    /// twice that share, which drops the bottom rows of long labels such as
    /// "Projects". Lower this (or raise the particle count) to keep whole words.
    pub glyph_height: u32,
    /// Side length of the square plane the canvas maps onto.
    pub plane_size: f32,
    /// Total depth spread of the random z jitter.
    pub depth_jitter: f32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 256,
            threshold: 200,
            glyph_height: 100,
            plane_size: 20.0,
            depth_jitter: 0.5,
        }
    }
}

/// Spring-damper constants applied every reference tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringParams {
    pub text_stiffness: f32,
    pub text_damping: f32,
    pub background_stiffness: f32,
    pub background_damping: f32,
    /// Upper bound on the per-tick pull for far targets.
    pub max_force: f32,
    /// Squared distance beyond which the clamped, normalized pull is used.
    pub far_distance_sq: f32,
    /// Multiplier of the proportional pull inside `far_distance_sq`.
    pub near_gain: f32,
    /// Chance per tick that a background particle is nudged.
    pub jitter_probability: f64,
    /// Full width of the nudge on each axis.
    pub jitter_amplitude: f32,
    /// Reference ticks per second; the constants above are per tick.
    pub tick_rate: f32,
    /// Cap on ticks run for a single frame, so a long stall cannot spiral.
    pub max_substeps: u32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            text_stiffness: 0.4,
            text_damping: 0.92,
            background_stiffness: 0.1,
            background_damping: 0.92,
            max_force: 0.2,
            far_distance_sq: 1.0,
            near_gain: 0.5,
            jitter_probability: 0.01,
            jitter_amplitude: 0.001,
            tick_rate: 60.0,
            max_substeps: 5,
        }
    }
}

/// Volume and look of particles that are not part of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    /// Targets span `-half_extent..half_extent` on x and y.
    pub half_extent: f32,
    /// Nearest z of the background slab.
    pub depth_near: f32,
    /// Farthest z of the background slab.
    pub depth_far: f32,
    pub color: Vec3,
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            depth_near: -5.0,
            depth_far: -15.0,
            color: Vec3::new(0.3, 0.3, 0.5),
            size_min: 0.02,
            size_max: 0.03,
        }
    }
}

/// Pointer, keyboard and resize handling.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Minimum time between two processed pointer samples.
    pub pointer_interval: Duration,
    /// Minimum time between two processed resizes.
    pub resize_interval: Duration,
    /// Horizontal pixels between samples that count as a swipe.
    pub swipe_threshold: f32,
    /// World-space radius around the pick ray that counts as a hit.
    pub pick_threshold: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pointer_interval: Duration::from_millis(16),
            resize_interval: Duration::from_millis(100),
            swipe_threshold: 20.0,
            pick_threshold: 0.9,
        }
    }
}

/// Perspective camera looking down -z at the carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the camera from the origin along +z.
    pub distance: f32,
    /// Initial viewport in physical pixels.
    pub viewport: (u32, u32),
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 50.0,
            near: 0.051,
            far: 1000.0,
            distance: 15.0,
            viewport: (1280, 720),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fixed particle count for the engine lifetime.
    pub particle_count: usize,
    /// Share of particles available to words.
    pub text_fraction: f64,
    /// Base size of a front-slot text particle.
    pub text_size: f32,
    /// Edge length of the cube particles are scattered in at mount.
    pub initial_spread: f32,
    /// Full width of the per-axis velocity burst on a carousel transition.
    pub burst_strength: f32,
    /// How long the carousel ignores commands after a transition starts.
    pub lock_duration: Duration,
    /// Seed for every random stream in the engine.
    pub seed: u64,
    pub raster: RasterConfig,
    pub springs: SpringParams,
    pub background: BackgroundConfig,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            text_fraction: 0.9,
            text_size: 0.01,
            initial_spread: 30.0,
            burst_strength: 0.3,
            lock_duration: Duration::from_millis(800),
            seed: 0x5EED_CAFE,
            raster: RasterConfig::default(),
            springs: SpringParams::default(),
            background: BackgroundConfig::default(),
            interaction: InteractionConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the share of particles that may form words.
    pub fn with_text_fraction(mut self, fraction: f64) -> Self {
        self.text_fraction = fraction;
        self
    }

    /// Set the seed used for scattering, jitter and bursts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how long commands are ignored after a transition.
    pub fn with_lock_duration(mut self, duration: Duration) -> Self {
        self.lock_duration = duration;
        self
    }

    /// Set the strength of the transition burst.
    pub fn with_burst_strength(mut self, strength: f32) -> Self {
        self.burst_strength = strength;
        self
    }

    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    pub fn with_springs(mut self, springs: SpringParams) -> Self {
        self.springs = springs;
        self
    }

    pub fn with_background(mut self, background: BackgroundConfig) -> Self {
        self.background = background;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Set the initial viewport size in pixels.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.camera.viewport = (width, height);
        self
    }

    /// Check that the configuration can drive an engine.
    ///
    /// A zero-sized raster canvas is accepted: every section then rasterizes
    /// to an empty cloud and the field is all background.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        if !(0.0..=1.0).contains(&self.text_fraction) {
            return Err(ConfigError::TextFraction(self.text_fraction));
        }

        let scalars = [
            ("initial_spread", self.initial_spread),
            ("burst_strength", self.burst_strength),
            ("text_size", self.text_size),
            ("raster.plane_size", self.raster.plane_size),
            ("raster.depth_jitter", self.raster.depth_jitter),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Parameter(name));
            }
        }

        let s = &self.springs;
        let spring_values = [
            ("text_stiffness", s.text_stiffness),
            ("text_damping", s.text_damping),
            ("background_stiffness", s.background_stiffness),
            ("background_damping", s.background_damping),
            ("max_force", s.max_force),
            ("far_distance_sq", s.far_distance_sq),
            ("near_gain", s.near_gain),
            ("jitter_amplitude", s.jitter_amplitude),
        ];
        for (name, value) in spring_values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Spring(name));
            }
        }
        if !(0.0..=1.0).contains(&s.jitter_probability) {
            return Err(ConfigError::Spring("jitter_probability"));
        }
        if !(s.tick_rate.is_finite() && s.tick_rate > 0.0) {
            return Err(ConfigError::TickRate(s.tick_rate));
        }

        let b = &self.background;
        if !(b.half_extent.is_finite() && b.half_extent > 0.0) {
            return Err(ConfigError::BackgroundRange("extent"));
        }
        if !(b.depth_near > b.depth_far) {
            return Err(ConfigError::BackgroundRange("depth"));
        }
        if !(b.size_max > b.size_min && b.size_min >= 0.0) {
            return Err(ConfigError::BackgroundRange("size"));
        }

        let pick = self.interaction.pick_threshold;
        if !(pick.is_finite() && pick > 0.0) {
            return Err(ConfigError::PickThreshold(pick));
        }

        let c = &self.camera;
        if !(c.fov_y_degrees > 0.0 && c.fov_y_degrees < 180.0) {
            return Err(ConfigError::Camera("field of view must be between 0 and 180 degrees"));
        }
        if !(c.near > 0.0 && c.far > c.near) {
            return Err(ConfigError::Camera("clip planes must satisfy 0 < near < far"));
        }

        Ok(())
    }
}
