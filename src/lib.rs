//! # particle-nav - Particle Navigation Engine
//!
//! A navigation interface made of tens of thousands of simulated particles.
//! The particles spell the section names ("Home", "Projects", "About",
//! "Contact") on a four-slot 3D carousel; the user rotates the carousel with
//! swipes, arrow keys or prev/next buttons and clicks a word to navigate.
//!
//! The crate is the engine behind that interface. Rendering is left to the
//! host: it reads [`NavigationEngine::vertices`] every frame and draws them
//! with [`NavigationEngine::scene_transform`]. A winit + wgpu reference host
//! lives in [`host`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_nav::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = EngineConfig::new().with_particle_count(50_000);
//!     let mut engine = NavigationEngine::new(config, |section: SectionId| {
//!         println!("navigate to {}", section.route());
//!     })?;
//!
//!     engine.mount();
//!     engine.handle_event(InteractionEvent::Key(NavKey::ArrowRight));
//!     engine.tick(1.0 / 60.0);
//!     assert_eq!(engine.current_section(), SectionId::Projects);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Point clouds
//!
//! At mount each section label is drawn into a grayscale canvas by
//! [`TextRasterizer`]; every bright pixel becomes a point on a 20x20 plane.
//!
//! ### Layout and assignment
//!
//! [`layout::slot_for`] places each section in one of four carousel slots
//! depending on the view index. [`AssignmentEngine`] then gives every section
//! an even share of particles, sampled from its cloud and offset to its slot,
//! and sends the remaining particles to a background slab.
//!
//! ### Simulation
//!
//! [`Simulator`] pulls each particle toward its target with a clamped spring
//! and damping, at a fixed 60 Hz reference tick regardless of frame rate.
//!
//! ### Interaction
//!
//! [`InteractionController`] turns pointer and key events into intents:
//! hover (ray picking against particle positions), swipe rotation, click to
//! select. [`CarouselStateMachine`] applies them and holds a short transition
//! lock during which further commands are rejected.

pub mod assign;
pub mod camera;
pub mod carousel;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
mod glyphs;
pub mod host;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod picking;
pub mod raster;
pub mod section;
pub mod simulator;
pub mod tilt;
pub mod time;

pub use assign::{AssignmentEngine, AssignmentReport, SectionAssignment};
pub use bytemuck;
pub use camera::{Camera, Ray};
pub use carousel::{CarouselStateMachine, Command, Direction, Outcome, Phase};
pub use config::{
    BackgroundConfig, CameraConfig, EngineConfig, InteractionConfig, RasterConfig, SpringParams,
};
pub use engine::{EngineEvent, NavigationEngine, Navigator};
pub use error::{ConfigError, GpuError, HostError};
pub use field::{Particle, ParticleField, ParticleVertex};
pub use glam::{Mat4, Vec2, Vec3};
pub use interaction::{Intent, InteractionController, InteractionEvent, NavKey};
pub use layout::{Slot, SlotPlacement};
pub use picking::{PickHit, Picker};
pub use raster::{PointCloud, TextRasterizer};
pub use section::SectionId;
pub use simulator::Simulator;
pub use tilt::SceneTilt;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_nav::prelude::*;
/// ```
pub mod prelude {
    pub use crate::carousel::Direction;
    pub use crate::config::{
        BackgroundConfig, CameraConfig, EngineConfig, InteractionConfig, RasterConfig, SpringParams,
    };
    pub use crate::engine::{EngineEvent, NavigationEngine, Navigator};
    pub use crate::error::ConfigError;
    pub use crate::field::ParticleVertex;
    pub use crate::interaction::{InteractionEvent, NavKey};
    pub use crate::section::SectionId;
    pub use crate::{Mat4, Vec2, Vec3};
    pub use std::time::Duration;
}
