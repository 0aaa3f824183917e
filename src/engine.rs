//! The navigation engine.
//!
//! [`NavigationEngine`] wires the components together and is the only type a
//! host needs. It has two states, unmounted and mounted. While unmounted every
//! call is a no-op and every query returns a neutral value.
//!
//! # Frame loop
//!
//! ```ignore
//! use particle_nav::prelude::*;
//!
//! let mut engine = NavigationEngine::new(EngineConfig::new(), |section: SectionId| {
//!     println!("go to {}", section.route());
//! })?;
//! engine.mount();
//!
//! loop {
//!     for event in host_events() {
//!         engine.handle_event(event);
//!     }
//!     engine.tick(frame_dt);
//!     renderer.draw(engine.vertex_bytes(), engine.scene_transform());
//! }
//! ```
//!
//! The engine keeps its own clock, advanced only by [`NavigationEngine::tick`].
//! Event throttles and the transition lock read that clock, so a scripted
//! sequence of ticks and events always produces the same result.

use crate::assign::{AssignmentEngine, AssignmentReport};
use crate::camera::Camera;
use crate::carousel::{CarouselStateMachine, Command, Direction, Outcome};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::field::{ParticleField, ParticleVertex};
use crate::interaction::{Intent, InteractionContext, InteractionController, InteractionEvent};
use crate::layout::section_at_front;
use crate::raster::TextRasterizer;
use crate::section::SectionId;
use crate::simulator::Simulator;
use crate::tilt::SceneTilt;
use glam::Mat4;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Receives navigation requests.
pub trait Navigator {
    fn navigate_to(&mut self, section: SectionId);
}

impl<F: FnMut(SectionId)> Navigator for F {
    fn navigate_to(&mut self, section: SectionId) {
        self(section)
    }
}

/// Something observable that happened inside the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Mounted { particles: usize },
    Unmounted,
    /// The field was reassigned for a view.
    Assigned(AssignmentReport),
    TransitionStarted { from: SectionId, to: SectionId },
    TransitionEnded { section: SectionId },
    HoverChanged(Option<SectionId>),
    NavigationRequested(SectionId),
    /// A command arrived while the transition lock was held.
    CommandRejected(Command),
}

/// Everything that exists only between mount and unmount.
struct Mounted {
    field: ParticleField,
    assigner: AssignmentEngine,
    simulator: Simulator,
    carousel: CarouselStateMachine,
    controller: InteractionController,
    camera: Camera,
    tilt: SceneTilt,
}

/// Particle navigation engine: owns the field and routes input to the carousel.
pub struct NavigationEngine {
    config: EngineConfig,
    navigator: Box<dyn Navigator + Send>,
    state: Option<Mounted>,
    events: Vec<EngineEvent>,
    clock: Duration,
}

impl NavigationEngine {
    /// Validate `config` and create an unmounted engine.
    pub fn new<N>(config: EngineConfig, navigator: N) -> Result<Self, ConfigError>
    where
        N: Navigator + Send + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            navigator: Box::new(navigator),
            state: None,
            events: Vec::new(),
            clock: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Lifecycle ==========

    /// Rasterize the section labels, scatter the field and assign view 0.
    ///
    /// Does nothing if already mounted.
    pub fn mount(&mut self) {
        if self.state.is_some() {
            return;
        }
        let config = &self.config;
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let rasterizer = TextRasterizer::new(config.raster.clone());
        let clouds = SectionId::ALL.map(|section| Arc::new(rasterizer.rasterize(section.label(), &mut rng)));

        let mut field = ParticleField::scattered(config.particle_count, config.initial_spread, &mut rng);
        let assigner = AssignmentEngine::new(
            clouds,
            config.text_fraction,
            config.text_size,
            config.background.clone(),
            config.seed,
        );
        let report = assigner.assign(&mut field, 0);

        let camera = Camera::new(&config.camera);
        let state = Mounted {
            simulator: Simulator::new(config.springs.clone(), config.seed.wrapping_add(1)),
            carousel: CarouselStateMachine::new(
                config.lock_duration,
                config.burst_strength,
                config.seed.wrapping_add(2),
            ),
            controller: InteractionController::new(&config.interaction, camera.near, camera.far),
            camera,
            tilt: SceneTilt::new(),
            field,
            assigner,
        };

        log::info!(
            "Mounted {} particles ({} forming words)",
            state.field.len(),
            report.text_total()
        );
        self.clock = Duration::ZERO;
        self.events.push(EngineEvent::Mounted {
            particles: state.field.len(),
        });
        self.events.push(EngineEvent::Assigned(report));
        self.state = Some(state);
    }

    /// Release all particle state. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.field.release();
            log::info!("Unmounted");
            self.events.push(EngineEvent::Unmounted);
        }
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    // ========== Frame ==========

    /// Advance the engine clock by `dt` seconds and simulate.
    ///
    /// Negative or non-finite deltas advance nothing.
    pub fn tick(&mut self, dt: f32) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.clock += Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO);
        let now = self.clock;

        if state.carousel.update(now) {
            let section = state.carousel.current_section();
            log::debug!("Transition to {} finished", section);
            self.events.push(EngineEvent::TransitionEnded { section });
        }
        if let Some(Intent::Resize { width, height }) = state.controller.poll_resize(now) {
            state.camera.set_viewport(width, height);
        }

        let ticks = state.simulator.step(&mut state.field, dt);
        state.tilt.advance(ticks, now.as_secs_f32());
    }

    // ========== Input ==========

    /// Feed one host event through the interaction controller.
    pub fn handle_event(&mut self, event: InteractionEvent) {
        let now = self.clock;
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let ctx = InteractionContext {
            field: &state.field,
            camera: &state.camera,
            model: state.tilt.model_matrix(),
            transitioning: state.carousel.is_transitioning(),
            hovered: state.carousel.hovered_section(),
        };
        let intent = state.controller.handle(event, now, &ctx);

        if let InteractionEvent::PointerMoved { .. } = event {
            state.tilt.set_pointer(state.controller.cursor_ndc());
        }
        if let Some(intent) = intent {
            self.apply_intent(intent);
        }
    }

    /// Turn the carousel one step without navigating.
    ///
    /// Returns `true` if a transition started.
    pub fn rotate(&mut self, direction: Direction) -> bool {
        matches!(
            self.run_command(Command::Rotate(direction)),
            Some(Outcome::Transitioned { .. })
        )
    }

    /// Click behaviour for `section`: bring it to the front if needed, then navigate.
    ///
    /// Returns `true` if navigation was requested.
    pub fn activate(&mut self, section: SectionId) -> bool {
        if !self.is_mounted() || self.is_transitioning() {
            return false;
        }
        if section == self.current_section() {
            self.navigate(section);
            return true;
        }
        match self.run_command(Command::Select(section)) {
            Some(Outcome::Transitioned { .. }) => {
                self.navigate(section);
                true
            }
            _ => false,
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Rotate(direction) => {
                self.rotate(direction);
            }
            Intent::Hover(hovered) => {
                if let Some(state) = self.state.as_mut() {
                    if state.carousel.set_hovered(hovered) {
                        self.events.push(EngineEvent::HoverChanged(hovered));
                    }
                }
            }
            Intent::Activate(section) => {
                self.activate(section);
            }
            Intent::ConfirmFront => {
                let section = self.current_section();
                self.navigate(section);
            }
            Intent::Resize { width, height } => {
                if let Some(state) = self.state.as_mut() {
                    state.camera.set_viewport(width, height);
                }
            }
        }
    }

    fn run_command(&mut self, command: Command) -> Option<Outcome> {
        let now = self.clock;
        let state = self.state.as_mut()?;
        let was_hovered = state.carousel.hovered_section();

        let outcome = state
            .carousel
            .apply(command, now, &mut state.field, &state.assigner);

        match &outcome {
            Outcome::Transitioned { from, to, report } => {
                log::info!("Carousel {} -> {}", from, to);
                self.events.push(EngineEvent::Assigned(report.clone()));
                self.events.push(EngineEvent::TransitionStarted { from: *from, to: *to });
                if was_hovered.is_some() {
                    self.events.push(EngineEvent::HoverChanged(None));
                }
            }
            Outcome::Rejected => self.events.push(EngineEvent::CommandRejected(command)),
            Outcome::Unchanged => {}
        }
        Some(outcome)
    }

    fn navigate(&mut self, section: SectionId) {
        if !self.is_mounted() {
            return;
        }
        log::info!("Navigating to {}", section.route());
        self.events.push(EngineEvent::NavigationRequested(section));
        self.navigator.navigate_to(section);
    }

    // ========== Queries ==========

    /// Section in the front slot. `Home` while unmounted.
    pub fn current_section(&self) -> SectionId {
        self.state
            .as_ref()
            .map_or(section_at_front(0), |s| s.carousel.current_section())
    }

    pub fn hovered_section(&self) -> Option<SectionId> {
        self.state.as_ref().and_then(|s| s.carousel.hovered_section())
    }

    /// Label for a "Navigate: X" indicator: the hovered section, else the front one.
    pub fn indicator_label(&self) -> &'static str {
        self.hovered_section()
            .unwrap_or_else(|| self.current_section())
            .label()
    }

    pub fn view_index(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.carousel.view_index())
    }

    pub fn is_transitioning(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.carousel.is_transitioning())
    }

    /// Engine time accumulated by [`tick`](Self::tick) since mount.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.state.as_ref().map(|s| &s.field)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.state.as_ref().map(|s| &s.camera)
    }

    /// Render vertices as of the last step or assignment.
    pub fn vertices(&self) -> &[ParticleVertex] {
        self.state.as_ref().map(|s| s.field.vertices()).unwrap_or(&[])
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        self.state.as_ref().map(|s| s.field.vertex_bytes()).unwrap_or(&[])
    }

    /// Model matrix of the tilted particle system.
    pub fn scene_transform(&self) -> Mat4 {
        self.state
            .as_ref()
            .map_or(Mat4::IDENTITY, |s| s.tilt.model_matrix())
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

impl fmt::Debug for NavigationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationEngine")
            .field("mounted", &self.is_mounted())
            .field("view_index", &self.view_index())
            .field("transitioning", &self.is_transitioning())
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::NavKey;
    use std::sync::{Arc, Mutex};

    fn small_config() -> EngineConfig {
        EngineConfig::new().with_particle_count(2_000).with_seed(11)
    }

    fn engine() -> (NavigationEngine, Arc<Mutex<Vec<SectionId>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let engine = NavigationEngine::new(small_config(), move |s: SectionId| {
            sink.lock().unwrap().push(s);
        })
        .unwrap();
        (engine, log)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = NavigationEngine::new(EngineConfig::new().with_particle_count(0), |_: SectionId| {});
        assert!(matches!(result, Err(ConfigError::NoParticles)));
    }

    #[test]
    fn test_unusable_scalars_never_reach_mount() {
        let mut config = small_config();
        config.initial_spread = -1.0;
        let result = NavigationEngine::new(config, |_: SectionId| {});
        assert!(matches!(result, Err(ConfigError::Parameter("initial_spread"))));

        let config = small_config().with_burst_strength(f32::NAN);
        let result = NavigationEngine::new(config, |_: SectionId| {});
        assert!(matches!(result, Err(ConfigError::Parameter("burst_strength"))));
    }

    #[test]
    fn test_burst_keeps_particles_finite() {
        let (mut engine, _) = engine();
        engine.mount();
        assert!(engine.rotate(Direction::Next));
        engine.tick(1.0 / 60.0);
        let field = engine.field().unwrap();
        assert!(field
            .particles()
            .iter()
            .all(|p| p.position.is_finite() && p.velocity.is_finite()));
    }

    #[test]
    fn test_unmounted_engine_is_inert() {
        let (mut engine, log) = engine();
        engine.tick(0.016);
        engine.handle_event(InteractionEvent::Key(NavKey::Enter));
        assert!(!engine.rotate(Direction::Next));
        assert!(!engine.activate(SectionId::About));
        assert!(engine.vertices().is_empty());
        assert_eq!(engine.current_section(), SectionId::Home);
        assert_eq!(engine.scene_transform(), Mat4::IDENTITY);
        assert!(log.lock().unwrap().is_empty());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_mount_assigns_view_zero() {
        let (mut engine, _) = engine();
        engine.mount();
        let events = engine.drain_events();
        assert_eq!(events[0], EngineEvent::Mounted { particles: 2_000 });
        assert!(matches!(&events[1], EngineEvent::Assigned(r) if r.view_index == 0));
        assert_eq!(engine.vertices().len(), 2_000);
        assert_eq!(engine.indicator_label(), "Home");

        // Mounting twice keeps the existing state.
        engine.mount();
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let (mut engine, _) = engine();
        engine.mount();
        engine.unmount();
        engine.unmount();
        let events = engine.drain_events();
        assert_eq!(events.iter().filter(|e| **e == EngineEvent::Unmounted).count(), 1);
        assert!(engine.field().is_none());
    }

    #[test]
    fn test_rotate_locks_until_lock_elapses() {
        let (mut engine, log) = engine();
        engine.mount();
        assert!(engine.rotate(Direction::Next));
        assert_eq!(engine.current_section(), SectionId::Projects);
        assert!(!engine.rotate(Direction::Next));

        for _ in 0..47 {
            engine.tick(1.0 / 60.0);
        }
        assert!(engine.is_transitioning());
        for _ in 0..5 {
            engine.tick(1.0 / 60.0);
        }
        assert!(!engine.is_transitioning());
        assert!(engine.rotate(Direction::Prev));
        assert_eq!(engine.current_section(), SectionId::Home);
        // Rotation never navigates.
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_enter_navigates_to_front() {
        let (mut engine, log) = engine();
        engine.mount();
        engine.handle_event(InteractionEvent::Key(NavKey::Enter));
        assert_eq!(*log.lock().unwrap(), vec![SectionId::Home]);
        assert!(engine
            .drain_events()
            .contains(&EngineEvent::NavigationRequested(SectionId::Home)));
    }

    #[test]
    fn test_activate_front_navigates_without_transition() {
        let (mut engine, log) = engine();
        engine.mount();
        assert!(engine.activate(SectionId::Home));
        assert!(!engine.is_transitioning());
        assert_eq!(*log.lock().unwrap(), vec![SectionId::Home]);
    }

    #[test]
    fn test_tick_ignores_bad_deltas() {
        let (mut engine, _) = engine();
        engine.mount();
        engine.tick(f32::NAN);
        engine.tick(-1.0);
        engine.tick(f32::INFINITY);
        assert_eq!(engine.clock(), Duration::ZERO);
    }

    #[test]
    fn test_resize_updates_camera() {
        let (mut engine, _) = engine();
        engine.mount();
        engine.handle_event(InteractionEvent::Resized { width: 400, height: 400 });
        assert_eq!(engine.camera().unwrap().aspect, 1.0);
    }
}
