//! The carousel state machine.
//!
//! ```text
//!            rotate / select
//!   Idle ─────────────────────► Transitioning { started_at }
//!    ▲                                 │
//!    └──────── lock elapsed ───────────┘
//! ```
//!
//! Entering `Transitioning` kicks every particle, moves the view index,
//! reassigns the field and clears the hover. Commands that arrive while the
//! lock is held are rejected without side effects.

use crate::assign::{AssignmentEngine, AssignmentReport};
use crate::field::ParticleField;
use crate::layout::section_at_front;
use crate::section::{SectionId, SECTION_COUNT};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

/// Rotation direction of the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// View index reached by rotating once from `view_index`.
    pub fn apply(self, view_index: usize) -> usize {
        match self {
            Direction::Next => (view_index + 1) % SECTION_COUNT,
            Direction::Prev => (view_index + SECTION_COUNT - 1) % SECTION_COUNT,
        }
    }
}

/// A request to change the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Rotate(Direction),
    /// Bring a specific section to the front.
    Select(SectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning { started_at: Duration },
}

/// Result of [`CarouselStateMachine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Transitioned {
        from: SectionId,
        to: SectionId,
        report: AssignmentReport,
    },
    /// The transition lock is held.
    Rejected,
    /// The selected section is already in front.
    Unchanged,
}

/// Front section, hover and transition lock of the four-slot carousel.
#[derive(Debug, Clone)]
pub struct CarouselStateMachine {
    view_index: usize,
    hovered: Option<SectionId>,
    phase: Phase,
    lock_duration: Duration,
    burst_strength: f32,
    rng: SmallRng,
}

impl CarouselStateMachine {
    pub fn new(lock_duration: Duration, burst_strength: f32, seed: u64) -> Self {
        Self {
            view_index: 0,
            hovered: None,
            phase: Phase::Idle,
            lock_duration,
            burst_strength,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn view_index(&self) -> usize {
        self.view_index
    }

    /// Section in the front slot.
    #[inline]
    pub fn current_section(&self) -> SectionId {
        section_at_front(self.view_index)
    }

    #[inline]
    pub fn hovered_section(&self) -> Option<SectionId> {
        self.hovered
    }

    /// Returns `true` if the hover changed.
    pub fn set_hovered(&mut self, hovered: Option<SectionId>) -> bool {
        let changed = self.hovered != hovered;
        self.hovered = hovered;
        changed
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// Run a command at engine time `now`.
    pub fn apply(
        &mut self,
        command: Command,
        now: Duration,
        field: &mut ParticleField,
        assigner: &AssignmentEngine,
    ) -> Outcome {
        if self.is_transitioning() {
            log::debug!("Ignoring {:?} during transition", command);
            return Outcome::Rejected;
        }

        let next_index = match command {
            Command::Rotate(direction) => direction.apply(self.view_index),
            Command::Select(section) if section.order_index() == self.view_index => {
                return Outcome::Unchanged;
            }
            Command::Select(section) => section.order_index(),
        };

        let from = self.current_section();
        field.apply_impulse(self.burst_strength, &mut self.rng);
        self.view_index = next_index;
        let report = assigner.assign(field, next_index);
        self.hovered = None;
        self.phase = Phase::Transitioning { started_at: now };

        Outcome::Transitioned {
            from,
            to: self.current_section(),
            report,
        }
    }

    /// Release the lock once it has been held long enough.
    ///
    /// Returns `true` on the call that ends a transition.
    pub fn update(&mut self, now: Duration) -> bool {
        match self.phase {
            Phase::Transitioning { started_at }
                if now.saturating_sub(started_at) >= self.lock_duration =>
            {
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackgroundConfig;
    use crate::field::Particle;
    use crate::raster::PointCloud;
    use glam::Vec3;
    use std::sync::Arc;

    const LOCK: Duration = Duration::from_millis(800);

    fn setup() -> (CarouselStateMachine, ParticleField, AssignmentEngine) {
        let cloud = Arc::new(PointCloud::new(vec![Vec3::ZERO; 20]));
        let assigner = AssignmentEngine::new(
            [cloud.clone(), cloud.clone(), cloud.clone(), cloud],
            0.9,
            0.01,
            BackgroundConfig::default(),
            1,
        );
        let mut field = ParticleField::from_particles(vec![Particle::at(Vec3::ZERO, 0.05); 200]);
        assigner.assign(&mut field, 0);
        (CarouselStateMachine::new(LOCK, 0.3, 9), field, assigner)
    }

    #[test]
    fn test_direction_wraps() {
        assert_eq!(Direction::Next.apply(3), 0);
        assert_eq!(Direction::Prev.apply(0), 3);
    }

    #[test]
    fn test_rotate_transitions_and_locks() {
        let (mut carousel, mut field, assigner) = setup();
        carousel.set_hovered(Some(SectionId::Home));

        let outcome = carousel.apply(Command::Rotate(Direction::Next), Duration::ZERO, &mut field, &assigner);
        match outcome {
            Outcome::Transitioned { from, to, report } => {
                assert_eq!(from, SectionId::Home);
                assert_eq!(to, SectionId::Projects);
                assert_eq!(report.view_index, 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(carousel.view_index(), 1);
        assert!(carousel.is_transitioning());
        assert_eq!(carousel.hovered_section(), None);
        // Burst reached every particle.
        assert!(field.particles().iter().all(|p| p.velocity != Vec3::ZERO));
    }

    #[test]
    fn test_commands_rejected_while_locked() {
        let (mut carousel, mut field, assigner) = setup();
        carousel.apply(Command::Rotate(Direction::Prev), Duration::ZERO, &mut field, &assigner);
        assert_eq!(carousel.view_index(), 3);

        let before = field.particles().to_vec();
        let outcome = carousel.apply(
            Command::Rotate(Direction::Next),
            Duration::from_millis(400),
            &mut field,
            &assigner,
        );
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(carousel.view_index(), 3);
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_lock_expires() {
        let (mut carousel, mut field, assigner) = setup();
        let start = Duration::from_secs(1);
        carousel.apply(Command::Select(SectionId::About), start, &mut field, &assigner);
        assert!(!carousel.update(start + Duration::from_millis(799)));
        assert!(carousel.is_transitioning());
        assert!(carousel.update(start + LOCK));
        assert_eq!(carousel.phase(), Phase::Idle);
        assert!(!carousel.update(start + LOCK * 2));
    }

    #[test]
    fn test_select_front_is_unchanged() {
        let (mut carousel, mut field, assigner) = setup();
        let outcome = carousel.apply(Command::Select(SectionId::Home), Duration::ZERO, &mut field, &assigner);
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(!carousel.is_transitioning());
    }

    #[test]
    fn test_select_jumps_directly() {
        let (mut carousel, mut field, assigner) = setup();
        carousel.apply(Command::Select(SectionId::Contact), Duration::ZERO, &mut field, &assigner);
        assert_eq!(carousel.current_section(), SectionId::Contact);
        assert_eq!(field.count_in(SectionId::Contact), 20);
    }
}
