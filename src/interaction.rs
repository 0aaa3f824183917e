//! Pointer and keyboard handling.
//!
//! [`InteractionController`] turns raw [`InteractionEvent`]s into
//! [`Intent`]s for the engine. It owns the mutable gesture state (throttles,
//! the last processed pointer sample, the cursor) and performs hit-testing,
//! but never touches the carousel itself.

use crate::camera::Camera;
use crate::carousel::Direction;
use crate::config::InteractionConfig;
use crate::field::ParticleField;
use crate::picking::Picker;
use crate::section::SectionId;
use crate::time::Throttle;
use glam::{Mat4, Vec2};
use std::time::Duration;

/// Keys the carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Enter,
}

/// Host-agnostic input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// Pointer position in physical pixels, origin top-left.
    PointerMoved { x: f32, y: f32 },
    Click,
    Key(NavKey),
    /// A prev/next button was pressed.
    Button(Direction),
    Resized { width: u32, height: u32 },
}

/// What the engine should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Turn the carousel without navigating.
    Rotate(Direction),
    /// The section under the pointer, re-evaluated.
    Hover(Option<SectionId>),
    /// The hovered section was clicked.
    Activate(SectionId),
    /// Navigate to the section in front.
    ConfirmFront,
    Resize { width: u32, height: u32 },
}

/// What the controller may read while handling an event.
#[derive(Debug, Clone, Copy)]
pub struct InteractionContext<'a> {
    pub field: &'a ParticleField,
    pub camera: &'a Camera,
    /// Scene transform of the field.
    pub model: Mat4,
    pub transitioning: bool,
    pub hovered: Option<SectionId>,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    pointer_throttle: Throttle,
    resize_throttle: Throttle,
    swipe_threshold: f32,
    picker: Picker,
    /// x of the last processed pointer sample.
    last_x: Option<f32>,
    cursor_ndc: Vec2,
    pending_resize: Option<(u32, u32)>,
}

impl InteractionController {
    pub fn new(config: &InteractionConfig, near: f32, far: f32) -> Self {
        Self {
            pointer_throttle: Throttle::new(config.pointer_interval),
            resize_throttle: Throttle::new(config.resize_interval),
            swipe_threshold: config.swipe_threshold,
            picker: Picker::new(config.pick_threshold, near, far),
            last_x: None,
            cursor_ndc: Vec2::ZERO,
            pending_resize: None,
        }
    }

    /// Latest pointer position in NDC, throttled or not.
    pub fn cursor_ndc(&self) -> Vec2 {
        self.cursor_ndc
    }

    /// Handle one event at engine time `now`.
    pub fn handle(
        &mut self,
        event: InteractionEvent,
        now: Duration,
        ctx: &InteractionContext<'_>,
    ) -> Option<Intent> {
        match event {
            InteractionEvent::PointerMoved { x, y } => self.pointer_moved(x, y, now, ctx),
            InteractionEvent::Click => match ctx.hovered {
                Some(section) if !ctx.transitioning => Some(Intent::Activate(section)),
                _ => None,
            },
            InteractionEvent::Key(_) | InteractionEvent::Button(_) if ctx.transitioning => None,
            InteractionEvent::Key(NavKey::ArrowLeft) => Some(Intent::Rotate(Direction::Prev)),
            InteractionEvent::Key(NavKey::ArrowRight) => Some(Intent::Rotate(Direction::Next)),
            InteractionEvent::Key(NavKey::Enter) => Some(Intent::ConfirmFront),
            InteractionEvent::Button(direction) => Some(Intent::Rotate(direction)),
            InteractionEvent::Resized { width, height } => {
                self.pending_resize = Some((width, height));
                self.poll_resize(now)
            }
        }
    }

    /// Release a resize held back by the throttle, once it may pass.
    pub fn poll_resize(&mut self, now: Duration) -> Option<Intent> {
        let (width, height) = self.pending_resize?;
        if !self.resize_throttle.ready(now) {
            return None;
        }
        self.pending_resize = None;
        Some(Intent::Resize { width, height })
    }

    fn pointer_moved(
        &mut self,
        x: f32,
        y: f32,
        now: Duration,
        ctx: &InteractionContext<'_>,
    ) -> Option<Intent> {
        self.cursor_ndc = ctx.camera.pixel_to_ndc(x, y);

        if !self.pointer_throttle.ready(now) {
            return None;
        }
        let delta = self.last_x.map_or(0.0, |last| x - last);
        self.last_x = Some(x);

        if ctx.transitioning {
            return None;
        }

        if delta.abs() > self.swipe_threshold {
            let direction = if delta > 0.0 {
                Direction::Prev
            } else {
                Direction::Next
            };
            return Some(Intent::Rotate(direction));
        }

        let ray = ctx.camera.ray_from_ndc(self.cursor_ndc);
        let hovered = self
            .picker
            .pick(ctx.field, &ray, ctx.model)
            .and_then(|hit| hit.section);
        Some(Intent::Hover(hovered))
    }
}
