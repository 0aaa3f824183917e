//! Translation of winit window events into engine events.
//!
//! The engine only understands [`InteractionEvent`]s. Hosts built on winit
//! run every [`WindowEvent`] through an [`InputTranslator`]:
//!
//! ```ignore
//! let mut input = InputTranslator::new();
//!
//! // In `window_event`:
//! if let Some(event) = input.translate(&event) {
//!     engine.handle_event(event);
//! }
//! ```
//!
//! | winit                          | engine                      |
//! |--------------------------------|-----------------------------|
//! | `CursorMoved`                  | `PointerMoved`              |
//! | left button released           | `Click`                     |
//! | `ArrowLeft` / `ArrowRight`     | `Key(ArrowLeft / ArrowRight)` |
//! | `Enter`                        | `Key(Enter)`                |
//! | `[` / `]`                      | `Button(Prev / Next)`       |
//! | `Resized`                      | `Resized`                   |

use crate::carousel::Direction;
use crate::interaction::{InteractionEvent, NavKey};
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Back, forward and any extra buttons.
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Keys the host cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Left,
    Right,
    Enter,
    BracketLeft,
    BracketRight,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
            WinitKeyCode::BracketLeft => KeyCode::BracketLeft,
            WinitKeyCode::BracketRight => KeyCode::BracketRight,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

impl KeyCode {
    /// Engine event for a fresh press of this key.
    pub fn to_event(self) -> Option<InteractionEvent> {
        match self {
            KeyCode::Left => Some(InteractionEvent::Key(NavKey::ArrowLeft)),
            KeyCode::Right => Some(InteractionEvent::Key(NavKey::ArrowRight)),
            KeyCode::Enter => Some(InteractionEvent::Key(NavKey::Enter)),
            KeyCode::BracketLeft => Some(InteractionEvent::Button(Direction::Prev)),
            KeyCode::BracketRight => Some(InteractionEvent::Button(Direction::Next)),
            KeyCode::Escape | KeyCode::Other(_) => None,
        }
    }
}

/// Stateful winit-to-engine event translation.
///
/// Held keys are tracked so auto-repeat does not fire a key twice.
#[derive(Debug, Default)]
pub struct InputTranslator {
    keys_held: HashSet<KeyCode>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a window event, or `None` if the engine has no use for it.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InteractionEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                self.key(KeyCode::from(code), event.state)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(MouseButton::from(*button), *state)
            }
            WindowEvent::CursorMoved { position, .. } => Some(InteractionEvent::PointerMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::Resized(size) => Some(InteractionEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }

    /// Key transition. Only the first press of a held key produces an event.
    pub fn key(&mut self, key: KeyCode, state: ElementState) -> Option<InteractionEvent> {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    key.to_event()
                } else {
                    None
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                None
            }
        }
    }

    /// A click fires when the left button is released.
    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<InteractionEvent> {
        match (button, state) {
            (MouseButton::Left, ElementState::Released) => Some(InteractionEvent::Click),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowLeft), KeyCode::Left);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadEnter), KeyCode::Enter);
        assert!(matches!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other(_)));
        assert_eq!(
            KeyCode::BracketRight.to_event(),
            Some(InteractionEvent::Button(Direction::Next))
        );
        assert_eq!(KeyCode::Escape.to_event(), None);
    }

    #[test]
    fn test_key_repeat_is_suppressed() {
        let mut input = InputTranslator::new();
        let first = input.key(KeyCode::Right, ElementState::Pressed);
        assert_eq!(first, Some(InteractionEvent::Key(NavKey::ArrowRight)));
        assert_eq!(input.key(KeyCode::Right, ElementState::Pressed), None);

        assert_eq!(input.key(KeyCode::Right, ElementState::Released), None);
        assert!(input.key(KeyCode::Right, ElementState::Pressed).is_some());
    }

    #[test]
    fn test_click_on_left_release() {
        let mut input = InputTranslator::new();
        assert_eq!(input.mouse_button(MouseButton::Left, ElementState::Pressed), None);
        assert_eq!(
            input.mouse_button(MouseButton::Left, ElementState::Released),
            Some(InteractionEvent::Click)
        );
        assert_eq!(input.mouse_button(MouseButton::Right, ElementState::Released), None);
    }

    #[test]
    fn test_extra_buttons_never_click() {
        let mut input = InputTranslator::new();
        for button in [WinitMouseButton::Back, WinitMouseButton::Forward, WinitMouseButton::Other(7)] {
            let button = MouseButton::from(button);
            assert_eq!(button, MouseButton::Other);
            assert_eq!(input.mouse_button(button, ElementState::Released), None);
        }
    }
}
