use std::collections::HashSet;

use sdl2::{event::Event, keyboard::Keycode};

/// The keys currently held down.
#[derive(Default, Debug)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
}

impl KeyboardState {
    /// Tracks key presses and releases. Other events are ignored.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::KeyDown {
                keycode: Some(keycode),
                ..
            } => {
                self.down.insert(*keycode);
            }
            Event::KeyUp {
                keycode: Some(keycode),
                ..
            } => {
                self.down.remove(keycode);
            }
            // Releases are lost while unfocused, so forget everything.
            Event::Window {
                win_event: sdl2::event::WindowEvent::FocusLost,
                ..
            } => self.down.clear(),
            _ => {}
        }
    }

    pub fn is_down(&self, keycode: Keycode) -> bool {
        self.down.contains(&keycode)
    }
}

/// Whether a mouse button went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Release,
}

/// Camera movement requested by the keyboard this frame. Each axis is -1, 0
/// or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

impl MoveInput {
    /// W/S move along the view direction, D/A strafe and E/Q rise and sink.
    pub fn from_keyboard(keyboard: &KeyboardState) -> Self {
        let axis = |positive, negative| {
            keyboard.is_down(positive) as i8 as f32 - keyboard.is_down(negative) as i8 as f32
        };
        Self {
            forward: axis(Keycode::W, Keycode::S),
            right: axis(Keycode::D, Keycode::A),
            up: axis(Keycode::E, Keycode::Q),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(keys: &[Keycode]) -> KeyboardState {
        KeyboardState {
            down: keys.iter().copied().collect(),
        }
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let keyboard = holding(&[Keycode::W, Keycode::S, Keycode::D, Keycode::Q]);
        let input = MoveInput::from_keyboard(&keyboard);
        assert_eq!(input.forward, 0.0);
        assert_eq!(input.right, 1.0);
        assert_eq!(input.up, -1.0);
        assert!(!input.is_idle());
    }

    #[test]
    fn test_unrelated_keys_are_idle() {
        assert!(MoveInput::from_keyboard(&KeyboardState::default()).is_idle());
        assert!(MoveInput::from_keyboard(&holding(&[Keycode::Space])).is_idle());
        assert_eq!(MoveInput::from_keyboard(&holding(&[Keycode::A])).right, -1.0);
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut keyboard = holding(&[Keycode::W, Keycode::E]);
        keyboard.handle_event(&Event::Window {
            timestamp: 0,
            window_id: 0,
            win_event: sdl2::event::WindowEvent::FocusLost,
        });
        assert!(keyboard.down.is_empty());
    }
}
