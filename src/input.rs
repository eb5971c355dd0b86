//! Input handling for the native host.
//!
//! [`Input`] turns raw winit window events into what the backdrop needs:
//! the pointer as an `Option<Vec2>` (absent once the cursor leaves the
//! window) and the keys pressed this frame for the host's bindings.
//!
//! # Usage
//!
//! ```ignore
//! // in the window event handler
//! input.handle_event(&event);
//! engine.set_pointer(input.pointer());
//!
//! // once per frame, after acting on key presses
//! input.begin_frame();
//! ```

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the host binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Space,
    Escape,
    M,
    S,
    /// Top-row digit `0..=9`.
    Digit(u8),
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::KeyM => KeyCode::M,
            WinitKeyCode::KeyS => KeyCode::S,

            WinitKeyCode::Digit0 => KeyCode::Digit(0),
            WinitKeyCode::Digit1 => KeyCode::Digit(1),
            WinitKeyCode::Digit2 => KeyCode::Digit(2),
            WinitKeyCode::Digit3 => KeyCode::Digit(3),
            WinitKeyCode::Digit4 => KeyCode::Digit(4),
            WinitKeyCode::Digit5 => KeyCode::Digit(5),
            WinitKeyCode::Digit6 => KeyCode::Digit(6),
            WinitKeyCode::Digit7 => KeyCode::Digit(7),
            WinitKeyCode::Digit8 => KeyCode::Digit(8),
            WinitKeyCode::Digit9 => KeyCode::Digit(9),

            _ => KeyCode::Other,
        }
    }
}

/// Pointer and keyboard state for one window.
#[derive(Debug, Default)]
pub struct Input {
    pointer: Option<Vec2>,
    pointer_changed: bool,

    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in window pixels, or `None` while it is outside.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// True if the pointer moved, entered or left since the last frame.
    pub fn pointer_changed(&self) -> bool {
        self.pointer_changed
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Keys pressed this frame.
    pub fn pressed(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys_pressed.iter().copied()
    }

    /// Clear per-frame state. Call after the frame's input was acted on.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.pointer_changed = false;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.leave_pointer();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = KeyCode::from(code);
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            _ => {}
        }
    }

    fn move_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
        self.pointer_changed = true;
    }

    fn leave_pointer(&mut self) {
        if self.pointer.take().is_some() {
            self.pointer_changed = true;
        }
    }

    fn press(&mut self, key: KeyCode) {
        // Only fire pressed event if not already held (no repeat)
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_absent_until_moved() {
        let input = Input::new();
        assert!(input.pointer().is_none());
        assert!(!input.pointer_changed());
    }

    #[test]
    fn test_pointer_move_and_leave() {
        let mut input = Input::new();
        input.move_pointer(Vec2::new(12.0, 34.0));
        assert_eq!(input.pointer(), Some(Vec2::new(12.0, 34.0)));
        assert!(input.pointer_changed());

        input.begin_frame();
        assert!(!input.pointer_changed());

        input.leave_pointer();
        assert!(input.pointer().is_none());
        assert!(input.pointer_changed());

        // Leaving twice is not a change
        input.begin_frame();
        input.leave_pointer();
        assert!(!input.pointer_changed());
    }

    #[test]
    fn test_key_state() {
        let mut input = Input::new();

        // Initially nothing pressed
        assert!(!input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        input.press(KeyCode::Space);
        assert!(input.key_held(KeyCode::Space));
        assert!(input.key_pressed(KeyCode::Space));

        // After begin_frame, pressed is cleared but held remains
        input.begin_frame();
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        // Auto-repeat while held does not re-fire
        input.press(KeyCode::Space);
        assert!(!input.key_pressed(KeyCode::Space));

        input.release(KeyCode::Space);
        assert!(!input.key_held(KeyCode::Space));
    }

    #[test]
    fn test_digit_mapping() {
        assert_eq!(KeyCode::from(WinitKeyCode::Digit7), KeyCode::Digit(7));
        assert_eq!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other);
    }
}
