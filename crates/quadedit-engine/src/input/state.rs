use std::collections::HashSet;

use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// What is currently held and where the pointer is, for one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Logical pixels; `None` until the pointer enters the window or after it
    /// leaves.
    pub pointer_pos: Option<(f32, f32)>,
    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the state.
    ///
    /// Returns `false` when the event is redundant and should not reach the
    /// app: a release of something that was never pressed (e.g. pressed
    /// before the window gained focus).
    pub fn apply_event(&mut self, ev: &InputEvent) -> bool {
        match *ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.pointer_pos = Some((x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, repeat } => {
                self.modifiers = modifiers;
                return match state {
                    KeyState::Pressed => self.keys_down.insert(key) || repeat,
                    KeyState::Released => self.keys_down.remove(&key),
                };
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.modifiers = modifiers;
                self.pointer_pos = Some((x, y));
                return match state {
                    MouseButtonState::Pressed => self.buttons_down.insert(button),
                    MouseButtonState::Released => self.buttons_down.remove(&button),
                };
            }
        }
        true
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
