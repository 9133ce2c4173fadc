use winit::event::{ElementState, MouseButton as WinitButton, WindowEvent};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};
use winit::window::Window;

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    PointerButtonEvent, PointerMoveEvent,
};

/// Position reported for a button press before the pointer was ever seen;
/// it lies outside any canvas.
const UNKNOWN_POINTER: (f32, f32) = (-1.0, -1.0);

/// Maps a window event to an [`InputEvent`], or `None` if it is not input.
pub(super) fn input_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::ModifiersChanged(m) => InputEvent::ModifiersChanged(modifiers(m.state())),
        WindowEvent::Focused(f) => InputEvent::Focused(*f),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,

        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f64>(window.scale_factor());
            InputEvent::PointerMoved(PointerMoveEvent {
                x: logical.x as f32,
                y: logical.y as f32,
            })
        }

        WindowEvent::MouseInput { state: pressed, button, .. } => {
            let (x, y) = state.pointer_pos.unwrap_or(UNKNOWN_POINTER);
            InputEvent::PointerButton(PointerButtonEvent {
                button: mouse_button(*button),
                state: match pressed {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                },
                x,
                y,
                modifiers: state.modifiers,
            })
        }

        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(&event.logical_key),
            state: match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            },
            modifiers: state.modifiers,
            repeat: event.repeat,
        },

        _ => return None,
    };
    Some(ev)
}

fn modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn mouse_button(b: WinitButton) -> MouseButton {
    match b {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

/// Layout-aware key mapping: character keys go by the character they type.
fn key(k: &WinitKey) -> Key {
    match k {
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::from_char(c).unwrap_or(Key::Other),
                _ => Key::Other,
            }
        }
        WinitKey::Named(named) => match named {
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Space => Key::Space,
            NamedKey::ArrowUp => Key::ArrowUp,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowRight => Key::ArrowRight,
            NamedKey::Shift => Key::Shift,
            NamedKey::Control => Key::Control,
            NamedKey::Alt => Key::Alt,
            NamedKey::Super => Key::Meta,
            _ => Key::Other,
        },
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn typed_characters_pick_letter_keys() {
        assert_eq!(key(&WinitKey::Character(SmolStr::new("e"))), Key::E);
        assert_eq!(key(&WinitKey::Character(SmolStr::new("T"))), Key::T);
        assert_eq!(key(&WinitKey::Character(SmolStr::new("ß"))), Key::Other);
        assert_eq!(key(&WinitKey::Character(SmolStr::new("ab"))), Key::Other);
    }

    #[test]
    fn named_keys() {
        assert_eq!(key(&WinitKey::Named(NamedKey::Escape)), Key::Escape);
        assert_eq!(key(&WinitKey::Named(NamedKey::F13)), Key::Other);
    }

    #[test]
    fn only_three_buttons_are_distinguished() {
        assert_eq!(mouse_button(WinitButton::Left), MouseButton::Left);
        assert_eq!(mouse_button(WinitButton::Back), MouseButton::Other);
    }
}
