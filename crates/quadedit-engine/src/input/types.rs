use std::fmt;
use std::str::FromStr;

/// A key, as produced by the active keyboard layout.
///
/// Letters and digits are layout-aware: pressing the key labelled `E`
/// yields [`Key::E`] whatever its physical position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Anything else.
    Other,
}

impl Key {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];

    const DIGITS: [Key; 10] = [
        Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
        Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
    ];

    /// Letter (either case) or digit key for a typed character.
    pub fn from_char(c: char) -> Option<Key> {
        if c.is_ascii_alphabetic() {
            Some(Self::LETTERS[(c.to_ascii_uppercase() as u8 - b'A') as usize])
        } else {
            c.to_digit(10).map(|d| Self::DIGITS[d as usize])
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(i) = Self::DIGITS.iter().position(|k| k == self) {
            return write!(f, "{i}");
        }
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyName(pub String);

impl fmt::Display for UnknownKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name `{}`", self.0)
    }
}

impl std::error::Error for UnknownKeyName {}

impl FromStr for Key {
    type Err = UnknownKeyName;

    /// Single characters (`"e"`, `"E"`, `"7"`) or named keys
    /// (`"Escape"`, `"space"`, ...), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(key) = Key::from_char(c) {
                return Ok(key);
            }
        }
        let key = match s.to_ascii_lowercase().as_str() {
            "escape" | "esc" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "space" => Key::Space,
            "up" => Key::ArrowUp,
            "down" => Key::ArrowDown,
            "left" => Key::ArrowLeft,
            "right" => Key::ArrowRight,
            _ => return Err(UnknownKeyName(s.to_string())),
        };
        Ok(key)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer position in logical pixels, origin at the window's top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Button press/release at the pointer's last known position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Input delivered to the app, independent of the windowing backend.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Auto-repeat of a held key.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),
    PointerLeft,

    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_map_to_keys() {
        assert_eq!(Key::from_char('e'), Some(Key::E));
        assert_eq!(Key::from_char('Z'), Some(Key::Z));
        assert_eq!(Key::from_char('7'), Some(Key::Digit7));
        assert_eq!(Key::from_char('é'), None);
        assert_eq!(Key::from_char('-'), None);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("t".parse::<Key>(), Ok(Key::T));
        assert_eq!("ESC".parse::<Key>(), Ok(Key::Escape));
        assert_eq!("Space".parse::<Key>(), Ok(Key::Space));
        assert_eq!("3".parse::<Key>(), Ok(Key::Digit3));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!("F13".parse::<Key>(), Err(UnknownKeyName("F13".into())));
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn display_uses_labels() {
        assert_eq!(Key::E.to_string(), "E");
        assert_eq!(Key::Digit4.to_string(), "4");
        assert_eq!(Key::Escape.to_string(), "Escape");
    }
}
