//! Backend-independent input.
//!
//! The runtime translates window events into [`InputEvent`]s, folds each into
//! the window's [`InputState`], and forwards the ones that changed something.

mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent, UnknownKeyName,
};
