//! Editor tuning, read from the optional `[editor]` table of a scene file.
//!
//! ```toml
//! [editor]
//! drag_radius = 10.0
//!
//! [editor.animation]
//! angle_step = 45.0   # degrees per second
//! size_step = 0.2     # scale units per second
//! min_size = 0.2
//! max_size = 1.0
//!
//! [editor.initial]
//! edit = true
//! wireframe = true
//! animate = false
//!
//! [editor.keys]
//! toggle-edit = "E"
//! ```

use std::collections::BTreeMap;

use quadedit_engine::input::Key;
use serde::Deserialize;

use crate::command::Command;
use crate::error::SceneError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Pick radius around a vertex, in pixels. The boundary is exclusive.
    pub drag_radius: f32,
    pub animation: AnimationConfig,
    pub initial: InitialModes,
    pub keys: KeyBindings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_radius: 10.0,
            animation: AnimationConfig::default(),
            initial: InitialModes::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.drag_radius.is_finite() && self.drag_radius > 0.0) {
            return Err(SceneError::Config(format!(
                "drag_radius must be positive, got {}",
                self.drag_radius
            )));
        }
        if self.initial.edit && self.initial.animate {
            return Err(SceneError::Config(
                "initial edit and animate modes are mutually exclusive".into(),
            ));
        }
        self.animation.validate()
    }
}

/// Transform clock rates and size bounds.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Degrees per second.
    pub angle_step: f32,
    /// Size change per second.
    pub size_step: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            angle_step: 45.0,
            size_step: 0.2,
            min_size: 0.2,
            max_size: 1.0,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        let finite = [self.angle_step, self.size_step, self.min_size, self.max_size]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(SceneError::Config("animation values must be finite".into()));
        }
        if self.size_step < 0.0 {
            return Err(SceneError::Config("animation.size_step must not be negative".into()));
        }
        if !(self.min_size > 0.0 && self.min_size < self.max_size) {
            return Err(SceneError::Config(format!(
                "animation size bounds must satisfy 0 < min < max, got [{}, {}]",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}

/// Mode flags at startup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialModes {
    pub edit: bool,
    pub wireframe: bool,
    pub animate: bool,
}

impl Default for InitialModes {
    fn default() -> Self {
        Self { edit: true, wireframe: true, animate: false }
    }
}

/// Key → command table.
///
/// Deserialized from a `command-name = "key"` map; commands left out keep
/// their default key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct KeyBindings {
    bindings: Vec<(Key, Command)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (Key::E, Command::ToggleEdit),
                (Key::B, Command::ToggleWireframe),
                (Key::T, Command::ToggleAnimate),
            ],
        }
    }
}

impl KeyBindings {
    pub fn command_for(&self, key: Key) -> Option<Command> {
        self.bindings.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
    }

    pub fn key_for(&self, command: Command) -> Option<Key> {
        self.bindings.iter().find(|(_, c)| *c == command).map(|(k, _)| *k)
    }

    /// Binds `key` to `command`, replacing the command's previous key.
    pub fn bind(&mut self, key: Key, command: Command) {
        self.bindings.retain(|(_, c)| *c != command);
        self.bindings.push((key, command));
    }
}

impl TryFrom<BTreeMap<String, String>> for KeyBindings {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut keys = KeyBindings::default();
        for (command, key) in map {
            let command: Command = command.parse().map_err(|e| format!("{e}"))?;
            let key: Key = key.parse().map_err(|e| format!("{e}"))?;
            if key == Key::Escape {
                return Err("Escape is reserved for quitting".into());
            }
            keys.bind(key, command);
        }

        for (i, (key, _)) in keys.bindings.iter().enumerate() {
            if keys.bindings[..i].iter().any(|(k, _)| k == key) {
                return Err(format!("key {key:?} is bound to more than one command"));
            }
        }
        Ok(keys)
    }
}
