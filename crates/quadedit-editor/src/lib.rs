//! Quad editor core.
//!
//! Owns the editable geometry and everything that turns it into draw calls:
//!
//! - [`geometry`]: vertex positions/colors and the quad index table
//! - [`mapper`]: pixel ⇄ NDC conversion and the rotate + scale transform
//! - [`buffer`]: interleaved fill + wireframe vertex buffer
//! - [`clock`]: time-driven rotation/pulse animation and its scheduling
//! - [`controller`]: hit testing, dragging and mode transitions
//! - [`driver`]: the [`Editor`] that renders through a
//!   [`GraphicsContext`](quadedit_engine::render::GraphicsContext)
//!
//! Scenes and tuning are loaded from TOML ([`scene`], [`config`]).

pub mod buffer;
pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod driver;
pub mod geometry;
pub mod mapper;
pub mod scene;

mod error;

#[cfg(test)]
mod testing;

pub use clock::{FrameDelta, FrameRequest, FrameScheduler};
pub use command::Command;
pub use config::EditorConfig;
pub use driver::Editor;
pub use error::{InitError, SceneError};
pub use scene::{SceneData, SceneFile};
