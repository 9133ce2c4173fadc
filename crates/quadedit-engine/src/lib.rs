//! Platform and GPU layer for quadedit.
//!
//! - [`window`]: winit event loop and the single editor window
//! - [`device`]: wgpu device/surface per window
//! - [`core`]: the [`App`](core::App) contract the runtime drives
//! - [`input`], [`time`]: backend-independent input events and frame clocks
//! - [`render`]: the [`GraphicsContext`](render::GraphicsContext) the editor
//!   draws through and its wgpu implementation
//! - [`coords`], [`logging`]: shared pixel-space types and logger setup

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
