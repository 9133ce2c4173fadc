//! Platform loop.
//!
//! Opens the editor window on a winit event loop, binds a [`Gpu`] surface to
//! it, and feeds the app translated input and redraw callbacks.
//!
//! [`Gpu`]: crate::device::Gpu

mod runtime;
mod translate;

pub use runtime::{Runtime, RuntimeConfig};
