//! wgpu device and window surface.
//!
//! One [`Gpu`] per window: it owns the device/queue, keeps the surface
//! configured, and hands out [`GpuFrame`]s to record into.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
