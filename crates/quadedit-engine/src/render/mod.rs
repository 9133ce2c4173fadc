//! GPU rendering subsystem.
//!
//! The editor draws through the [`GraphicsContext`] trait: an immediate-mode
//! surface of programs, float vertex buffers, attribute bindings, a model
//! transform uniform and primitive draws. [`ImmediateRenderer`] implements it
//! on wgpu by recording calls on the CPU and encoding the most recent frame
//! when the window presents.
//!
//! Convention:
//! - vertex positions handed to the context are already in NDC
//! - the model transform (rotate + uniform scale) is applied in the vertex shader

mod ctx;
mod gfx;
mod immediate;

pub use ctx::{RenderCtx, RenderTarget};
pub use gfx::{
    attribute_location, expand_indices, AttributeError, BufferHandle, GraphicsContext,
    PrimitiveKind, ProgramHandle, ShaderCompileError, ShaderStage, MODEL_UNIFORM_BINDING,
};
pub use immediate::ImmediateRenderer;
