use std::fmt;

/// Bind group / binding of the model transform uniform.
///
/// Vertex shaders compiled through a [`GraphicsContext`] declare it as
///
/// ```wgsl
/// struct ModelTransform { rotation: vec2<f32>, scale: f32, _pad: f32 };
/// @group(0) @binding(0) var<uniform> u_model: ModelTransform;
/// ```
///
/// where `rotation` is `(cos θ, sin θ)`.
pub const MODEL_UNIFORM_BINDING: (u32, u32) = (0, 0);

/// Opaque handle to a compiled program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(pub(crate) u32);

/// Opaque handle to a float vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub(crate) u32);

impl ProgramHandle {
    /// Handle with a caller-chosen id, for `GraphicsContext` implementations
    /// outside this crate.
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl BufferHandle {
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Primitive assembly for a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    /// First vertex shared by every triangle; fills a convex polygon.
    TriangleFan,
    /// Closed outline through every vertex.
    LineLoop,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A program's source was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderCompileError {
    pub stage: ShaderStage,
    pub message: String,
}

impl ShaderCompileError {
    pub fn new(stage: ShaderStage, msg: impl Into<String>) -> Self {
        Self { stage, message: msg.into() }
    }
}

impl fmt::Display for ShaderCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader: {}", self.stage, self.message)
    }
}

impl std::error::Error for ShaderCompileError {}

/// An attribute could not be bound (unknown name, bad layout, no program).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeError {
    pub name: String,
    pub message: String,
}

impl AttributeError {
    pub fn new(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self { name: name.into(), message: msg.into() }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute `{}`: {}", self.name, self.message)
    }
}

impl std::error::Error for AttributeError {}

/// Immediate-mode graphics surface the editor renders through.
///
/// Units: buffer data, strides and offsets are counted in `f32`s; draw
/// `start`/`count` are counted in vertices.
///
/// The model transform is stateful: `set_transform_uniform` composes a
/// relative rotation/scale onto the current one, and only
/// `reset_transform_uniform` returns it to identity.
pub trait GraphicsContext {
    /// Validates and stores a program. The vertex source must provide
    /// `vs_main`, the fragment source `fs_main`.
    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, ShaderCompileError>;

    /// Makes `program` the target of attribute bindings and draws.
    fn use_program(&mut self, program: ProgramHandle);

    fn create_buffer(&mut self) -> BufferHandle;

    /// Replaces the whole contents of `buffer`.
    fn upload_buffer_data(&mut self, buffer: BufferHandle, data: &[f32]);

    /// Binds the current program's input `name` to `components` floats read
    /// from `buffer` every `stride` floats, starting `offset` floats in.
    fn bind_vertex_attribute(
        &mut self,
        buffer: BufferHandle,
        name: &str,
        components: u32,
        stride: u32,
        offset: u32,
    ) -> Result<(), AttributeError>;

    /// Composes a rotation by `angle_delta` degrees and a uniform scale by
    /// `scale_ratio` onto the model transform.
    fn set_transform_uniform(&mut self, angle_delta: f32, scale_ratio: f32);

    fn reset_transform_uniform(&mut self);

    fn draw_primitive(&mut self, kind: PrimitiveKind, start: u32, count: u32);

    /// Starts a new frame: previous draws are discarded, the surface is
    /// cleared to the background color.
    fn clear(&mut self);
}

/// Expands a fan/loop draw into list indices (triangle list / line list),
/// since the GPU backend only has list topologies.
///
/// Degenerate draws (fewer than 3 vertices for a fan, fewer than 2 for a
/// loop) emit nothing.
pub fn expand_indices(kind: PrimitiveKind, start: u32, count: u32, out: &mut Vec<u32>) {
    match kind {
        PrimitiveKind::TriangleFan => {
            if count < 3 {
                return;
            }
            for i in 1..count - 1 {
                out.extend_from_slice(&[start, start + i, start + i + 1]);
            }
        }
        PrimitiveKind::LineLoop => {
            if count < 2 {
                return;
            }
            for i in 0..count {
                out.extend_from_slice(&[start + i, start + (i + 1) % count]);
            }
        }
    }
}

/// Finds the `@location(N)` of a vertex input named `name` in WGSL source.
///
/// Matches declarations of the form `@location(N) name: type`, which is how
/// both struct members and entry-point parameters are written.
pub fn attribute_location(source: &str, name: &str) -> Option<u32> {
    const TAG: &str = "@location(";

    let mut rest = source;
    while let Some(at) = rest.find(TAG) {
        rest = &rest[at + TAG.len()..];

        let Some(close) = rest.find(')') else { break };
        let Ok(location) = rest[..close].trim().parse::<u32>() else { continue };

        let decl = rest[close + 1..].trim_start();
        let ident_len = decl
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(decl.len());
        let (ident, tail) = decl.split_at(ident_len);

        if ident == name && tail.trim_start().starts_with(':') {
            return Some(location);
        }
    }
    None
}
