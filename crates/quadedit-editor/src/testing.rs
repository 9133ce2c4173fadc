//! Test doubles: a recording graphics context and a manual frame scheduler.

use quadedit_engine::render::{
    AttributeError,
    BufferHandle,
    GraphicsContext,
    PrimitiveKind,
    ProgramHandle,
    ShaderCompileError,
    ShaderStage,
};

use crate::clock::{FrameRequest, FrameScheduler};

/// Scheduler whose requests fire only when a test says so.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    outstanding: Vec<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl ManualScheduler {
    pub fn outstanding(&self) -> &[FrameRequest] {
        &self.outstanding
    }

    pub fn was_cancelled(&self, request: FrameRequest) -> bool {
        self.cancelled.contains(&request)
    }

    /// Removes and returns every outstanding request, as a presented frame
    /// would.
    pub fn take_outstanding(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.outstanding)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let req = FrameRequest(self.next);
        self.outstanding.push(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.outstanding.retain(|r| *r != request);
        self.cancelled.push(request);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Compile,
    UseProgram(ProgramHandle),
    CreateBuffer(BufferHandle),
    Upload { buffer: BufferHandle, len: usize },
    Bind { name: String, components: u32, stride: u32, offset: u32 },
    SetTransform { angle_delta: f32, scale_ratio: f32 },
    ResetTransform,
    Draw { kind: PrimitiveKind, start: u32, count: u32 },
    Clear,
}

/// Records every call; the model transform is tracked as an absolute
/// angle/scale the way a GPU uniform would compose it.
#[derive(Debug)]
pub struct FakeGraphics {
    pub calls: Vec<Call>,
    pub last_upload: Vec<f32>,
    pub angle: f32,
    pub scale: f32,
    pub fail_compile: bool,
    pub attributes: Vec<&'static str>,
    buffers: u32,
}

impl Default for FakeGraphics {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            last_upload: Vec::new(),
            angle: 0.0,
            scale: 1.0,
            fail_compile: false,
            attributes: vec!["a_position", "a_color"],
            buffers: 0,
        }
    }
}

impl FakeGraphics {
    /// A context whose shader compiler rejects every program.
    pub fn failing_compile() -> Self {
        Self { fail_compile: true, ..Self::default() }
    }

    /// A context whose programs only expose the given attributes.
    pub fn with_attributes(attributes: Vec<&'static str>) -> Self {
        Self { attributes, ..Self::default() }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn uploads(&self) -> usize {
        self.count(|c| matches!(c, Call::Upload { .. }))
    }

    /// Draw calls recorded after the most recent `clear`.
    pub fn last_frame_draws(&self) -> Vec<(PrimitiveKind, u32, u32)> {
        let from = self
            .calls
            .iter()
            .rposition(|c| *c == Call::Clear)
            .map_or(0, |i| i + 1);
        self.calls[from..]
            .iter()
            .filter_map(|c| match c {
                Call::Draw { kind, start, count } => Some((*kind, *start, *count)),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsContext for FakeGraphics {
    fn compile_program(
        &mut self,
        vertex_src: &str,
        _fragment_src: &str,
    ) -> Result<ProgramHandle, ShaderCompileError> {
        self.calls.push(Call::Compile);
        if self.fail_compile || vertex_src.is_empty() {
            return Err(ShaderCompileError::new(ShaderStage::Vertex, "rejected by test"));
        }
        Ok(ProgramHandle::from_raw(1))
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(Call::UseProgram(program));
    }

    fn create_buffer(&mut self) -> BufferHandle {
        self.buffers += 1;
        let handle = BufferHandle::from_raw(self.buffers);
        self.calls.push(Call::CreateBuffer(handle));
        handle
    }

    fn upload_buffer_data(&mut self, buffer: BufferHandle, data: &[f32]) {
        self.calls.push(Call::Upload { buffer, len: data.len() });
        self.last_upload = data.to_vec();
    }

    fn bind_vertex_attribute(
        &mut self,
        _buffer: BufferHandle,
        name: &str,
        components: u32,
        stride: u32,
        offset: u32,
    ) -> Result<(), AttributeError> {
        self.calls.push(Call::Bind { name: name.to_string(), components, stride, offset });
        if self.attributes.contains(&name) {
            Ok(())
        } else {
            Err(AttributeError::new(name, "not found"))
        }
    }

    fn set_transform_uniform(&mut self, angle_delta: f32, scale_ratio: f32) {
        self.calls.push(Call::SetTransform { angle_delta, scale_ratio });
        self.angle += angle_delta;
        self.scale *= scale_ratio;
    }

    fn reset_transform_uniform(&mut self) {
        self.calls.push(Call::ResetTransform);
        self.angle = 0.0;
        self.scale = 1.0;
    }

    fn draw_primitive(&mut self, kind: PrimitiveKind, start: u32, count: u32) {
        self.calls.push(Call::Draw { kind, start, count });
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }
}
