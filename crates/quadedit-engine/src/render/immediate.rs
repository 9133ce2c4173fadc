use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};

use crate::coords::ColorRgba;
use crate::render::{RenderCtx, RenderTarget};

use super::gfx::{
    attribute_location, expand_indices, AttributeError, BufferHandle, GraphicsContext,
    PrimitiveKind, ProgramHandle, ShaderCompileError, ShaderStage,
};

/// wgpu-backed [`GraphicsContext`].
///
/// Calls made through the trait only touch CPU state: sources, buffer
/// contents, attribute bindings, the model transform and a list of draws.
/// [`ImmediateRenderer::encode`] turns the latest recorded frame into a render
/// pass; it can run any number of times per recorded frame (e.g. on expose).
///
/// GPU objects are created lazily on first encode and rebuilt when the surface
/// format, current program or attribute layout changes.
pub struct ImmediateRenderer {
    programs: Vec<ProgramSource>,
    current_program: Option<ProgramHandle>,

    buffers: Vec<VertexData>,
    attributes: Vec<AttributeBinding>,
    layout_generation: u64,

    model: ModelTransform,
    clear_color: ColorRgba,

    indices: Vec<u32>,
    batches: Vec<DrawBatch>,
    frames_recorded: u64,

    pipeline_key: Option<PipelineKey>,
    fill_pipeline: Option<wgpu::RenderPipeline>,
    line_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    model_ubo: Option<wgpu::Buffer>,

    index_buffer: Option<wgpu::Buffer>,
    index_capacity: usize,
    indices_dirty: bool,
}

impl Default for ImmediateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateRenderer {
    pub fn new() -> Self {
        Self {
            programs: Vec::new(),
            current_program: None,
            buffers: Vec::new(),
            attributes: Vec::new(),
            layout_generation: 0,
            model: ModelTransform::IDENTITY,
            clear_color: ColorRgba::black(),
            indices: Vec::new(),
            batches: Vec::new(),
            frames_recorded: 0,
            pipeline_key: None,
            fill_pipeline: None,
            line_pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            model_ubo: None,
            index_buffer: None,
            index_capacity: 0,
            indices_dirty: false,
        }
    }

    pub fn with_clear_color(mut self, color: ColorRgba) -> Self {
        self.clear_color = color;
        self
    }

    pub fn clear_color(&self) -> ColorRgba {
        self.clear_color
    }

    /// Number of `clear()` calls so far, i.e. frames recorded.
    pub fn frames_recorded(&self) -> u64 {
        self.frames_recorded
    }

    /// Model rotation (degrees, `[0, 360)`) and scale currently in effect.
    pub fn model_transform(&self) -> (f32, f32) {
        (self.model.angle_deg, self.model.scale)
    }

    /// Index list of the recorded frame, after fan/loop expansion.
    pub fn recorded_indices(&self) -> &[u32] {
        &self.indices
    }

    /// Encodes the recorded frame into `target` on top of its current contents.
    ///
    /// The surface clear itself is owned by the caller (see `FrameCtx::render`)
    /// so an empty frame costs no pass.
    pub fn encode(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.batches.is_empty() {
            return;
        }

        if !self.ensure_pipelines(ctx) {
            return;
        }
        self.ensure_bindings(ctx);
        self.upload_vertex_buffers(ctx);
        self.upload_indices(ctx);
        self.write_model_uniform(ctx);

        // Immutable borrows from here on.
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(index_buffer) = self.index_buffer.as_ref() else { return };
        let Some(fill) = self.fill_pipeline.as_ref() else { return };
        let Some(line) = self.line_pipeline.as_ref() else { return };

        let mut rpass = target.pass("quadedit immediate pass", wgpu::LoadOp::Load);

        rpass.set_bind_group(0, bind_group, &[]);
        for (slot, handle) in self.bound_buffers().enumerate() {
            let Some(gpu) = self.buffers[handle.0 as usize].gpu.as_ref() else { return };
            rpass.set_vertex_buffer(slot as u32, gpu.slice(..));
        }
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for batch in &self.batches {
            let pipeline = match batch.kind {
                PrimitiveKind::TriangleFan => fill,
                PrimitiveKind::LineLoop => line,
            };
            rpass.set_pipeline(pipeline);
            rpass.draw_indexed(batch.first..batch.first + batch.count, 0, 0..1);
        }
    }

    /// Distinct buffers referenced by the current attribute bindings, in slot order.
    fn bound_buffers(&self) -> impl Iterator<Item = BufferHandle> + '_ {
        let mut seen: Vec<BufferHandle> = self.attributes.iter().map(|a| a.buffer).collect();
        seen.sort();
        seen.dedup();
        seen.into_iter()
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) -> bool {
        let Some(program) = self.current_program else {
            log::warn!("draws recorded without a program; frame skipped");
            self.batches.clear();
            return false;
        };

        let key = PipelineKey {
            format: ctx.surface_format,
            program,
            layout_generation: self.layout_generation,
        };
        if self.pipeline_key == Some(key) && self.fill_pipeline.is_some() {
            return true;
        }

        let source = &self.programs[program.0 as usize];
        let vs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadedit vertex shader"),
            source: wgpu::ShaderSource::Wgsl(source.vertex.as_str().into()),
        });
        let fs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadedit fragment shader"),
            source: wgpu::ShaderSource::Wgsl(source.fragment.as_str().into()),
        });

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quadedit model bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ModelUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quadedit pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        // One layout per bound buffer, slots in `bound_buffers` order.
        let groups: Vec<(u64, Vec<wgpu::VertexAttribute>)> = self
            .bound_buffers()
            .map(|handle| {
                let mut stride = 0u64;
                let attrs = self
                    .attributes
                    .iter()
                    .filter(|a| a.buffer == handle)
                    .map(|a| {
                        stride = a.stride_bytes();
                        a.to_wgpu()
                    })
                    .collect();
                (stride, attrs)
            })
            .collect();
        let layouts: Vec<wgpu::VertexBufferLayout<'_>> = groups
            .iter()
            .map(|(stride, attrs)| wgpu::VertexBufferLayout {
                array_stride: *stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let make = |topology: wgpu::PrimitiveTopology, label: &str| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vs,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &layouts,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fs,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Dragged quads may turn inside out; draw both windings.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.fill_pipeline = Some(make(
            wgpu::PrimitiveTopology::TriangleList,
            "quadedit fill pipeline",
        ));
        self.line_pipeline = Some(make(
            wgpu::PrimitiveTopology::LineList,
            "quadedit line pipeline",
        ));
        self.bind_group_layout = Some(bind_group_layout);
        self.pipeline_key = Some(key);

        // Bindings belong to the old layout.
        self.bind_group = None;
        self.model_ubo = None;

        log::debug!(
            "built pipelines for {:?} ({} attribute(s))",
            ctx.surface_format,
            self.attributes.len()
        );
        true
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.model_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let model_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadedit model ubo"),
            size: std::mem::size_of::<ModelUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadedit model bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_ubo.as_entire_binding(),
            }],
        });

        self.model_ubo = Some(model_ubo);
        self.bind_group = Some(bind_group);
    }

    fn upload_vertex_buffers(&mut self, ctx: &RenderCtx<'_>) {
        for buffer in self.buffers.iter_mut().filter(|b| b.dirty) {
            let bytes: &[u8] = bytemuck::cast_slice(&buffer.data);
            if bytes.is_empty() {
                continue;
            }

            if bytes.len() > buffer.capacity || buffer.gpu.is_none() {
                let cap = bytes.len().next_power_of_two().max(256);
                buffer.gpu = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("quadedit vertex buffer"),
                    size: cap as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
                buffer.capacity = cap;
            }

            if let Some(gpu) = buffer.gpu.as_ref() {
                ctx.queue.write_buffer(gpu, 0, bytes);
            }
            buffer.dirty = false;
        }
    }

    fn upload_indices(&mut self, ctx: &RenderCtx<'_>) {
        if !self.indices_dirty && self.index_buffer.is_some() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(&self.indices);
        if bytes.len() > self.index_capacity || self.index_buffer.is_none() {
            let cap = bytes.len().next_power_of_two().max(256);
            self.index_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("quadedit index buffer"),
                size: cap as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }

        if let Some(ibo) = self.index_buffer.as_ref() {
            ctx.queue.write_buffer(ibo, 0, bytes);
        }
        self.indices_dirty = false;
    }

    fn write_model_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.model_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&self.model.to_uniform()));
    }
}

impl GraphicsContext for ImmediateRenderer {
    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, ShaderCompileError> {
        check_entry_point(vertex_src, ShaderStage::Vertex, "@vertex", "vs_main")?;
        check_entry_point(fragment_src, ShaderStage::Fragment, "@fragment", "fs_main")?;

        let handle = ProgramHandle(self.programs.len() as u32);
        self.programs.push(ProgramSource {
            vertex: vertex_src.to_string(),
            fragment: fragment_src.to_string(),
        });
        log::debug!("program {} compiled", handle.0);
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) {
        assert!(
            (program.0 as usize) < self.programs.len(),
            "unknown program handle {}",
            program.0
        );
        if self.current_program != Some(program) {
            self.current_program = Some(program);
            self.attributes.clear();
            self.layout_generation += 1;
        }
    }

    fn create_buffer(&mut self) -> BufferHandle {
        let handle = BufferHandle(self.buffers.len() as u32);
        self.buffers.push(VertexData::default());
        handle
    }

    fn upload_buffer_data(&mut self, buffer: BufferHandle, data: &[f32]) {
        let Some(slot) = self.buffers.get_mut(buffer.0 as usize) else {
            panic!("unknown buffer handle {}", buffer.0);
        };
        slot.data.clear();
        slot.data.extend_from_slice(data);
        slot.dirty = true;
    }

    fn bind_vertex_attribute(
        &mut self,
        buffer: BufferHandle,
        name: &str,
        components: u32,
        stride: u32,
        offset: u32,
    ) -> Result<(), AttributeError> {
        let Some(program) = self.current_program else {
            return Err(AttributeError::new(name, "no program in use"));
        };
        if buffer.0 as usize >= self.buffers.len() {
            return Err(AttributeError::new(name, format!("unknown buffer {}", buffer.0)));
        }
        if !(1..=4).contains(&components) {
            return Err(AttributeError::new(
                name,
                format!("{components} components; expected 1..=4"),
            ));
        }
        if offset + components > stride {
            return Err(AttributeError::new(
                name,
                format!("offset {offset} + {components} components exceeds stride {stride}"),
            ));
        }

        let source = &self.programs[program.0 as usize].vertex;
        let location = attribute_location(source, name)
            .ok_or_else(|| AttributeError::new(name, "not a vertex input of the program"))?;

        if let Some(other) = self
            .attributes
            .iter()
            .find(|a| a.buffer == buffer && a.stride != stride)
        {
            return Err(AttributeError::new(
                name,
                format!(
                    "stride {stride} conflicts with stride {} on the same buffer",
                    other.stride
                ),
            ));
        }

        self.attributes.retain(|a| a.location != location);
        self.attributes.push(AttributeBinding {
            buffer,
            location,
            components,
            stride,
            offset,
        });
        self.layout_generation += 1;
        log::debug!("attribute `{name}` bound at location {location}");
        Ok(())
    }

    fn set_transform_uniform(&mut self, angle_delta: f32, scale_ratio: f32) {
        self.model.compose(angle_delta, scale_ratio);
    }

    fn reset_transform_uniform(&mut self) {
        self.model = ModelTransform::IDENTITY;
    }

    fn draw_primitive(&mut self, kind: PrimitiveKind, start: u32, count: u32) {
        let first = self.indices.len() as u32;
        expand_indices(kind, start, count, &mut self.indices);
        let added = self.indices.len() as u32 - first;
        if added == 0 {
            return;
        }
        self.indices_dirty = true;

        match self.batches.last_mut() {
            Some(last) if last.kind == kind && last.first + last.count == first => {
                last.count += added;
            }
            _ => self.batches.push(DrawBatch { kind, first, count: added }),
        }
    }

    fn clear(&mut self) {
        self.indices.clear();
        self.batches.clear();
        self.indices_dirty = true;
        self.frames_recorded += 1;
    }
}

fn check_entry_point(
    src: &str,
    stage: ShaderStage,
    attribute: &str,
    entry: &str,
) -> Result<(), ShaderCompileError> {
    if src.trim().is_empty() {
        return Err(ShaderCompileError::new(stage, "empty source"));
    }
    if !src.contains(attribute) || !src.contains(&format!("fn {entry}")) {
        return Err(ShaderCompileError::new(
            stage,
            format!("missing `{attribute} fn {entry}` entry point"),
        ));
    }
    Ok(())
}

struct ProgramSource {
    vertex: String,
    fragment: String,
}

#[derive(Default)]
struct VertexData {
    data: Vec<f32>,
    gpu: Option<wgpu::Buffer>,
    capacity: usize,
    dirty: bool,
}

#[derive(Debug, Copy, Clone)]
struct AttributeBinding {
    buffer: BufferHandle,
    location: u32,
    components: u32,
    stride: u32,
    offset: u32,
}

impl AttributeBinding {
    const F32: u64 = std::mem::size_of::<f32>() as u64;

    fn stride_bytes(&self) -> u64 {
        self.stride as u64 * Self::F32
    }

    fn to_wgpu(&self) -> wgpu::VertexAttribute {
        let format = match self.components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        };
        wgpu::VertexAttribute {
            format,
            offset: self.offset as u64 * Self::F32,
            shader_location: self.location,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct PipelineKey {
    format: wgpu::TextureFormat,
    program: ProgramHandle,
    layout_generation: u64,
}

/// A run of consecutive list indices drawn with one pipeline.
#[derive(Debug, Copy, Clone)]
struct DrawBatch {
    kind: PrimitiveKind,
    first: u32,
    count: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct ModelTransform {
    angle_deg: f32,
    scale: f32,
}

impl ModelTransform {
    const IDENTITY: Self = Self { angle_deg: 0.0, scale: 1.0 };

    fn compose(&mut self, angle_delta: f32, scale_ratio: f32) {
        self.angle_deg = (self.angle_deg + angle_delta).rem_euclid(360.0);
        self.scale *= scale_ratio;
    }

    fn to_uniform(self) -> ModelUniform {
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        ModelUniform {
            rotation: [cos, sin],
            scale: self.scale,
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ModelUniform {
    rotation: [f32; 2],
    scale: f32,
    _pad: f32, // 16-byte uniform size
}
