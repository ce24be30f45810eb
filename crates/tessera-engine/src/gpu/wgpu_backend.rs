//! wgpu implementation of [`GpuBackend`].
//!
//! Every texture is an RGBA8 texture usable both as a sampling source and as a render
//! target. Programs keep one pipeline per blend config, created on first draw.

use std::collections::HashMap;

use anyhow::{Context, Result};
use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::config::GpuInit;
use crate::coords::{IRect, Vec2i};
use crate::error::GpuError;

use super::backend::clip_copy;
use super::reflect::{reflect_stage, ProgramLayout, StageReflection};
use super::{
    BlendConfig, BufferId, DrawCall, GpuBackend, ProgramId, ShaderId, ShaderStage, TextureId,
    UniformLocation, UniformValue, Vertex,
};

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const MIN_VERTEX_QUADS: usize = 64;
const MIN_INDEX_QUADS: u32 = 256;

struct GpuShader {
    module: wgpu::ShaderModule,
    reflection: StageReflection,
}

struct GpuProgram {
    layout: ProgramLayout,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<BlendConfig, wgpu::RenderPipeline>,
    uniforms: Vec<u8>,
    uniform_buffer: Option<wgpu::Buffer>,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

struct GpuVertexBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    quads: u32,
}

/// Shared `0,1,2, 0,2,3` index pattern for consecutive quads.
#[derive(Default)]
struct QuadIndexBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity: u32,
}

impl QuadIndexBuffer {
    fn ensure(&mut self, device: &wgpu::Device, quads: u32) {
        if quads <= self.capacity && self.buffer.is_some() {
            return;
        }
        let capacity = quads.next_power_of_two().max(MIN_INDEX_QUADS);
        let indices: Vec<u32> = (0..capacity)
            .flat_map(|q| {
                let b = q * 4;
                [b, b + 1, b + 2, b, b + 2, b + 3]
            })
            .collect();
        self.buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera quad ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.capacity = capacity;
    }
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    sampler: wgpu::Sampler,
    /// Bound to texture slots that have nothing valid attached.
    blank: GpuTexture,
    quad_indices: QuadIndexBuffer,

    shaders: HashMap<ShaderId, GpuShader>,
    programs: HashMap<ProgramId, GpuProgram>,
    textures: HashMap<TextureId, GpuTexture>,
    buffers: HashMap<BufferId, GpuVertexBuffer>,
}

impl WgpuBackend {
    /// Creates a headless device.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers on the render
    /// thread drive it with `pollster`.
    pub async fn new(init: &GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("WgpuBackend: using {} ({:?})", info.name, info.backend);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera nearest sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        let blank = new_texture(&device, 1, 1, "tessera blank texture");

        Ok(Self {
            device,
            queue,
            sampler,
            blank,
            quad_indices: QuadIndexBuffer::default(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            buffers: HashMap::new(),
        })
    }

    fn clear_view(&self, view: &wgpu::TextureView) {
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera clear"),
        });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessera clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
    }
}

fn new_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST
            | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { texture, view, width, height }
}

fn copy_info(texture: &wgpu::Texture, at: Vec2i) -> wgpu::TexelCopyTextureInfo<'_> {
    wgpu::TexelCopyTextureInfo {
        texture,
        mip_level: 0,
        origin: wgpu::Origin3d { x: at.x as u32, y: at.y as u32, z: 0 },
        aspect: wgpu::TextureAspect::All,
    }
}

impl GpuProgram {
    fn ensure_pipeline(&mut self, device: &wgpu::Device, blend: BlendConfig) {
        if self.pipelines.contains_key(&blend) {
            return;
        }
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera program pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.vertex,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.fragment,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TEXTURE_FORMAT,
                    blend: Some(blend.to_wgpu()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        self.pipelines.insert(blend, pipeline);
    }
}

impl GpuBackend for WgpuBackend {
    fn create_shader(&mut self, id: ShaderId, stage: ShaderStage, source: &str) -> Result<(), GpuError> {
        // naga validation first so failures come back as diagnostics, not device errors.
        let reflection = reflect_stage(stage, source)?;
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        self.shaders.insert(id, GpuShader { module, reflection });
        Ok(())
    }

    fn delete_shader(&mut self, id: ShaderId) -> bool {
        self.shaders.remove(&id).is_some()
    }

    fn link_program(&mut self, id: ProgramId, vertex: ShaderId, fragment: ShaderId) -> Result<(), GpuError> {
        let vs = self.shaders.get(&vertex).ok_or_else(|| vertex.unknown())?;
        let fs = self.shaders.get(&fragment).ok_or_else(|| fragment.unknown())?;
        let layout = ProgramLayout::link(&vs.reflection, &fs.reflection)?;

        let visibility = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let mut entries = Vec::new();
        if let Some(binding) = layout.uniform_binding() {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
        }
        for binding in layout.texture_bindings() {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding,
                visibility,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
        }
        for binding in layout.sampler_bindings() {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding,
                visibility,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }

        let bind_group_layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera program bgl"),
            entries: &entries,
        });
        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera program pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let uniform_buffer = layout.uniform_binding().map(|_| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("tessera program ubo"),
                size: layout.uniform_size() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let program = GpuProgram {
            uniforms: vec![0; layout.uniform_size() as usize],
            layout,
            vertex: vs.module.clone(),
            fragment: fs.module.clone(),
            bind_group_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
            uniform_buffer,
        };
        self.programs.insert(id, program);
        Ok(())
    }

    fn delete_program(&mut self, id: ProgramId) -> bool {
        self.programs.remove(&id).is_some()
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.layout.location(name)
    }

    fn set_uniform(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        value: &UniformValue,
    ) -> Result<(), GpuError> {
        let p = self.programs.get_mut(&program).ok_or_else(|| program.unknown())?;
        p.layout.encode(location, value, &mut p.uniforms)
    }

    fn create_texture(&mut self, id: TextureId, width: u32, height: u32) -> Result<(), GpuError> {
        if width == 0 || height == 0 {
            log::warn!("WgpuBackend: texture {id:?} has zero size; allocating 1x1");
        }
        let texture = new_texture(&self.device, width, height, "tessera texture");
        self.clear_view(&texture.view);
        self.textures.insert(id, texture);
        Ok(())
    }

    fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&id).map(|t| (t.width, t.height))
    }

    fn write_texture(&mut self, id: TextureId, x: u32, y: u32, image: &RgbaImage) -> Result<(), GpuError> {
        let tex = self.textures.get(&id).ok_or_else(|| id.unknown())?;
        let (iw, ih) = image.dimensions();
        let Some((src, dst)) = clip_copy(
            (iw, ih),
            IRect::new(0, 0, iw as i32, ih as i32),
            (tex.width, tex.height),
            Vec2i::new(x as i32, y as i32),
        ) else {
            return Ok(());
        };

        let cropped;
        let data: &RgbaImage = if src == IRect::new(0, 0, iw as i32, ih as i32) {
            image
        } else {
            cropped = image::imageops::crop_imm(
                image,
                src.x as u32,
                src.y as u32,
                src.width as u32,
                src.height as u32,
            )
            .to_image();
            &cropped
        };

        let (w, h) = data.dimensions();
        self.queue.write_texture(
            copy_info(&tex.texture, dst),
            data.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
        Ok(())
    }

    fn clear_texture(&mut self, id: TextureId) -> Result<(), GpuError> {
        let tex = self.textures.get(&id).ok_or_else(|| id.unknown())?;
        self.clear_view(&tex.view);
        Ok(())
    }

    fn copy_texture(
        &mut self,
        src: TextureId,
        src_rect: IRect,
        dst: TextureId,
        dst_origin: Vec2i,
    ) -> Result<(), GpuError> {
        let s = self.textures.get(&src).ok_or_else(|| src.unknown())?;
        let d = self.textures.get(&dst).ok_or_else(|| dst.unknown())?;
        let Some((rect, origin)) =
            clip_copy((s.width, s.height), src_rect, (d.width, d.height), dst_origin)
        else {
            return Ok(());
        };
        let extent = wgpu::Extent3d {
            width: rect.width as u32,
            height: rect.height as u32,
            depth_or_array_layers: 1,
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera copy"),
        });
        if src == dst {
            // Same-texture copies go through a scratch texture.
            let scratch = new_texture(&self.device, extent.width, extent.height, "tessera copy scratch");
            encoder.copy_texture_to_texture(
                copy_info(&s.texture, rect.position()),
                copy_info(&scratch.texture, Vec2i::new(0, 0)),
                extent,
            );
            encoder.copy_texture_to_texture(
                copy_info(&scratch.texture, Vec2i::new(0, 0)),
                copy_info(&d.texture, origin),
                extent,
            );
        } else {
            encoder.copy_texture_to_texture(
                copy_info(&s.texture, rect.position()),
                copy_info(&d.texture, origin),
                extent,
            );
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) -> bool {
        self.textures.remove(&id).is_some()
    }

    fn write_vertices(&mut self, id: BufferId, vertices: &[Vertex]) -> Result<(), GpuError> {
        let quads = vertices.len() / 4;
        let fits = self.buffers.get(&id).is_some_and(|b| b.capacity >= quads);
        if !fits {
            let capacity = quads.next_power_of_two().max(MIN_VERTEX_QUADS);
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("tessera quad vbo"),
                size: (capacity * 4 * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.buffers.insert(id, GpuVertexBuffer { buffer, capacity, quads: 0 });
        }

        let Some(entry) = self.buffers.get_mut(&id) else {
            return Err(id.unknown());
        };
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&entry.buffer, 0, bytemuck::cast_slice(&vertices[..quads * 4]));
        }
        entry.quads = quads as u32;
        Ok(())
    }

    fn delete_buffer(&mut self, id: BufferId) -> bool {
        self.buffers.remove(&id).is_some()
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), GpuError> {
        if call.quad_count == 0 {
            return Ok(());
        }
        let end = call.first_quad + call.quad_count;

        let buffer = self.buffers.get(&call.vertices).ok_or_else(|| call.vertices.unknown())?;
        if end > buffer.quads {
            return Err(GpuError::Device(format!(
                "draw of quads {}..{end} overruns a buffer of {}",
                call.first_quad, buffer.quads
            )));
        }
        let target = self.textures.get(&call.target).ok_or_else(|| call.target.unknown())?;
        let Some(viewport) =
            call.viewport.intersect(IRect::new(0, 0, target.width as i32, target.height as i32))
        else {
            return Ok(());
        };

        self.quad_indices.ensure(&self.device, end);
        let Some(indices) = self.quad_indices.buffer.as_ref() else {
            return Err(GpuError::Device("quad index buffer missing".to_owned()));
        };

        let program = self.programs.get_mut(&call.program).ok_or_else(|| call.program.unknown())?;
        program.ensure_pipeline(&self.device, call.blend);
        let program = &*program;
        let Some(pipeline) = program.pipelines.get(&call.blend) else {
            return Err(GpuError::Device("pipeline missing after creation".to_owned()));
        };

        let mut entries = Vec::new();
        if let (Some(binding), Some(ubo)) = (program.layout.uniform_binding(), &program.uniform_buffer) {
            self.queue.write_buffer(ubo, 0, &program.uniforms);
            entries.push(wgpu::BindGroupEntry { binding, resource: ubo.as_entire_binding() });
        }
        for binding in program.layout.texture_bindings() {
            let bound = call
                .textures
                .iter()
                .find(|t| program.layout.texture_binding(t.location) == Some(binding));
            let view = match bound {
                Some(t) if t.texture == call.target => {
                    log::warn!("WgpuBackend: texture {:?} is also the render target; unbinding", t.texture);
                    &self.blank.view
                }
                Some(t) => self.textures.get(&t.texture).map_or(&self.blank.view, |tex| &tex.view),
                None => &self.blank.view,
            };
            entries.push(wgpu::BindGroupEntry { binding, resource: wgpu::BindingResource::TextureView(view) });
        }
        for binding in program.layout.sampler_bindings() {
            entries.push(wgpu::BindGroupEntry { binding, resource: wgpu::BindingResource::Sampler(&self.sampler) });
        }
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera draw bind group"),
            layout: &program.bind_group_layout,
            entries: &entries,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera draw"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessera draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, buffer.buffer.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(call.first_quad * 6..end * 6, 0, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}
