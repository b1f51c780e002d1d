use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};

use crate::batch::SpriteVertex;

use super::device::{
    BufferKind, DeviceError, FrameUniforms, GraphicsDevice, Sampling, Texture, TextureId,
    TextureRegistry,
};
use super::RenderCtx;

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform block layout (80 bytes):
///
///  offset  0  view_proj   mat4x4<f32>  column-major
///  offset 64  monochrome  f32
///  offset 68  _pad        16-byte struct alignment
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniformBlock {
    view_proj: [f32; 16],
    monochrome: f32,
    _pad: [f32; 3],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

struct GpuTexture {
    _texture: wgpu::Texture,
    width: u32,
    height: u32,
    point: wgpu::BindGroup,
    linear: wgpu::BindGroup,
}

impl GpuTexture {
    fn bind_group(&self, sampling: Sampling) -> &wgpu::BindGroup {
        match sampling {
            Sampling::Point => &self.point,
            Sampling::Linear => &self.linear,
        }
    }
}

struct PendingDraw {
    texture: TextureId,
    first_index: u32,
    index_count: u32,
}

// ── device ────────────────────────────────────────────────────────────────

/// wgpu implementation of [`GraphicsDevice`].
///
/// Owns the sprite pipeline, one sampler per [`Sampling`] mode, a bind group
/// per texture and sampling mode, and the dynamic vertex/index buffers.
///
/// Every `end_submission` records its own encoder and render pass (loading the
/// existing target contents) and submits it, so several flushes per frame
/// compose in order. Set the frame's color view with [`set_target`](Self::set_target)
/// before flushing; without a target, submissions are discarded.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,

    pipeline: wgpu::RenderPipeline,
    texture_bgl: wgpu::BindGroupLayout,
    frame_ubo: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    point_sampler: wgpu::Sampler,
    linear_sampler: wgpu::Sampler,

    // Slot `i` holds texture id `i + 1`; destroyed slots stay `None`.
    textures: Vec<Option<GpuTexture>>,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: u64,
    index_buffer: Option<wgpu::Buffer>,
    index_capacity: u64,

    target: Option<wgpu::TextureView>,
    sampling: Sampling,
    draws: Vec<PendingDraw>,
    open: bool,
}

impl WgpuDevice {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadra sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadra frame bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<FrameUniformBlock>() as u64)
                            .expect("FrameUniformBlock has non-zero size by construction"),
                    ),
                },
                count: None,
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadra texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadra sprite pipeline layout"),
            bind_group_layouts: &[&frame_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadra sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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

        let frame_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadra frame ubo"),
            size: std::mem::size_of::<FrameUniformBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadra frame bind group"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        let point_sampler = create_sampler(device, wgpu::FilterMode::Nearest, "quadra point sampler");
        let linear_sampler = create_sampler(device, wgpu::FilterMode::Linear, "quadra linear sampler");

        log::debug!("wgpu device: sprite pipeline ready for {:?}", ctx.surface_format);

        Self {
            device: device.clone(),
            queue: ctx.queue.clone(),
            surface_format: ctx.surface_format,
            pipeline,
            texture_bgl,
            frame_ubo,
            frame_bind_group,
            point_sampler,
            linear_sampler,
            textures: Vec::new(),
            vertex_buffer: None,
            vertex_capacity: 0,
            index_buffer: None,
            index_capacity: 0,
            target: None,
            sampling: Sampling::default(),
            draws: Vec::new(),
            open: false,
        }
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Color view the next submissions render into.
    pub fn set_target(&mut self, view: Option<wgpu::TextureView>) {
        self.target = view;
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Uploads tightly packed RGBA8 pixels (sRGB) and returns a handle.
    pub fn create_texture_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Texture> {
        anyhow::ensure!(width > 0 && height > 0, "texture has zero size ({width}x{height})");

        let max_dim = self.device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max_dim && height <= max_dim,
            "texture {width}x{height} exceeds device limit {max_dim}"
        );

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .context("texture byte size overflows usize")?;
        anyhow::ensure!(
            rgba.len() == expected,
            "texture {width}x{height} expects {expected} bytes, got {}",
            rgba.len()
        );

        let slot = self.textures.len();
        let raw = u32::try_from(slot + 1).context("texture handle space exhausted")?;

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadra sprite texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let point = self.texture_bind_group(&view, &self.point_sampler);
        let linear = self.texture_bind_group(&view, &self.linear_sampler);

        self.textures.push(Some(GpuTexture { _texture: texture, width, height, point, linear }));

        let id = TextureId::from_raw(raw);
        log::debug!("wgpu device: texture {} created ({width}x{height})", id.raw());
        Ok(Texture { id, width, height })
    }

    /// Releases a texture. Later draws that reference it are dropped by the batch.
    pub fn destroy_texture(&mut self, id: TextureId) {
        if let Some(slot) = self.slot_mut(id) {
            *slot = None;
            log::debug!("wgpu device: texture {} destroyed", id.raw());
        }
    }

    /// Size of a live texture.
    pub fn texture(&self, id: TextureId) -> Option<Texture> {
        self.gpu_texture(id).map(|t| Texture { id, width: t.width, height: t.height })
    }

    // ── internal ──────────────────────────────────────────────────────────

    fn texture_bind_group(&self, view: &wgpu::TextureView, sampler: &wgpu::Sampler) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadra texture bind group"),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn gpu_texture(&self, id: TextureId) -> Option<&GpuTexture> {
        let slot = (id.raw() as usize).checked_sub(1)?;
        self.textures.get(slot)?.as_ref()
    }

    fn slot_mut(&mut self, id: TextureId) -> Option<&mut Option<GpuTexture>> {
        let slot = (id.raw() as usize).checked_sub(1)?;
        self.textures.get_mut(slot)
    }
}

impl TextureRegistry for WgpuDevice {
    fn texture_valid(&self, texture: TextureId) -> bool {
        self.gpu_texture(texture).is_some()
    }
}

impl GraphicsDevice for WgpuDevice {
    fn create_or_grow_buffer(&mut self, kind: BufferKind, size_bytes: u64) -> Result<(), DeviceError> {
        let (buffer, capacity) = match kind {
            BufferKind::Vertex => (&mut self.vertex_buffer, &mut self.vertex_capacity),
            BufferKind::Index => (&mut self.index_buffer, &mut self.index_capacity),
        };
        if buffer.is_some() && size_bytes <= *capacity {
            return Ok(());
        }

        let limit = self.device.limits().max_buffer_size;
        let size = size_bytes.max(64).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        if size > limit {
            log::warn!("wgpu device: {kind:?} buffer of {size} bytes exceeds limit {limit}");
            return Err(DeviceError::CapacityExceeded { kind, requested: size, limit });
        }

        let (label, usage) = match kind {
            BufferKind::Vertex => ("quadra sprite vbo", wgpu::BufferUsages::VERTEX),
            BufferKind::Index => ("quadra sprite ibo", wgpu::BufferUsages::INDEX),
        };
        *buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        *capacity = size;
        Ok(())
    }

    fn begin_submission(&mut self, uniforms: &FrameUniforms) {
        let block = FrameUniformBlock {
            view_proj: uniforms.view_proj.to_cols_array(),
            monochrome: uniforms.monochrome,
            _pad: [0.0; 3],
        };
        self.queue.write_buffer(&self.frame_ubo, 0, bytemuck::bytes_of(&block));
        self.sampling = uniforms.sampling;
        self.draws.clear();
        self.open = true;
    }

    fn upload_dynamic(&mut self, kind: BufferKind, bytes: &[u8]) {
        let buffer = match kind {
            BufferKind::Vertex => self.vertex_buffer.as_ref(),
            BufferKind::Index => self.index_buffer.as_ref(),
        };
        let Some(buffer) = buffer else {
            log::warn!("wgpu device: {kind:?} upload before allocation ignored");
            return;
        };
        self.queue.write_buffer(buffer, 0, bytes);
    }

    fn draw_indexed(&mut self, texture: TextureId, first_index: u32, index_count: u32) {
        if !self.open {
            log::warn!("wgpu device: draw outside a submission ignored");
            return;
        }
        self.draws.push(PendingDraw { texture, first_index, index_count });
    }

    fn end_submission(&mut self) {
        if !std::mem::take(&mut self.open) || self.draws.is_empty() {
            return;
        }
        let Some(target) = self.target.as_ref() else {
            log::warn!("wgpu device: no target set; {} draw(s) discarded", self.draws.len());
            self.draws.clear();
            return;
        };
        let Some(vbo) = self.vertex_buffer.as_ref() else { return };
        let Some(ibo) = self.index_buffer.as_ref() else { return };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quadra sprite encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadra sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
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

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.draws {
                let Some(tex) = self.gpu_texture(draw.texture) else { continue };
                rpass.set_bind_group(1, tex.bind_group(self.sampling), &[]);
                rpass.draw_indexed(draw.first_index..draw.first_index + draw.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        log::trace!("wgpu device: submitted {} draw(s)", self.draws.len());
        self.draws.clear();
    }
}

fn create_sampler(device: &wgpu::Device, filter: wgpu::FilterMode, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}
