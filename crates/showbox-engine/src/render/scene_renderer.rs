use fontdue::layout::{CoordinateSystem, Layout};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, TextCmd};
use crate::text::FontSystem;

use super::batch::{self, BatchList, Pipeline};
use super::common::{
    logical_clip_to_scissor, premul_alpha_blend, GlyphInstance, QuadVertex, ShapeInstance,
    ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};
use super::glyph_atlas::GlyphAtlas;

/// Growable instance buffer; reallocated at the next power of two.
struct InstanceBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

impl InstanceBuffer {
    const fn new(label: &'static str) -> Self {
        Self { label, buffer: None, capacity: 0 }
    }

    fn upload<T: bytemuck::Pod>(&mut self, ctx: &RenderCtx<'_>, data: &[T]) {
        if data.is_empty() {
            return;
        }
        if self.buffer.is_none() || data.len() > self.capacity {
            let cap = data.len().next_power_of_two().max(64);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (cap * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = cap;
        }
        if let Some(buffer) = &self.buffer {
            ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
        }
    }
}

struct Pipelines {
    format: wgpu::TextureFormat,
    shapes: wgpu::RenderPipeline,
    glyphs: wgpu::RenderPipeline,
}

struct Bindings {
    viewport_ubo: wgpu::Buffer,
    viewport_group: wgpu::BindGroup,
    atlas_group: wgpu::BindGroup,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
}

/// Draws a [`DrawList`] in one render pass.
///
/// Rects and circles share an SDF pipeline; text goes through a glyph-atlas
/// pipeline. Commands are walked in paint order and consecutive commands of
/// the same kind under the same clip are drawn as one instanced batch, so
/// text drawn over a rect stays on top of it.
pub struct SceneRenderer {
    viewport_bgl: Option<wgpu::BindGroupLayout>,
    atlas_bgl: Option<wgpu::BindGroupLayout>,
    pipelines: Option<Pipelines>,
    bindings: Option<Bindings>,
    atlas: Option<GlyphAtlas>,

    shape_vbo: InstanceBuffer,
    glyph_vbo: InstanceBuffer,

    // per-frame scratch, kept for its capacity
    shapes: Vec<ShapeInstance>,
    glyphs: Vec<GlyphInstance>,
    batches: BatchList,
    layout: Layout<()>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self {
            viewport_bgl: None,
            atlas_bgl: None,
            pipelines: None,
            bindings: None,
            atlas: None,
            shape_vbo: InstanceBuffer::new("showbox shape instances"),
            glyph_vbo: InstanceBuffer::new("showbox glyph instances"),
            shapes: Vec::new(),
            glyphs: Vec::new(),
            batches: BatchList::default(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &DrawList,
        fonts: &FontSystem,
    ) {
        self.ensure_layouts(ctx);
        self.ensure_pipelines(ctx);
        self.ensure_bindings(ctx);

        self.shapes.clear();
        self.glyphs.clear();
        self.batches.clear();

        for item in draw_list.items() {
            match &item.cmd {
                DrawCmd::Text(cmd) => {
                    let start = self.glyphs.len() as u32;
                    self.push_glyphs(ctx, cmd, fonts);
                    let end = self.glyphs.len() as u32;
                    self.batches.push(Pipeline::Glyphs, item.clip_rect, start..end);
                }
                cmd => {
                    let Some(inst) = batch::shape_instance(cmd) else { continue };
                    let start = self.shapes.len() as u32;
                    self.shapes.push(inst);
                    self.batches.push(Pipeline::Shapes, item.clip_rect, start..start + 1);
                }
            }
        }

        if self.batches.is_empty() {
            return;
        }

        self.shape_vbo.upload(ctx, &self.shapes);
        self.glyph_vbo.upload(ctx, &self.glyphs);

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(bindings) = self.bindings.as_ref() else { return };
        ctx.queue.write_buffer(
            &bindings.viewport_ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)),
        );

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("showbox scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &bindings.viewport_group, &[]);
        rpass.set_vertex_buffer(0, bindings.quad_vbo.slice(..));
        rpass.set_index_buffer(bindings.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        let mut bound: Option<Pipeline> = None;
        for b in self.batches.batches() {
            let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(b.clip, ctx.viewport, ctx.scale_factor)
            else {
                continue;
            };

            if bound != Some(b.pipeline) {
                let (pipeline, instances) = match b.pipeline {
                    Pipeline::Shapes => (&pipelines.shapes, &self.shape_vbo),
                    Pipeline::Glyphs => (&pipelines.glyphs, &self.glyph_vbo),
                };
                let Some(instances) = instances.buffer.as_ref() else { continue };
                rpass.set_pipeline(pipeline);
                if b.pipeline == Pipeline::Glyphs {
                    rpass.set_bind_group(1, &bindings.atlas_group, &[]);
                }
                rpass.set_vertex_buffer(1, instances.slice(..));
                bound = Some(b.pipeline);
            }

            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw_indexed(0..6, 0, b.instances.clone());
        }
    }

    /// Lays out `cmd` and appends one glyph instance per visible glyph.
    fn push_glyphs(&mut self, ctx: &RenderCtx<'_>, cmd: &TextCmd, fonts: &FontSystem) {
        let Self { layout, atlas, glyphs, .. } = self;
        let Some(atlas) = atlas.as_mut() else { return };
        let Some(font) = fonts.get(cmd.font) else {
            log::warn!("unknown font {:?}; text skipped", cmd.font);
            return;
        };
        if !fonts.layout(layout, &cmd.text, cmd.font, cmd.size) {
            return;
        }

        let color = cmd.color.to_array();
        for g in layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }
            let Some(cached) = atlas.glyph(ctx.queue, font, g.key) else { continue };
            let x = cmd.origin.x + g.x;
            let y = cmd.origin.y + g.y;
            glyphs.push(GlyphInstance {
                dst_min: [x, y],
                dst_max: [x + g.width as f32, y + g.height as f32],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bgl.is_some() && self.atlas_bgl.is_some() {
            return;
        }

        self.viewport_bgl = Some(ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("showbox viewport bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: ViewportUniform::min_binding_size(),
                    },
                    count: None,
                }],
            },
        ));

        self.atlas_bgl = Some(ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("showbox atlas bgl"),
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
            },
        ));
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipelines.as_ref().is_some_and(|p| p.format == ctx.surface_format) {
            return;
        }
        let (Some(viewport_bgl), Some(atlas_bgl)) = (&self.viewport_bgl, &self.atlas_bgl) else {
            return;
        };

        let shapes = build_pipeline(
            ctx,
            "showbox shape",
            include_str!("shaders/shape.wgsl"),
            &[viewport_bgl],
            ShapeInstance::layout(),
        );
        let glyphs = build_pipeline(
            ctx,
            "showbox text",
            include_str!("shaders/text.wgsl"),
            &[viewport_bgl, atlas_bgl],
            GlyphInstance::layout(),
        );

        log::debug!("scene pipelines built for {:?}", ctx.surface_format);
        self.pipelines = Some(Pipelines { format: ctx.surface_format, shapes, glyphs });
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bindings.is_some() {
            return;
        }
        let (Some(viewport_bgl), Some(atlas_bgl)) = (&self.viewport_bgl, &self.atlas_bgl) else {
            return;
        };

        let atlas = self.atlas.get_or_insert_with(|| GlyphAtlas::new(ctx.device));

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("showbox atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("showbox viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("showbox viewport bind group"),
            layout: viewport_bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() }],
        });

        let atlas_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("showbox atlas bind group"),
            layout: atlas_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(atlas.view()),
                },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("showbox quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("showbox quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.bindings = Some(Bindings { viewport_ubo, viewport_group, atlas_group, quad_vbo, quad_ibo });
    }
}

fn build_pipeline(
    ctx: &RenderCtx<'_>,
    label: &str,
    source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    instance_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
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
    })
}
