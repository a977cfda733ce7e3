//! Stripe fill pass: every band becomes two colored triangles in NDC.

use bytemuck::{Pod, Zeroable};
use wgpu::{
    BlendState, BufferUsages, ColorTargetState, ColorWrites, CommandEncoder, Device,
    FragmentState, LoadOp, Operations, PipelineLayoutDescriptor, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor, ShaderModuleDescriptor,
    ShaderSource, StoreOp, TextureFormat, TextureView, VertexBufferLayout, VertexState,
    VertexStepMode, util::DeviceExt,
};

use corelib::{
    Color,
    stripes::{Rect, StripePattern},
};

use crate::to_wgpu_color;

/// Vertex: NDC position + color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FillVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl FillVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<FillVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4],
    };
}

/// Corners of a pixel rect in NDC: `[top-left, top-right, bottom-left, bottom-right]`.
/// Pixel row 0 is the top of the target (NDC y = +1).
pub fn rect_to_ndc(rect: Rect, width: u32, height: u32) -> [[f32; 2]; 4] {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    let x0 = rect.x0 as f32 / w * 2.0 - 1.0;
    let x1 = rect.x1 as f32 / w * 2.0 - 1.0;
    let y0 = 1.0 - rect.y0 as f32 / h * 2.0;
    let y1 = 1.0 - rect.y1 as f32 / h * 2.0;
    [[x0, y0], [x1, y0], [x0, y1], [x1, y1]]
}

/// Triangle list for all bands of `pattern` on a `width x height` target.
pub fn stripe_vertices(pattern: &StripePattern, width: u32, height: u32) -> Vec<FillVertex> {
    let mut out = Vec::with_capacity(pattern.band_count(width) as usize * 6);
    for band in pattern.bands(width, height) {
        let [tl, tr, bl, br] = rect_to_ndc(band.rect, width, height);
        let color = band.color.to_array();
        for pos in [tl, bl, tr, tr, bl, br] {
            out.push(FillVertex { pos, color });
        }
    }
    out
}

pub struct StripeFill {
    pipeline: RenderPipeline,
}

impl StripeFill {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Fill WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/fill.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Fill PipelineLayout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Fill Pipeline"),
            layout: Some(&layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[FillVertex::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        Self { pipeline }
    }

    /// Clear `target` and draw the stripes into it.
    pub fn encode(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        pattern: &StripePattern,
        width: u32,
        height: u32,
    ) {
        let vertices = stripe_vertices(pattern, width, height);
        let vertex_buf = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Fill VB"),
                contents: bytemuck::cast_slice(&vertices),
                usage: BufferUsages::VERTEX,
            })
        });

        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("FillPass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(to_wgpu_color(Color::TRANSPARENT)),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        // Zero-width target: the clear is all there is.
        let Some(vertex_buf) = vertex_buf else {
            return;
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, vertex_buf.slice(..));
        rpass.draw(0..vertices.len() as u32, 0..1);
    }
}
