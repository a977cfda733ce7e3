//! The card: a textured quad showing the render target.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    DepthBiasState, DepthStencilState, Device, FragmentState, PipelineLayoutDescriptor, Queue,
    RenderPass, RenderPipeline, RenderPipelineDescriptor, SamplerBindingType,
    ShaderModuleDescriptor, ShaderStages, TextureFormat, TextureSampleType, TextureViewDimension,
    VertexBufferLayout, VertexState, VertexStepMode, util::DeviceExt,
};

use asset::{mesh::MeshData, shader::ShaderSource};
use corelib::filter::MinFilter;

use crate::{
    DEPTH_FORMAT, GpuState, RendererResult, render_target::RenderTarget, with_validation_scope,
};

/// Vertex: position + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CardVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

impl CardVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<CardVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
    };
}

/// Camera UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    mvp: [[f32; 4]; 4],
}

/// Material state of the card, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardMaterial {
    pub cull_mode: Option<wgpu::Face>,
    pub alpha_to_coverage: bool,
    pub sample_count: u32,
}

impl CardMaterial {
    /// No face culling; alpha-to-coverage whenever the pass is multisampled.
    pub fn for_sample_count(sample_count: u32) -> Self {
        Self {
            cull_mode: None,
            alpha_to_coverage: sample_count > 1,
            sample_count,
        }
    }
}

pub struct CardObject {
    pipeline: RenderPipeline,
    vertex_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,

    camera_buf: Buffer,
    camera_bg: BindGroup,

    // One bind group per min filter; the sampler is the only difference.
    trilinear_bg: BindGroup,
    linear_bg: BindGroup,
}

impl CardObject {
    /// Build the card pipeline and buffers. Fails if the device rejects the shader.
    pub async fn new(
        gpu: &GpuState,
        mesh: &MeshData,
        shader: &ShaderSource,
        target: &RenderTarget,
    ) -> RendererResult<Self> {
        let device = gpu.device();
        let camera_bgl = camera_bind_group_layout(device);
        let texture_bgl = texture_bind_group_layout(device);

        let material = CardMaterial::for_sample_count(gpu.sample_count());
        let pipeline = create_card_pipeline(
            device,
            shader,
            &[&camera_bgl, &texture_bgl],
            gpu.surface_format(),
            material,
        )
        .await?;

        let camera_init = CameraUniform {
            mvp: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let camera_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera UBO"),
            contents: bytemuck::bytes_of(&camera_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let camera_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera BG"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buf.as_entire_binding(),
            }],
        });

        let vertices = card_vertices(mesh);
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Card VB"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Card IB"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: BufferUsages::INDEX,
        });

        Ok(Self {
            pipeline,
            vertex_buf,
            index_buf,
            index_count: mesh.indices.len() as u32,
            camera_buf,
            camera_bg,
            trilinear_bg: target.bind_group(device, &texture_bgl, MinFilter::LinearMipmapLinear),
            linear_bg: target.bind_group(device, &texture_bgl, MinFilter::Linear),
        })
    }

    /// Upload this frame's model-view-projection.
    pub fn set_mvp(&self, queue: &Queue, mvp: Mat4) {
        let cam = CameraUniform {
            mvp: mvp.to_cols_array_2d(),
        };
        queue.write_buffer(&self.camera_buf, 0, bytemuck::bytes_of(&cam));
    }

    pub fn draw(&self, rpass: &mut RenderPass<'_>, filter: MinFilter) {
        let texture_bg = match filter {
            MinFilter::LinearMipmapLinear => &self.trilinear_bg,
            MinFilter::Linear => &self.linear_bg,
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.camera_bg, &[]);
        rpass.set_bind_group(1, texture_bg, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Shader module and card pipeline, both under one validation scope so a
/// shader that parses but does not fit the pipeline is still an error.
async fn create_card_pipeline(
    device: &Device,
    shader: &ShaderSource,
    bind_group_layouts: &[&BindGroupLayout],
    color_format: TextureFormat,
    material: CardMaterial,
) -> RendererResult<RenderPipeline> {
    let label = shader.label();
    with_validation_scope(device, &label, || {
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(shader.wgsl.as_str().into()),
        });
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Card PipelineLayout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Card Pipeline"),
            layout: Some(&layout),
            vertex: VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[CardVertex::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: color_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: material.cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: material.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: material.alpha_to_coverage,
            },
            multiview: None,
            cache: None,
        })
    })
    .await
}

fn camera_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Camera BGL"),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<CameraUniform>() as u64),
            },
            count: None,
        }],
    })
}

fn texture_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("RTT Texture BGL"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// GPU vertices for a CPU mesh.
pub fn card_vertices(mesh: &MeshData) -> Vec<CardVertex> {
    mesh.vertices
        .iter()
        .map(|v| CardVertex {
            pos: v.position,
            uv: v.uv,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_vertices_copy_mesh() {
        let mesh = MeshData::card();
        let verts = card_vertices(&mesh);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].pos, [-1.0, 0.0, -1.0]);
        assert_eq!(verts[0].uv, [0.0, 1.0]);
    }

    #[test]
    fn material_has_no_culling() {
        let m = CardMaterial::for_sample_count(4);
        assert_eq!(m.cull_mode, None);
        assert!(m.alpha_to_coverage);
    }

    #[test]
    fn single_sample_disables_alpha_to_coverage() {
        let m = CardMaterial::for_sample_count(1);
        assert!(!m.alpha_to_coverage);
    }

    #[test]
    fn vertex_layout_stride() {
        assert_eq!(CardVertex::LAYOUT.array_stride, 20);
    }

    /// Headless device; `None` on machines without a GPU adapter.
    fn headless_device() -> Option<Device> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;
        Some(device)
    }

    fn build_pipeline(device: &Device, wgsl: &str) -> RendererResult<RenderPipeline> {
        let shader = ShaderSource {
            path: "card.wgsl".into(),
            wgsl: wgsl.to_owned(),
        };
        let camera_bgl = camera_bind_group_layout(device);
        let texture_bgl = texture_bind_group_layout(device);
        pollster::block_on(create_card_pipeline(
            device,
            &shader,
            &[&camera_bgl, &texture_bgl],
            TextureFormat::Rgba8Unorm,
            CardMaterial::for_sample_count(1),
        ))
    }

    #[test]
    fn shader_without_card_entry_points_is_an_error() {
        let Some(device) = headless_device() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let wgsl = "@vertex fn main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        match build_pipeline(&device, wgsl) {
            Err(crate::RendererError::Shader { label, .. }) => assert_eq!(label, "card"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("pipeline accepted a shader without vs_main/fs_main"),
        }
    }

    #[test]
    fn bundled_card_shader_builds_pipeline() {
        let Some(device) = headless_device() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let src = asset::shader::load_wgsl(asset::shader::default_card_shader_path())
            .expect("bundled shader");
        assert!(build_pipeline(&device, &src.wgsl).is_ok());
    }
}
