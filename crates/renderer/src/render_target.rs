//! Offscreen color target that is rendered into once and sampled by the card.

use wgpu::{
    AddressMode, BindGroup, BindGroupLayout, Device, Extent3d, FilterMode, Sampler,
    SamplerDescriptor, Texture, TextureDescriptor, TextureDimension, TextureFormat,
    TextureFormatFeatureFlags, TextureUsages, TextureView, TextureViewDescriptor,
};

use corelib::{filter::MinFilter, stripes::StripePattern};

use crate::{GpuState, RendererError, RendererResult, fill::StripeFill, mipmap::MipGenerator};

/// Side of the square render target, in pixels.
pub const RTT_SIZE: u32 = 512;

/// Color formats tried for render-to-texture, best first (8 bits per channel).
/// Plain UNORM comes first: stripe colors are stored as written.
pub const RTT_FORMAT_PREFERENCE: [TextureFormat; 4] = [
    TextureFormat::Rgba8Unorm,
    TextureFormat::Bgra8Unorm,
    TextureFormat::Rgba8UnormSrgb,
    TextureFormat::Bgra8UnormSrgb,
];

/// Usages every render-to-texture format must allow.
pub const RTT_USAGES: TextureUsages =
    TextureUsages::RENDER_ATTACHMENT.union(TextureUsages::TEXTURE_BINDING);

/// First candidate the predicate accepts.
pub fn pick_rtt_format(
    candidates: &[TextureFormat],
    supported: impl Fn(TextureFormat) -> bool,
) -> Option<TextureFormat> {
    candidates.iter().copied().find(|&f| supported(f))
}

/// Full mip chain length for a `width x height` texture.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Sampler state for a given minification filter. Magnification is always linear.
pub fn sampler_descriptor(filter: MinFilter) -> SamplerDescriptor<'static> {
    let base = SamplerDescriptor {
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        address_mode_w: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    };
    match filter {
        MinFilter::LinearMipmapLinear => SamplerDescriptor {
            label: Some("RTT Sampler (trilinear)"),
            mipmap_filter: FilterMode::Linear,
            ..base
        },
        MinFilter::Linear => SamplerDescriptor {
            label: Some("RTT Sampler (linear)"),
            mipmap_filter: FilterMode::Nearest,
            lod_max_clamp: 0.0,
            ..base
        },
    }
}

pub struct RenderTarget {
    texture: Texture,
    /// All mip levels, for sampling.
    view: TextureView,
    format: TextureFormat,
    width: u32,
    height: u32,
    mip_levels: u32,
    trilinear: Sampler,
    linear: Sampler,
}

impl RenderTarget {
    /// Allocate a square render target. Fails when the adapter cannot render
    /// into and sample from any 8-bit RGBA format.
    pub fn new(gpu: &GpuState, size: u32) -> RendererResult<Self> {
        let adapter = gpu.adapter();
        let format = pick_rtt_format(&RTT_FORMAT_PREFERENCE, |f| {
            let features = adapter.get_texture_format_features(f);
            features.allowed_usages.contains(RTT_USAGES)
                && features.flags.contains(TextureFormatFeatureFlags::FILTERABLE)
        })
        .ok_or(RendererError::RenderToTextureUnsupported)?;

        let width = size.max(1);
        let height = size.max(1);
        let mip_levels = mip_level_count(width, height);
        log::info!(
            "RTT ColorFormat={:?}, DepthFormat=None, StencilFormat=None, bounds={}x{}, mips={}",
            format,
            width,
            height,
            mip_levels
        );

        let device = gpu.device();
        let texture = device.create_texture(&TextureDescriptor {
            label: Some("RTT Color"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage: RTT_USAGES,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            format,
            width,
            height,
            mip_levels,
            trilinear: device.create_sampler(&sampler_descriptor(MinFilter::LinearMipmapLinear)),
            linear: device.create_sampler(&sampler_descriptor(MinFilter::Linear)),
        })
    }

    /// Draw `pattern` into level 0, build the mip chain, and submit.
    /// Runs once; the texture is complete before anything samples it.
    pub fn fill_stripes(&self, gpu: &GpuState, pattern: &StripePattern) {
        let device = gpu.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("RTT Encoder"),
        });

        let fill = StripeFill::new(device, self.format);
        fill.encode(device, &mut encoder, &self.level_view(0), pattern, self.width, self.height);

        MipGenerator::new(device, self.format).encode(device, &mut encoder, self);

        gpu.queue().submit(Some(encoder.finish()));
        log::info!(
            "Rendered {} stripes into render target",
            pattern.band_count(self.width)
        );
    }

    /// Single-level view, used as a render attachment.
    pub fn level_view(&self, level: u32) -> TextureView {
        self.texture.create_view(&TextureViewDescriptor {
            label: Some("RTT Level"),
            base_mip_level: level,
            mip_level_count: Some(1),
            ..Default::default()
        })
    }

    /// Texture + sampler bind group for the given filter.
    pub fn bind_group(&self, device: &Device, layout: &BindGroupLayout, filter: MinFilter) -> BindGroup {
        let sampler = match filter {
            MinFilter::LinearMipmapLinear => &self.trilinear,
            MinFilter::Linear => &self.linear,
        };
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("RTT BG"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    #[inline]
    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }
}
