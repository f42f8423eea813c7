use crate::atlas::Atlas;
use crate::pixels::PixelBuffer;
use std::sync::Arc;

/// GPU copy of an atlas or gradient image. Cloning shares the texture.
#[derive(Clone)]
pub struct AtlasTexture(pub(crate) Arc<AnyTexture>);

pub(crate) struct AnyTexture {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Drop for AnyTexture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

/// Unorm format holding `channels` 8-bit values per texel. Luminance/alpha
/// maps to red/green.
pub fn format_for_channels(channels: usize) -> anyhow::Result<wgpu::TextureFormat> {
    match channels {
        1 => Ok(wgpu::TextureFormat::R8Unorm),
        2 => Ok(wgpu::TextureFormat::Rg8Unorm),
        4 => Ok(wgpu::TextureFormat::Rgba8Unorm),
        n => Err(anyhow::anyhow!("no texture format for {} channels", n)),
    }
}

impl AnyTexture {
    fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelBuffer,
        label: &str,
    ) -> anyhow::Result<Self> {
        let (width, height) = (pixels.width(), pixels.height());
        if width == 0 || height == 0 {
            return Err(anyhow::anyhow!("invalid texture size {}x{}", width, height));
        }
        let format = format_for_channels(pixels.channels())?;
        let bytes_per_row = width
            .checked_mul(pixels.channels() as u32)
            .ok_or_else(|| anyhow::anyhow!("invalid texture size"))?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            width,
            height,
            format,
            texture,
            view,
        })
    }
}

impl AtlasTexture {
    /// Uploads the atlas pixels as a two-channel texture.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        atlas: &Atlas,
    ) -> anyhow::Result<Self> {
        Self::from_pixels(device, queue, atlas.pixels())
    }

    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelBuffer,
    ) -> anyhow::Result<Self> {
        Ok(Self(Arc::new(AnyTexture::from_pixels(
            device,
            queue,
            pixels,
            "atlas_texture",
        )?)))
    }

    pub fn width(&self) -> u32 {
        self.0.width
    }

    pub fn height(&self) -> u32 {
        self.0.height
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.0.format
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.0.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.0.view
    }
}
