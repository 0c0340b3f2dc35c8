//! Texture decoding and upload
//!
//! Images are decoded with `image`, converted to RGBA8 and flipped vertically
//! so row 0 is the bottom of the picture (sphere UVs expect that). A 1x1 white
//! texture is always present and backs every untextured draw.

use std::fmt;
use std::path::{Path, PathBuf};

use orrery_core::TextureId;

/// Texture loading errors
#[derive(Debug)]
pub enum TextureError {
    /// File could not be read or decoded
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Decoded image has a zero dimension
    ZeroDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Decode { path, source } => {
                write!(f, "Failed to load texture {}: {}", path.display(), source)
            }
            TextureError::ZeroDimensions {
                path,
                width,
                height,
            } => write!(
                f,
                "Texture {} has zero size ({}x{})",
                path.display(),
                width,
                height
            ),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Decode { source, .. } => Some(source),
            TextureError::ZeroDimensions { .. } => None,
        }
    }
}

/// Decode an image file into flipped RGBA8 pixels
pub fn decode_rgba(path: &Path) -> Result<image::RgbaImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions {
            path: path.to_path_buf(),
            width,
            height,
        });
    }
    Ok(image.flipv().to_rgba8())
}

/// A texture on the GPU, ready to bind
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
}

/// All textures the scene uses, addressed by [`TextureId`]
pub struct TextureSet {
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: Vec<GpuTexture>,
}

impl TextureSet {
    /// Create the set with the white fallback texture
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white = Self::create(
            device,
            queue,
            &bind_group_layout,
            &sampler,
            "White Texture",
            &[255, 255, 255, 255],
            (1, 1),
        );

        Self {
            bind_group_layout,
            sampler,
            white,
            textures: Vec::new(),
        }
    }

    /// Decode and upload an image file
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<TextureId, TextureError> {
        let pixels = decode_rgba(path)?;
        let dimensions = pixels.dimensions();
        let label = path.display().to_string();
        let texture = Self::create(
            device,
            queue,
            &self.bind_group_layout,
            &self.sampler,
            &label,
            pixels.as_raw(),
            dimensions,
        );
        log::info!("Loaded texture {} ({}x{})", label, dimensions.0, dimensions.1);

        self.textures.push(texture);
        Ok(TextureId(self.textures.len() - 1))
    }

    /// Texture for `id`, or the white texture when unknown
    pub fn get(&self, id: TextureId) -> &GpuTexture {
        self.textures.get(id.0).unwrap_or(&self.white)
    }

    /// The 1x1 white texture
    pub fn white(&self) -> &GpuTexture {
        &self.white
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        rgba: &[u8],
        (width, height): (u32, u32),
    ) -> GpuTexture {
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
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        GpuTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
        }
    }
}
