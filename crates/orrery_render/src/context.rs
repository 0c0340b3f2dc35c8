//! GPU device, queue and surface management

use std::fmt;
use std::sync::Arc;

use winit::window::Window;

/// Failure while acquiring GPU resources
#[derive(Debug)]
pub enum RenderContextError {
    /// Surface could not be created for the window
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter is compatible with the surface
    NoAdapter,
    /// The adapter refused the device request
    DeviceRequest(wgpu::RequestDeviceError),
    /// The surface reports no usable format or alpha mode
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderContextError::SurfaceCreation(e) => write!(f, "Failed to create surface: {}", e),
            RenderContextError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            RenderContextError::DeviceRequest(e) => write!(f, "Failed to request GPU device: {}", e),
            RenderContextError::UnsupportedSurface => write!(f, "Surface is not compatible with the adapter"),
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderContextError::SurfaceCreation(e) => Some(e),
            RenderContextError::NoAdapter | RenderContextError::UnsupportedSurface => None,
            RenderContextError::DeviceRequest(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for RenderContextError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderContextError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderContextError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderContextError::DeviceRequest(e)
    }
}

/// Pick an sRGB format if there is one, plus the first alpha mode
fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
) -> Result<(wgpu::TextureFormat, wgpu::CompositeAlphaMode), RenderContextError> {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or(RenderContextError::UnsupportedSurface)?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .ok_or(RenderContextError::UnsupportedSurface)?;
    Ok((format, alpha_mode))
}

/// Owns the wgpu device, queue and window surface
pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
}

impl RenderContext {
    /// Create a context for `window`
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderContextError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using GPU: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Orrery Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let (format, alpha_mode) = choose_surface_format(&caps)?;

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new window size (zero sizes are ignored)
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size (after a lost/outdated surface)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Width / height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

/// Create a context synchronously using `pollster`
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_capabilities_are_an_error() {
        let caps = wgpu::SurfaceCapabilities::default();
        assert!(matches!(choose_surface_format(&caps), Err(RenderContextError::UnsupportedSurface)));

        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats.push(wgpu::TextureFormat::Bgra8Unorm);
        assert!(matches!(choose_surface_format(&caps), Err(RenderContextError::UnsupportedSurface)));
    }

    #[test]
    fn test_prefers_srgb_format() {
        let mut caps = wgpu::SurfaceCapabilities::default();
        caps.formats = vec![wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb];
        caps.alpha_modes = vec![wgpu::CompositeAlphaMode::Opaque];
        let (format, alpha) = choose_surface_format(&caps).unwrap();
        assert_eq!(format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(alpha, wgpu::CompositeAlphaMode::Opaque);

        caps.formats = vec![wgpu::TextureFormat::Rgba8Unorm];
        assert_eq!(choose_surface_format(&caps).unwrap().0, wgpu::TextureFormat::Rgba8Unorm);
    }
}
