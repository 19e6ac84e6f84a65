use std::sync::Arc;

use glam::UVec2;
use log::{debug, warn};
use winit::{event_loop::EventLoopProxy, window::Window};

use crate::{context::EngineEvent, error::GraphicsError, render::Color};

pub struct Graphics {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

/// Creates the surface, adapter and device for `window` and hands the
/// result back to the event loop through `proxy`.
pub async fn create_graphics(window: Arc<Window>, vsync: bool, proxy: EventLoopProxy<EngineEvent>) {
    let event = match init(window, vsync).await {
        Ok(gfx) => EngineEvent::GraphicsReady(gfx),
        Err(err) => EngineEvent::GraphicsFailed(err),
    };
    if proxy.send_event(event).is_err() {
        warn!("event loop closed before graphics were delivered");
    }
}

async fn init(window: Arc<Window>, vsync: bool) -> Result<Graphics, GraphicsError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
    let surface = instance.create_surface(window.clone())?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        })
        .await?;
    debug!("using adapter {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("engine device"),
            ..Default::default()
        })
        .await?;

    let size = window.inner_size();
    let mut surface_config = surface
        .get_default_config(&adapter, size.width.max(1), size.height.max(1))
        .ok_or(GraphicsError::UnsupportedSurface)?;
    surface_config.present_mode = if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    };
    surface.configure(&device, &surface_config);

    Ok(Graphics {
        window,
        surface,
        surface_config,
        device,
        queue,
    })
}

impl Graphics {
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.surface_config.width, self.surface_config.height)
    }

    pub fn resize(&mut self, size: UVec2) {
        // Minimised windows report zero; the surface can't be configured that way.
        if size.x == 0 || size.y == 0 {
            return;
        }
        self.surface_config.width = size.x;
        self.surface_config.height = size.y;
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn draw(&mut self, clear: Color) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(err) => {
                warn!("skipping frame: {err}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        frame.present();
    }
}
