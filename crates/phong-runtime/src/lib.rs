use std::time::Instant;

use anyhow::Context;
use winit::{dpi::PhysicalSize, event_loop::EventLoopProxy, window::Window};

use wgpu::{
    Adapter, CommandEncoder, CommandEncoderDescriptor, Device, ExperimentalFeatures, Features,
    Instance, Limits, MemoryHints, PowerPreference, Queue, RequestAdapterOptions, Surface,
    SurfaceConfiguration, SurfaceError, Texture, TextureFormat, TextureView,
    TextureViewDescriptor,
};

pub type RcWindow = std::sync::Arc<Window>;

use phong_3d::{CanvasRenderer, Mesh, WHITE, clear_target};
use phong_obj::load_obj;
use phong_scene::{DemoKind, MeshSource, Scene};

/// Offscreen color target the canvas renders into; shown by the UI as a texture.
pub struct Viewport {
    pub color: Texture,
    pub color_view: TextureView,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl Viewport {
    pub fn new(device: &wgpu::Device, format: TextureFormat, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("canvas_color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            color,
            color_view,
            width,
            height,
            format,
        }
    }
}

/// What the canvas should show and how large it is.
pub struct CanvasSetup {
    pub scene: Scene,
    pub mesh: MeshSource,
    pub width: u32,
    pub height: u32,
}

/// Builds the draw item meshes in draw order: the scene geometry, then the
/// light marker when the demo shows one.
pub fn scene_meshes(
    scene: &Scene,
    source: &MeshSource,
) -> anyhow::Result<Vec<(&'static str, Mesh)>> {
    let main = match source {
        MeshSource::Cube if scene.kind == DemoKind::BlinnPhongMesh => {
            log::warn!("no mesh configured for {}, drawing a white cube", scene.kind);
            Mesh::cube().with_uniform_color(WHITE)
        }
        MeshSource::Cube => Mesh::cube(),
        MeshSource::Obj(path) => load_obj(path)?,
    };
    let mut meshes = vec![("scene_mesh", main)];
    if scene.shows_light_marker() {
        meshes.push(("light_marker", Mesh::light_marker()));
    }
    for (label, mesh) in &meshes {
        mesh.validate().with_context(|| format!("{label} is not drawable"))?;
    }
    Ok(meshes)
}

async fn build_canvas(
    device: &Device,
    format: TextureFormat,
    setup: &CanvasSetup,
) -> anyhow::Result<(CanvasRenderer, usize)> {
    let meshes = scene_meshes(&setup.scene, &setup.mesh)?;
    let triangles = meshes.first().map_or(0, |(_, m)| m.triangle_count());
    let items: Vec<(&str, &Mesh)> = meshes.iter().map(|(label, mesh)| (*label, mesh)).collect();

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let renderer = CanvasRenderer::new(device, format, setup.width, setup.height, &items);
    if let Some(err) = device.pop_error_scope().await {
        anyhow::bail!("canvas pipeline rejected: {err}");
    }
    Ok((renderer, triangles))
}

pub async fn create_graphics(
    window: RcWindow,
    proxy: EventLoopProxy<Graphics>,
    setup: CanvasSetup,
) -> anyhow::Result<()> {
    let instance = Instance::default();
    let surface = instance
        .create_surface(std::sync::Arc::clone(&window))
        .context("creating window surface")?;

    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        })
        .await
        .context("Could not get an adapter (GPU).")?;
    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: Features::empty(),
            required_limits: Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
            memory_hints: MemoryHints::Performance,
            trace: Default::default(),
            experimental_features: ExperimentalFeatures::disabled(),
        })
        .await
        .context("Failed to get device")?;

    let size = window.inner_size();
    let surface_config = surface
        .get_default_config(&adapter, size.width.max(1), size.height.max(1))
        .context("Failed to create surface config")?;
    surface.configure(&device, &surface_config);

    let viewport = Viewport::new(&device, surface_config.format, setup.width, setup.height);

    let (canvas, triangle_count) = match build_canvas(&device, viewport.format, &setup).await {
        Ok((canvas, triangles)) => {
            log::info!(
                "canvas ready: {} demo, {} triangles, {}x{}",
                setup.scene.kind,
                triangles,
                viewport.width,
                viewport.height
            );
            (Some(canvas), triangles)
        }
        Err(e) => {
            log::error!("canvas disabled: {e:#}");
            (None, 0)
        }
    };

    let gfx = Graphics {
        window,
        instance,
        surface,
        surface_config,
        adapter,
        device,
        queue,
        viewport,
        canvas,
        scene: setup.scene,
        triangle_count,
        started: Instant::now(),
    };

    proxy
        .send_event(gfx)
        .map_err(|_| anyhow::anyhow!("event loop closed before graphics were ready"))
}

pub fn clear_color(rgba: [f32; 4]) -> wgpu::Color {
    let [r, g, b, a] = rgba.map(f64::from);
    wgpu::Color { r, g, b, a }
}

#[allow(dead_code)]
pub struct Graphics {
    pub(crate) window: RcWindow,
    pub viewport: Viewport,
    instance: Instance,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    adapter: Adapter,
    device: Device,
    queue: Queue,
    canvas: Option<CanvasRenderer>,
    scene: Scene,
    triangle_count: usize,
    started: Instant,
}

impl Graphics {
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn viewport_view(&self) -> &TextureView {
        &self.viewport.color_view
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.surface_config.width = new_size.width.max(1);
        self.surface_config.height = new_size.height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Per-frame canvas update: uniforms then one indexed draw per item.
    /// Without a canvas, or with a zero-sized viewport, only the background is cleared.
    fn draw_canvas(&self, encoder: &mut CommandEncoder) {
        let clear = clear_color(self.scene.background);
        let elapsed = self.started.elapsed().as_secs_f32();
        let uniforms = self
            .scene
            .frame_uniforms(elapsed, self.viewport.width, self.viewport.height);

        match (&self.canvas, uniforms) {
            (Some(canvas), Some(uniforms)) => {
                canvas.prepare(&self.queue, &uniforms);
                canvas.render(encoder, &self.viewport.color_view, clear);
            }
            _ => clear_target(encoder, &self.viewport.color_view, clear),
        }
    }

    pub fn draw<F>(&mut self, overlay: F)
    where
        F: FnOnce(&mut Self, &TextureView, &mut wgpu::CommandEncoder),
    {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return;
            }
        };

        let swap_view = frame.texture.create_view(&TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        self.draw_canvas(&mut encoder);
        overlay(self, &swap_view, &mut encoder);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface_config(&self) -> &SurfaceConfiguration {
        &self.surface_config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn canvas_enabled(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }
}
