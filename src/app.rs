use crate::config::AppConfig;
use crate::input::{action_for_key, is_close_key};
use egui::load::SizedTexture;
use phong_runtime::{CanvasSetup, Graphics, RcWindow, create_graphics};
use phong_scene::{CanvasAction, Scene};
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

enum State {
    Ready(ReadyState),
    Init(Option<EventLoopProxy<Graphics>>),
}

struct ReadyState {
    gfx: Graphics,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    viewport_tex_id: egui::TextureId,
}

pub struct CanvasUi {
    pub show_inspector: bool,
    pub pending: Vec<CanvasAction>,
}

impl CanvasUi {
    pub fn new() -> Self {
        Self {
            show_inspector: true,
            pending: Vec::new(),
        }
    }
}

pub struct App {
    state: State,
    config: AppConfig,
    frame_time: Duration,
    render_target: Instant,
    ui: CanvasUi,
    fatal: Option<anyhow::Error>,
}

impl App {
    pub fn new(event_loop: &EventLoop<Graphics>, config: AppConfig) -> Self {
        Self {
            state: State::Init(Some(event_loop.create_proxy())),
            frame_time: config.frame_time(),
            config,
            render_target: Instant::now(),
            ui: CanvasUi::new(),
            fatal: None,
        }
    }

    /// Startup error that stopped the event loop, if any.
    pub fn finish(self) -> anyhow::Result<()> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init_egui_for_graphics(
        gfx: &Graphics,
    ) -> (
        egui::Context,
        egui_winit::State,
        egui_wgpu::Renderer,
        egui::TextureId,
    ) {
        let egui_ctx = egui::Context::default();
        let viewport_id = egui_ctx.viewport_id();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            viewport_id,
            gfx.window(),
            None,
            None,
            None,
        );

        let mut egui_renderer = egui_wgpu::Renderer::new(
            gfx.device(),
            gfx.surface_config().format,
            egui_wgpu::RendererOptions::default(),
        );

        let viewport_tex_id = egui_renderer.register_native_texture(
            gfx.device(),
            gfx.viewport_view(),
            wgpu::FilterMode::Linear,
        );

        (egui_ctx, egui_state, egui_renderer, viewport_tex_id)
    }

    fn canvas_setup(&self) -> CanvasSetup {
        let demo = &self.config.demo;
        CanvasSetup {
            scene: Scene::new(demo.kind, self.config.steps()),
            mesh: demo.kind.mesh_source(demo.mesh.clone()),
            width: self.config.window.canvas_width,
            height: self.config.window.canvas_height,
        }
    }

    fn draw(&mut self) {
        if let State::Ready(ready) = &mut self.state {
            Self::draw_canvas_window(ready, &mut self.ui);
            Self::apply_pending(ready, &mut self.ui);
        }
    }

    fn apply_pending(ready: &mut ReadyState, ui_state: &mut CanvasUi) {
        if ui_state.pending.is_empty() {
            return;
        }
        let mut rng = rand::rng();
        for action in ui_state.pending.drain(..) {
            ready.gfx.scene_mut().apply(action, &mut rng);
        }
        ready.gfx.request_redraw();
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        if let State::Ready(ready) = &mut self.state {
            ready.gfx.resize(size);
        }
    }

    fn draw_canvas_window(ready: &mut ReadyState, ui_state: &mut CanvasUi) {
        let raw_input = ready.egui_state.take_egui_input(ready.gfx.window());
        let viewport_tex_id = ready.viewport_tex_id;
        let (canvas_w, canvas_h) = ready.gfx.viewport_size();
        let canvas_enabled = ready.gfx.canvas_enabled();
        let triangles = ready.gfx.triangle_count();
        let scene = ready.gfx.scene();
        let actions = scene.actions();
        let kind = scene.kind;
        let rotation = scene.rotation;
        let tilt = scene.tilt;
        let eye = scene.camera.eye;
        let offset = scene.offset;
        let egui_ctx = ready.egui_ctx.clone();

        let full_output = egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Canvas widget demo")
                .default_pos(egui::pos2(15.0, 15.0))
                .resizable(false)
                .show(ctx, |ui| {
                    let sized = SizedTexture::new(
                        viewport_tex_id,
                        egui::vec2(canvas_w as f32, canvas_h as f32),
                    );
                    ui.add(egui::Image::from_texture(sized));

                    if !canvas_enabled {
                        ui.colored_label(
                            egui::Color32::RED,
                            "Canvas disabled, see log for details.",
                        );
                    }

                    ui.horizontal(|ui| {
                        for action in &actions {
                            if ui.button(action.label()).clicked() {
                                ui_state.pending.push(*action);
                            }
                        }
                    });

                    ui.checkbox(&mut ui_state.show_inspector, "Inspector");
                    if ui_state.show_inspector {
                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.label("Demo:");
                            ui.monospace(kind.to_string());
                        });
                        ui.horizontal(|ui| {
                            ui.label("Plate / Horizontal / Vertical:");
                            ui.monospace(format!(
                                "{:.2} / {:.2} / {:.2}",
                                rotation.plate, rotation.horizontal, rotation.vertical
                            ));
                        });
                        ui.horizontal(|ui| {
                            ui.label("Tilt:");
                            ui.monospace(format!("{tilt:.3}"));
                        });
                        ui.horizontal(|ui| {
                            ui.label("Eye:");
                            ui.monospace(format!("{:?}", eye));
                        });
                        ui.horizontal(|ui| {
                            ui.label("Offset:");
                            ui.monospace(format!("{:?}", offset));
                        });
                        ui.horizontal(|ui| {
                            ui.label("Triangles:");
                            ui.monospace(triangles.to_string());
                        });
                    }
                });
        });

        let egui::FullOutput {
            platform_output,
            textures_delta,
            shapes,
            pixels_per_point,
            ..
        } = full_output;

        ready
            .egui_state
            .handle_platform_output(ready.gfx.window(), platform_output);

        let paint_jobs = ready.egui_ctx.tessellate(shapes, pixels_per_point);

        ready.gfx.draw(|gfx_inner, swap_view, encoder| {
            for (id, image_delta) in &textures_delta.set {
                ready.egui_renderer.update_texture(
                    gfx_inner.device(),
                    gfx_inner.queue(),
                    *id,
                    image_delta,
                );
            }
            for id in &textures_delta.free {
                ready.egui_renderer.free_texture(id);
            }

            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [
                    gfx_inner.surface_config().width,
                    gfx_inner.surface_config().height,
                ],
                pixels_per_point,
            };

            ready.egui_renderer.update_buffers(
                gfx_inner.device(),
                gfx_inner.queue(),
                encoder,
                &paint_jobs,
                &screen_descriptor,
            );

            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.2,
                            g: 0.2,
                            b: 0.2,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut rpass = rpass.forget_lifetime();
            ready
                .egui_renderer
                .render(&mut rpass, &paint_jobs, &screen_descriptor);
        });
    }
}

impl ApplicationHandler<Graphics> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let State::Init(proxy) = &mut self.state else {
            return;
        };
        let Some(proxy) = proxy.take() else {
            return;
        };

        let win_attr = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let result = event_loop
            .create_window(win_attr)
            .map_err(|e| anyhow::anyhow!("create window err: {e}"))
            .and_then(|window| {
                let window: RcWindow = std::sync::Arc::new(window);
                pollster::block_on(create_graphics(window, proxy, self.canvas_setup()))
            });

        if let Err(e) = result {
            log::error!("startup failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, graphics: Graphics) {
        let (egui_ctx, egui_state, egui_renderer, viewport_tex_id) =
            App::init_egui_for_graphics(&graphics);

        graphics.request_redraw();
        self.state = State::Ready(ReadyState {
            gfx: graphics,
            egui_ctx,
            egui_state,
            egui_renderer,
            viewport_tex_id,
        });
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: StartCause) {
        if self.render_target <= Instant::now() {
            self.render_target += self.frame_time;
            if let State::Ready(ready) = &mut self.state {
                ready.gfx.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => self.resized(size),
            WindowEvent::RedrawRequested => {
                self.draw();
                let now = Instant::now();
                if self.render_target <= now {
                    self.render_target = now + self.frame_time;
                    if let State::Ready(ready) = &mut self.state {
                        ready.gfx.request_redraw();
                    }
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            other => {
                let State::Ready(ready) = &mut self.state else {
                    return;
                };
                let response = ready.egui_state.on_window_event(ready.gfx.window(), &other);
                if response.repaint {
                    ready.gfx.request_redraw();
                }
                if response.consumed {
                    return;
                }
                if let WindowEvent::KeyboardInput {
                    event: key_event, ..
                } = &other
                {
                    if key_event.state != ElementState::Pressed || key_event.repeat {
                        return;
                    }
                    if is_close_key(&key_event.logical_key) {
                        event_loop.exit();
                        return;
                    }
                    let scene = ready.gfx.scene();
                    if let Some(action) = action_for_key(&key_event.logical_key)
                        .filter(|a| scene.actions().contains(a))
                    {
                        self.ui.pending.push(action);
                        ready.gfx.request_redraw();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.render_target));
    }
}
