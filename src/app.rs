//! Windowed application driving the demo
//!
//! Wires the winit event loop to the render engine, the ImGui overlay, the
//! router and the art view. Everything runs on the event loop thread.

use std::{sync::Arc, time::Instant};

use anyhow::Context;
use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    animation::{FrameRenderer, FrameScheduler},
    assets::AssetManifest,
    config::DemoConfig,
    gfx::{
        camera::{CameraController, CameraRig, OrbitCamera},
        rendering::render_engine::{apply_resize, RenderEngine},
        scene::Scene,
    },
    options::{store::OptionsStore, Options},
    routes::{Route, Router},
    ui::{nav, ControlPanel, UiManager},
    views::{home, ArtView},
};

pub struct DemoApp {
    state: AppState,
}

struct AppState {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    store: OptionsStore<Scene>,
    art: ArtView,
    panel: ControlPanel,
    router: Router,
    scheduler: FrameScheduler,
    last_frame: Instant,
    init_error: Option<anyhow::Error>,
}

impl DemoApp {
    /// Builds the scene and its option bindings. No window exists yet.
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let (width, height) = config.window_size;
        let mut camera = OrbitCamera::new(
            12.0,
            0.35,
            0.6,
            Vector3::new(0.0, 1.0, 0.0),
            width as f32 / height.max(1) as f32,
        );
        camera.bounds.min_distance = Some(2.0);
        camera.bounds.max_distance = Some(60.0);
        let controller = CameraController::new(0.005, 0.5);

        let mut scene = Scene::new(CameraRig::new(camera, controller));
        let mut store = OptionsStore::new(Options::default());
        let art = ArtView::new(&mut scene, &mut store).context("Failed to bind scene options")?;

        let mut scheduler = FrameScheduler::new(config.timestep);
        scheduler.set_time_scale(config.time_scale);

        Ok(Self {
            state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                store,
                art,
                panel: ControlPanel::default(),
                router: Router::new(Route::Home),
                scheduler,
                last_frame: Instant::now(),
                init_error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.state)
            .context("Event loop terminated abnormally")?;

        match self.state.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(PhysicalSize::new(width, height)),
            )
            .context("Failed to create window")?;
        let window = Arc::new(window);
        let (width, height) = window.inner_size().into();

        let mut render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.present_mode(),
        ))?;

        let manifest = AssetManifest::new(&self.config.asset_root);
        log::info!("Loading assets from {}", manifest.root.display());
        let max_dimension = render_engine.device().limits().max_texture_dimension_2d;
        render_engine.upload_assets(&manifest.load(max_dimension));

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.resize(width, height);
        self.scene.rig.camera.resize_projection(width, height);

        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.ui_manager = Some(ui_manager);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            self.scene.rig.handle_key(event);
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::Space) => {
                if self.scheduler.is_paused() {
                    self.scheduler.resume();
                } else {
                    self.scheduler.pause();
                }
                log::info!("Animation {}", if self.scheduler.is_paused() { "paused" } else { "resumed" });
            }
            _ => self.scene.rig.handle_key(event),
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        let now = Instant::now();
        let t_ms = self.scheduler.advance(now - self.last_frame);
        self.last_frame = now;

        self.scene.update();
        render_engine.set_time((t_ms / 1000.0) as f32);

        let route = self.router.current();
        let mut requested = None;
        let (panel, store, scene) = (&self.panel, &mut self.store, &mut self.scene);
        ui_manager.build_frame(window, |ui| {
            requested = nav::draw(ui, route);
            match route {
                Route::Art => {
                    panel.draw(ui, store, scene);
                }
                Route::Home => {
                    if let Some(route) = home::draw(ui) {
                        requested = Some(route);
                    }
                }
            }
        });

        let overlay = |device: &wgpu::Device,
                       queue: &wgpu::Queue,
                       encoder: &mut wgpu::CommandEncoder,
                       view: &wgpu::TextureView| {
            ui_manager.draw_overlay(device, queue, encoder, view);
        };

        match route {
            Route::Art => {
                let mut renderer = EngineRenderer {
                    engine: render_engine,
                    overlay: Some(overlay),
                };
                self.art
                    .animation()
                    .frame(t_ms, self.store.values(), &mut self.scene, &mut renderer);
            }
            Route::Home => render_engine.render_frame(None, Some(overlay)),
        }

        if let Some(route) = requested {
            self.router.go(route);
        }
    }
}

/// Renders the scene plus the UI overlay, once
struct EngineRenderer<'a, F> {
    engine: &'a mut RenderEngine,
    overlay: Option<F>,
}

impl<F> FrameRenderer for EngineRenderer<'_, F>
where
    F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
{
    fn render(&mut self, scene: &Scene) {
        let overlay = self.overlay.take();
        if overlay.is_none() {
            log::debug!("UI overlay already drawn this frame");
        }
        self.engine.render_frame(Some(scene), overlay);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Startup failed: {:#}", e);
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_window_event(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                let Some(render_engine) = self.render_engine.as_mut() else {
                    return;
                };
                apply_resize(
                    &mut self.scene.rig.camera,
                    render_engine,
                    width,
                    height,
                );
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let (width, height) = render_engine.get_surface_size();
                    ui_manager.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() || self.router.current() != Route::Art {
            return;
        }
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }

        self.scene.rig.handle_device(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
