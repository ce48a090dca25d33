//! WGPU-based rendering engine for the demo
//!
//! Owns the surface, device and every GPU resource. Each frame draws the
//! skybox, then opaque nodes, then transparent nodes back to front, then
//! hands the encoder to an optional UI overlay.

use std::sync::Arc;

use anyhow::Context;
use wgpu::TextureFormat;

use crate::{
    assets::{CubeImages, ImageData, LoadedAssets},
    gfx::{
        camera::orbit_camera::OrbitCamera,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent, LightingState},
            texture_resource::TextureResource,
        },
        scene::Scene,
    },
};

use super::{
    draw_list::{DrawItem, DrawList},
    gpu_cache::GpuCache,
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.08,
    b: 0.12,
    a: 1.0,
};

/// Something with a drawable area that follows the window size
pub trait RenderSurface {
    fn resize(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
}

/// Resizes the surface and the camera projection together.
/// A zero width or height (minimized window) leaves both untouched.
pub fn apply_resize<S: RenderSurface + ?Sized>(
    camera: &mut OrbitCamera,
    surface: &mut S,
    width: u32,
    height: u32,
) {
    if width == 0 || height == 0 {
        log::debug!("Ignoring resize to {}x{}", width, height);
        return;
    }
    surface.resize(width, height);
    camera.resize_projection(width, height);
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    cache: GpuCache,
    time_seconds: f32,

    // Kept alive for the globals bind group
    environment: TextureResource,
    skybox: TextureResource,
    water_normals: TextureResource,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Textures start as solid placeholders until [`RenderEngine::upload_assets`]
    /// is called.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        present_mode: wgpu::PresentMode,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create a surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let placeholder_cube = CubeImages::solid([0, 0, 0, 255]);
        let environment =
            TextureResource::create_cubemap(&device, &queue, &placeholder_cube, "Environment");
        let skybox = TextureResource::create_cubemap(&device, &queue, &placeholder_cube, "Skybox");
        let water_normals = TextureResource::create_from_image(
            &device,
            &queue,
            &ImageData::solid_color(1, 1, [128, 128, 255, 255]),
            "Water Normals",
        );

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo, &environment, &water_normals, &skybox);

        let cache = GpuCache::new(&device);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("skybox", include_str!("skybox.wgsl"));
        pipeline_manager.register_bind_group_layout("globals", global_bindings.layout().clone());
        pipeline_manager.register_bind_group_layout("object", cache.object_layout().clone());
        pipeline_manager.register_bind_group_layout("material", cache.material_layout().clone());
        register_pipelines(&mut pipeline_manager, format);

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            anyhow::bail!("{} pipeline(s) failed to build: {:?}", errors.len(), errors);
        }
        log::debug!("Pipelines ready: {:?}", pipeline_manager.get_stats());

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            cache,
            time_seconds: 0.0,
            environment,
            skybox,
            water_normals,
        })
    }

    /// Replaces the placeholder textures with decoded images
    pub fn upload_assets(&mut self, assets: &LoadedAssets) {
        self.skybox =
            TextureResource::create_cubemap(&self.device, &self.queue, &assets.skybox, "Skybox");
        self.environment = TextureResource::create_cubemap(
            &self.device,
            &self.queue,
            &assets.environment,
            "Environment",
        );
        self.water_normals = TextureResource::create_from_image(
            &self.device,
            &self.queue,
            &assets.water_normals,
            "Water Normals",
        );
        self.global_bindings.create_bind_group(
            &self.device,
            &self.global_ubo,
            &self.environment,
            &self.water_normals,
            &self.skybox,
        );
        log::info!(
            "Uploaded textures: skybox {}px, environment {}px, normals {}x{}",
            assets.skybox.size(),
            assets.environment.size(),
            assets.water_normals.width,
            assets.water_normals.height
        );
    }

    /// Time fed to the shaders, drives the water normal scroll
    pub fn set_time(&mut self, seconds: f32) {
        self.time_seconds = seconds;
    }

    /// Renders one frame
    ///
    /// Without a scene only the clear color and the overlay are drawn. A lost
    /// or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame<F>(&mut self, scene: Option<&Scene>, overlay: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                return;
            }
            Err(e) => {
                log::error!("Failed to acquire the next frame: {}", e);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let draw_list = scene.map(|scene| {
            let lighting = LightingState::from_scene(scene);
            let camera = &scene.rig.camera;
            self.global_ubo.update_content(
                &self.queue,
                GlobalUBOContent::new(&camera.uniform, &lighting, self.time_seconds),
            );
            self.cache.sync(&self.device, &self.queue, scene);
            DrawList::build(scene, camera.eye)
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(draw_list), Some(globals)) = (&draw_list, self.global_bindings.bind_group()) {
                render_pass.set_bind_group(0, globals, &[]);

                if let Some(pipeline) = self.pipeline_manager.pipeline("Skybox") {
                    render_pass.set_pipeline(pipeline);
                    render_pass.draw(0..3, 0..1);
                }
                if let Some(pipeline) = self.pipeline_manager.pipeline("Opaque") {
                    render_pass.set_pipeline(pipeline);
                    self.draw_items(&mut render_pass, &draw_list.opaque);
                }
                if let Some(pipeline) = self.pipeline_manager.pipeline("Transparent") {
                    render_pass.set_pipeline(pipeline);
                    self.draw_items(&mut render_pass, &draw_list.transparent);
                }
            }
        }

        if let Some(overlay) = overlay {
            overlay(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn draw_items(&self, render_pass: &mut wgpu::RenderPass<'_>, items: &[DrawItem]) {
        for item in items {
            let (Some(mesh), Some(material)) =
                (self.cache.mesh(item.handle), self.cache.material(&item.material))
            else {
                log::debug!("Skipping draw item without GPU resources: {:?}", item);
                continue;
            };
            render_pass.set_bind_group(1, &mesh.bind_group, &[]);
            render_pass.set_bind_group(2, &material.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Reconfigures the surface and recreates the depth texture.
    /// Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}

impl RenderSurface for RenderEngine {
    fn resize(&mut self, width: u32, height: u32) {
        RenderEngine::resize(self, width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.get_surface_size()
    }
}

fn register_pipelines(pipeline_manager: &mut PipelineManager, format: TextureFormat) {
    let depth = TextureResource::DEPTH_FORMAT;

    pipeline_manager.register_pipeline(
        "Skybox",
        PipelineConfig::default_with_shader("skybox")
            .with_label("Skybox Pipeline")
            .with_bind_group_layouts(&["globals"])
            .with_color_format(format)
            .with_cull_mode(None)
            .with_no_vertex_buffers()
            .with_depth(depth, false, wgpu::CompareFunction::Always),
    );

    pipeline_manager.register_pipeline(
        "Opaque",
        PipelineConfig::default_with_shader("scene")
            .with_label("Opaque Pipeline")
            .with_bind_group_layouts(&["globals", "object", "material"])
            .with_color_format(format)
            .with_blend(Some(wgpu::BlendState::REPLACE))
            .with_depth(depth, true, wgpu::CompareFunction::Less),
    );

    // Double sided so the back of glass and water shows through
    pipeline_manager.register_pipeline(
        "Transparent",
        PipelineConfig::default_with_shader("scene")
            .with_label("Transparent Pipeline")
            .with_bind_group_layouts(&["globals", "object", "material"])
            .with_color_format(format)
            .with_cull_mode(None)
            .with_blend(Some(wgpu::BlendState::ALPHA_BLENDING))
            .with_depth(depth, false, wgpu::CompareFunction::Less),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{
            resources::material::Material,
            scene::{node::Transform, scene::tests::empty_scene, NodeHandle},
        },
        options::OptionsStore,
        views::ArtView,
    };
    use cgmath::Vector3;

    type NodeState = (NodeHandle, String, Transform, bool, Option<String>);

    fn scene_snapshot(scene: &Scene) -> (Vec<NodeState>, Vec<Material>) {
        let nodes = scene
            .nodes()
            .map(|(handle, node)| {
                (
                    handle,
                    node.name.clone(),
                    node.transform,
                    node.visible,
                    node.material.clone(),
                )
            })
            .collect();
        let mut materials: Vec<Material> =
            scene.material_manager.iter().map(|(_, m)| m.clone()).collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        (nodes, materials)
    }

    #[derive(Default)]
    struct FakeSurface {
        size: (u32, u32),
        resizes: usize,
    }

    impl RenderSurface for FakeSurface {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes += 1;
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(10.0, 0.3, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    #[test]
    fn test_resize_updates_surface_and_aspect() {
        let mut camera = camera();
        let mut surface = FakeSurface::default();

        apply_resize(&mut camera, &mut surface, 1600, 800);
        assert_eq!(surface.size(), (1600, 800));
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_zero_size_resize_is_ignored() {
        let mut camera = camera();
        let mut surface = FakeSurface::default();
        apply_resize(&mut camera, &mut surface, 800, 600);

        apply_resize(&mut camera, &mut surface, 0, 600);
        apply_resize(&mut camera, &mut surface, 800, 0);
        assert_eq!(surface.resizes, 1);
        assert_eq!(surface.size(), (800, 600));
        assert_eq!(camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_resize_leaves_scene_untouched() {
        let mut scene = empty_scene();
        let mut store = OptionsStore::default();
        ArtView::new(&mut scene, &mut store).unwrap();
        let mut surface = FakeSurface::default();

        let before = scene_snapshot(&scene);
        apply_resize(&mut scene.rig.camera, &mut surface, 1920, 1080);
        apply_resize(&mut scene.rig.camera, &mut surface, 0, 0);
        assert_eq!(scene_snapshot(&scene), before);
        assert_eq!(store.values(), &crate::options::Options::default());
        assert!((scene.rig.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
