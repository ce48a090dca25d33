//! Global uniform bindings for camera, lighting and environment textures
//!
//! Group 0 of every pipeline. The uniform is rebuilt every frame from the
//! camera and the visible light nodes of the scene.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::{
        camera::CameraUniform,
        scene::{LightKind, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// MUST match `Globals` in `scene.wgsl` and `skybox.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    /// rgb = summed ambient light
    pub ambient: [f32; 4],
    /// xyz = direction the light travels, w = 1 when a directional light is on
    pub light_dir: [f32; 4],
    /// rgb = directional color times intensity
    pub light_color: [f32; 4],
    /// x = elapsed seconds
    pub params: [f32; 4],
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Lighting gathered from the visible light nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingState {
    pub ambient: [f32; 3],
    /// Direction and premultiplied color of the first visible directional light
    pub directional: Option<([f32; 3], [f32; 3])>,
}

impl LightingState {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut ambient = [0.0f32; 3];
        let mut directional = None;

        for (light, position) in scene.lights() {
            let color = light.color.map(|c| c * light.intensity);
            match light.kind {
                LightKind::Ambient => {
                    for (sum, c) in ambient.iter_mut().zip(color) {
                        *sum += c;
                    }
                }
                LightKind::Directional if directional.is_none() => {
                    // Shines from its position towards the origin
                    let direction = if position.magnitude2() > 0.0 {
                        -position.normalize()
                    } else {
                        -Vector3::unit_y()
                    };
                    directional = Some((direction.into(), color));
                }
                LightKind::Directional => {
                    log::debug!("Only the first directional light is used");
                }
            }
        }

        Self {
            ambient,
            directional,
        }
    }
}

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, lighting: &LightingState, time_seconds: f32) -> Self {
        let [ar, ag, ab] = lighting.ambient;
        let (light_dir, light_color) = match lighting.directional {
            Some(([x, y, z], [r, g, b])) => ([x, y, z, 1.0], [r, g, b, 1.0]),
            None => ([0.0, -1.0, 0.0, 0.0], [0.0; 4]),
        };

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            inv_view_proj: camera.inv_view_proj,
            ambient: [ar, ag, ab, 1.0],
            light_dir,
            light_color,
            params: [time_seconds, 0.0, 0.0, 0.0],
        }
    }
}

/// Layout and bind group of group 0
///
/// Bindings: 0 globals, 1 environment cube, 2 environment sampler,
/// 3 normal map, 4 normal map sampler, 5 skybox cube.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let filtering = wgpu::SamplerBindingType::Filtering;
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_cube())
            .next_binding_fragment(binding_types::sampler(filtering))
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(filtering))
            .next_binding_fragment(binding_types::texture_cube())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(
        &mut self,
        device: &wgpu::Device,
        ubo: &GlobalUBO,
        environment: &TextureResource,
        normal_map: &TextureResource,
        skybox: &TextureResource,
    ) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .texture(&environment.view)
                .sampler(&environment.sampler)
                .texture(&normal_map.view)
                .sampler(&normal_map.sampler)
                .texture(&skybox.view)
                .create(device, "Globals Bind Group"),
        );
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until textures have been bound
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{scene::tests::empty_scene, Light, Node};
    use approx::assert_relative_eq;

    fn light(kind: LightKind, intensity: f32) -> Light {
        Light {
            kind,
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }

    #[test]
    fn test_uniform_size_is_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 16 + 64 + 64 + 16 * 4);
    }

    #[test]
    fn test_lighting_from_visible_lights() {
        let mut scene = empty_scene();
        scene.add_node(Node::light("ambient", light(LightKind::Ambient, 0.25)));
        let sun = scene.add_node(
            Node::light("sun", light(LightKind::Directional, 0.5)).at(0.0, 10.0, 0.0),
        );

        let lighting = LightingState::from_scene(&scene);
        assert_eq!(lighting.ambient, [0.25; 3]);
        let (direction, color) = lighting.directional.unwrap();
        assert_relative_eq!(direction[1], -1.0);
        assert_eq!(color, [0.5; 3]);

        scene.set_visible(sun, false);
        let lighting = LightingState::from_scene(&scene);
        assert!(lighting.directional.is_none());

        let content = GlobalUBOContent::new(&CameraUniform::default(), &lighting, 2.0);
        assert_eq!(content.light_dir[3], 0.0);
        assert_eq!(content.light_color, [0.0; 4]);
        assert_eq!(content.params[0], 2.0);
    }

    #[test]
    fn test_no_lights_means_black() {
        let lighting = LightingState::from_scene(&empty_scene());
        assert_eq!(lighting.ambient, [0.0; 3]);
        assert!(lighting.directional.is_none());
    }
}
