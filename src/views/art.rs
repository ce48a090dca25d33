//! The "/Art" view: water, three spheres and two lights, with every control
//! panel field bound to the scene state it drives.

use crate::{
    animation::AnimationLoop,
    gfx::{
        geometry::{generate_cube, generate_plane, generate_sphere},
        resources::material::Material,
        scene::{Light, LightKind, Node, NodeHandle, Scene},
    },
    options::{Color, OptionField, Options, OptionsError, OptionsStore},
};

pub const WATER: &str = "water";
pub const COLOR_SPHERE_LIT: &str = "color_sphere_lit";
pub const COLOR_SPHERE_UNLIT: &str = "color_sphere_unlit";
pub const TEXTURE_SPHERE: &str = "texture_sphere";
pub const LIQUID_SPHERE: &str = "liquid_sphere";
pub const LIGHT_HELPER: &str = "light_helper";

const SPHERE_RADIUS: f32 = 1.0;
const SPHERE_SEGMENTS: (u32, u32) = (48, 32);
const LIGHT_POSITION: (f32, f32, f32) = (5.0, 10.0, 5.0);

/// Handles of the nodes the bindings and the animation act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub water: NodeHandle,
    pub color_sphere: NodeHandle,
    pub texture_sphere: NodeHandle,
    pub liquid_sphere: NodeHandle,
    pub ambient_light: NodeHandle,
    pub directional_light: NodeHandle,
    pub light_helper: NodeHandle,
}

impl SceneHandles {
    /// Nodes shown and hidden together by the `enable` field
    pub fn toggled_by_enable(&self) -> [NodeHandle; 5] {
        [
            self.color_sphere,
            self.texture_sphere,
            self.liquid_sphere,
            self.water,
            self.light_helper,
        ]
    }
}

fn color_sphere_material(affected_by_light: bool) -> &'static str {
    if affected_by_light {
        COLOR_SPHERE_LIT
    } else {
        COLOR_SPHERE_UNLIT
    }
}

/// Adds the materials and nodes of the view, initialized from `options`
pub fn build_scene(scene: &mut Scene, options: &Options) -> SceneHandles {
    let sphere_color = options.sphere_color.to_array();
    let color_opacity = options.color_sphere_opacity as f32;

    scene.add_material(
        Material::new(WATER, [0.1, 0.35, 0.5])
            .with_opacity(0.9)
            .with_reflectivity(0.6)
            .with_normal_map(0.3),
    );
    scene.add_material(Material::new(COLOR_SPHERE_LIT, sphere_color).with_opacity(color_opacity));
    scene.add_material(
        Material::new(COLOR_SPHERE_UNLIT, sphere_color)
            .with_opacity(color_opacity)
            .unlit(),
    );
    scene.add_material(
        Material::new(TEXTURE_SPHERE, [1.0, 1.0, 1.0])
            .with_opacity(options.texture_opacity as f32)
            .with_reflectivity(1.0),
    );
    scene.add_material(
        Material::new(LIQUID_SPHERE, [0.85, 0.95, 1.0])
            .with_opacity(options.liquid_opacity as f32)
            .with_refraction(0.75),
    );
    scene.add_material(Material::new(LIGHT_HELPER, [1.0, 0.9, 0.2]).unlit());

    let (long, lat) = SPHERE_SEGMENTS;
    let sphere = || generate_sphere(SPHERE_RADIUS, long, lat).into_mesh();
    let (lx, ly, lz) = LIGHT_POSITION;

    let water = scene.add_node(Node::mesh(
        "water",
        generate_plane(40.0, 40.0, 1, 1).into_mesh(),
        WATER,
    ));
    let color_sphere = scene.add_node(
        Node::mesh(
            "color sphere",
            sphere(),
            color_sphere_material(options.affected_by_light),
        )
        .at(-3.0, 1.5, 0.0),
    );
    let texture_sphere =
        scene.add_node(Node::mesh("texture sphere", sphere(), TEXTURE_SPHERE).at(0.0, 1.5, 0.0));
    // Position is overwritten by the animation every frame
    let liquid_sphere =
        scene.add_node(Node::mesh("liquid sphere", sphere(), LIQUID_SPHERE).at(4.0, 1.2, 0.5));

    let ambient_light = scene.add_node(Node::light(
        "ambient light",
        Light {
            kind: LightKind::Ambient,
            color: [1.0, 1.0, 1.0],
            intensity: 0.35,
        },
    ));
    let directional_light = scene.add_node(
        Node::light(
            "directional light",
            Light {
                kind: LightKind::Directional,
                color: [1.0, 0.98, 0.92],
                intensity: 0.9,
            },
        )
        .at(lx, ly, lz),
    );
    let light_helper = scene.add_node(
        Node::helper("light helper", generate_cube(0.5).into_mesh(), LIGHT_HELPER).at(lx, ly, lz),
    );

    let handles = SceneHandles {
        water,
        color_sphere,
        texture_sphere,
        liquid_sphere,
        ambient_light,
        directional_light,
        light_helper,
    };

    scene.set_visible(ambient_light, options.ambient_light);
    scene.set_visible(directional_light, options.directional_light);
    for handle in handles.toggled_by_enable() {
        scene.set_visible(handle, options.enable);
    }

    handles
}

fn set_color(scene: &mut Scene, material: &str, color: Color) {
    match scene.material_mut(material) {
        Some(material) => material.color = color.to_array(),
        None => log::warn!("Material '{}' is missing", material),
    }
}

fn set_opacity(scene: &mut Scene, material: &str, opacity: f64) {
    match scene.material_mut(material) {
        Some(material) => material.opacity = opacity as f32,
        None => log::warn!("Material '{}' is missing", material),
    }
}

/// Wires every panel field to the scene. `glassOpacity` stays unbound.
pub fn install_bindings(
    store: &mut OptionsStore<Scene>,
    handles: SceneHandles,
) -> Result<(), OptionsError> {
    store.on_color(OptionField::SphereColor, |color, scene| {
        set_color(scene, COLOR_SPHERE_LIT, color);
        set_color(scene, COLOR_SPHERE_UNLIT, color);
    })?;

    store.on_number(OptionField::ColorSphereOpacity, |opacity, scene| {
        set_opacity(scene, COLOR_SPHERE_LIT, opacity);
        set_opacity(scene, COLOR_SPHERE_UNLIT, opacity);
    })?;
    store.on_number(OptionField::TextureOpacity, |opacity, scene| {
        set_opacity(scene, TEXTURE_SPHERE, opacity);
    })?;
    store.on_number(OptionField::LiquidOpacity, |opacity, scene| {
        set_opacity(scene, LIQUID_SPHERE, opacity);
    })?;

    store.on_bool(OptionField::AmbientLight, move |on, scene| {
        scene.set_visible(handles.ambient_light, on);
    })?;
    store.on_bool(OptionField::DirectionalLight, move |on, scene| {
        scene.set_visible(handles.directional_light, on);
    })?;

    store.on_bool(OptionField::AffectedByLight, move |lit, scene| {
        scene.set_material(handles.color_sphere, color_sphere_material(lit));
    })?;

    store.on_bool(OptionField::Enable, move |on, scene| {
        for handle in handles.toggled_by_enable() {
            scene.set_visible(handle, on);
        }
    })?;

    Ok(())
}

/// Scene content and animation of the "/Art" route
pub struct ArtView {
    handles: SceneHandles,
    animation: AnimationLoop,
}

impl ArtView {
    /// Populates `scene` and binds `store` to it
    pub fn new(scene: &mut Scene, store: &mut OptionsStore<Scene>) -> Result<Self, OptionsError> {
        let handles = build_scene(scene, store.values());
        install_bindings(store, handles)?;

        let stats = scene.get_statistics();
        let bindings: usize = OptionField::ALL
            .into_iter()
            .map(|field| store.binding_count(field))
            .sum();
        log::info!(
            "Art scene ready: {} nodes, {} meshes, {} triangles, {} option bindings",
            stats.node_count,
            stats.mesh_count,
            stats.total_triangles,
            bindings
        );

        Ok(Self {
            handles,
            animation: AnimationLoop::new(handles.liquid_sphere),
        })
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }
}
