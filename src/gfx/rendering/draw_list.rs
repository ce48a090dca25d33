//! Per-frame draw ordering
//!
//! Opaque nodes are drawn first in any order; transparent ones afterwards,
//! farthest from the camera first so blending composes correctly.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::{
    resources::material::MaterialId,
    scene::{NodeHandle, Scene},
};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub handle: NodeHandle,
    pub material: MaterialId,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawList {
    pub opaque: Vec<DrawItem>,
    pub transparent: Vec<DrawItem>,
}

impl DrawList {
    /// Collects visible drawable nodes as seen from `eye`
    pub fn build(scene: &Scene, eye: Vector3<f32>) -> Self {
        let mut list = DrawList::default();
        let mut transparent = Vec::new();

        for (handle, node) in scene.nodes() {
            if !node.visible || node.drawable().is_none() {
                continue;
            }
            let material = scene.get_material_for_object(node);
            let item = DrawItem {
                handle,
                material: material.name.clone(),
            };
            if material.is_transparent() {
                let distance = (node.transform.position - eye).magnitude2();
                transparent.push((distance, item));
            } else {
                list.opaque.push(item);
            }
        }

        transparent.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        list.transparent = transparent.into_iter().map(|(_, item)| item).collect();
        list
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_cube,
        resources::material::Material,
        scene::{scene::tests::empty_scene, Light, LightKind, Node},
    };

    #[test]
    fn test_transparent_nodes_sorted_back_to_front() {
        let mut scene = empty_scene();
        scene.add_material(Material::new("glass", [1.0; 3]).with_opacity(0.5));

        let near = scene.add_node(Node::mesh("near", generate_cube(1.0).into_mesh(), "glass").at(0.0, 0.0, 2.0));
        let far = scene.add_node(Node::mesh("far", generate_cube(1.0).into_mesh(), "glass").at(0.0, 0.0, -8.0));
        let solid = scene.add_node(Node::mesh("solid", generate_cube(1.0).into_mesh(), "default"));

        let list = DrawList::build(&scene, Vector3::new(0.0, 0.0, 5.0));
        let order: Vec<_> = list.transparent.iter().map(|item| item.handle).collect();
        assert_eq!(order, vec![far, near]);
        assert_eq!(list.opaque.len(), 1);
        assert_eq!(list.opaque[0].handle, solid);
    }

    #[test]
    fn test_hidden_nodes_and_lights_are_skipped() {
        let mut scene = empty_scene();
        let hidden = scene.add_node(Node::mesh("hidden", generate_cube(1.0).into_mesh(), "default"));
        scene.set_visible(hidden, false);
        scene.add_node(Node::light(
            "sun",
            Light {
                kind: LightKind::Directional,
                color: [1.0; 3],
                intensity: 1.0,
            },
        ));

        assert!(DrawList::build(&scene, Vector3::new(0.0, 0.0, 5.0)).is_empty());
    }

    #[test]
    fn test_opacity_change_moves_node_between_passes() {
        let mut scene = empty_scene();
        scene.add_material(Material::new("fade", [1.0; 3]));
        scene.add_node(Node::mesh("cube", generate_cube(1.0).into_mesh(), "fade"));
        let eye = Vector3::new(0.0, 0.0, 5.0);

        assert_eq!(DrawList::build(&scene, eye).opaque.len(), 1);
        scene.material_mut("fade").unwrap().opacity = 0.4;
        let list = DrawList::build(&scene, eye);
        assert_eq!(list.transparent.len(), 1);
        assert_eq!(list.transparent[0].material, "fade");
    }
}
