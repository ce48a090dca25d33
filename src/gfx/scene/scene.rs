use slotmap::SlotMap;

use crate::gfx::{
    camera::CameraRig,
    resources::material::{Material, MaterialManager},
};

use super::node::{Light, Node, NodeHandle};

/// Main scene containing nodes, materials, and camera
pub struct Scene {
    pub rig: CameraRig,
    pub material_manager: MaterialManager,
    nodes: SlotMap<NodeHandle, Node>,
}

impl Scene {
    pub fn new(rig: CameraRig) -> Self {
        Self {
            rig,
            material_manager: MaterialManager::new(),
            nodes: SlotMap::with_key(),
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.rig.camera.update_view_proj();
    }

    /// Adds a node and returns its handle
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        log::debug!("Adding scene node '{}'", node.name);
        self.nodes.insert(node)
    }

    /// Removes a node. The handle and any copies of it become stale.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Option<Node> {
        self.nodes.remove(handle)
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Sets visibility of a node. Stale handles are ignored.
    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) {
        match self.nodes.get_mut(handle) {
            Some(node) => node.visible = visible,
            None => log::warn!("set_visible on a removed node"),
        }
    }

    pub fn is_visible(&self, handle: NodeHandle) -> bool {
        self.nodes.get(handle).is_some_and(|node| node.visible)
    }

    /// Points a node at another material by name
    pub fn set_material(&mut self, handle: NodeHandle, material_id: &str) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.material = Some(material_id.to_string());
        }
    }

    /// Visible light nodes with their world position
    pub fn lights(&self) -> impl Iterator<Item = (&Light, cgmath::Vector3<f32>)> {
        self.nodes
            .values()
            .filter(|node| node.visible)
            .filter_map(|node| node.as_light().map(|light| (light, node.transform.position)))
    }

    /// Creates a new material and adds it to the material manager
    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    pub fn material(&self, id: &str) -> Option<&Material> {
        self.material_manager.get_material(id)
    }

    pub fn material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.material_manager.get_material_mut(id)
    }

    /// Gets the material used to draw a node
    pub fn get_material_for_object(&self, node: &Node) -> &Material {
        self.material_manager
            .get_material_for_object(node.material.as_deref())
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        let drawables = self.nodes.values().filter_map(Node::drawable);
        let (mesh_count, total_triangles) = drawables.fold((0, 0), |(count, tris), mesh| {
            (count + 1, tris + mesh.index_count() / 3)
        });

        SceneStatistics {
            node_count: self.nodes.len(),
            mesh_count,
            light_count: self.lights().count(),
            material_count: self.material_manager.list_materials().len(),
            total_triangles,
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gfx::{
        camera::{CameraController, OrbitCamera},
        geometry::generate_sphere,
        scene::node::LightKind,
    };
    use cgmath::Vector3;

    pub(crate) fn empty_scene() -> Scene {
        let camera = OrbitCamera::new(10.0, 0.3, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        Scene::new(CameraRig::new(camera, CameraController::new(0.005, 0.1)))
    }

    #[test]
    fn test_add_and_remove_nodes() {
        let mut scene = empty_scene();
        let sphere = scene.add_node(Node::mesh("sphere", generate_sphere(1.0, 8, 6).into_mesh(), "default"));
        let other = scene.add_node(Node::mesh("other", generate_sphere(1.0, 8, 6).into_mesh(), "default"));

        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.node(other).map(|node| node.name.as_str()), Some("other"));

        let removed = scene.remove_node(sphere).map(|node| node.name);
        assert_eq!(removed.as_deref(), Some("sphere"));
        assert!(scene.node(sphere).is_none());
        assert!(scene.node(other).is_some());
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut scene = empty_scene();
        let first = scene.add_node(Node::light(
            "a",
            Light { kind: LightKind::Ambient, color: [1.0; 3], intensity: 1.0 },
        ));
        scene.remove_node(first);
        let second = scene.add_node(Node::light(
            "b",
            Light { kind: LightKind::Ambient, color: [1.0; 3], intensity: 1.0 },
        ));

        assert_ne!(first, second);
        assert!(scene.node(first).is_none());
        scene.set_visible(first, false);
        assert!(scene.is_visible(second));
    }

    #[test]
    fn test_hidden_lights_are_skipped() {
        let mut scene = empty_scene();
        let sun = scene.add_node(
            Node::light(
                "sun",
                Light { kind: LightKind::Directional, color: [1.0; 3], intensity: 0.8 },
            )
            .at(5.0, 10.0, 5.0),
        );

        let positions: Vec<_> = scene.lights().map(|(_, p)| p).collect();
        assert_eq!(positions, vec![Vector3::new(5.0, 10.0, 5.0)]);

        scene.set_visible(sun, false);
        assert_eq!(scene.lights().count(), 0);
    }

    #[test]
    fn test_statistics_count_drawables() {
        let mut scene = empty_scene();
        scene.add_node(Node::mesh("sphere", generate_sphere(1.0, 8, 6).into_mesh(), "default"));
        scene.add_node(Node::light(
            "ambient",
            Light { kind: LightKind::Ambient, color: [1.0; 3], intensity: 0.3 },
        ));

        let stats = scene.get_statistics();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.light_count, 1);
        assert_eq!(stats.total_triangles, 96);
    }
}
