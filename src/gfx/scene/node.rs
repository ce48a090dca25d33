use cgmath::{Matrix4, Rad, Vector3};

use super::vertex::Vertex3D;
use crate::gfx::resources::material::MaterialId;

slotmap::new_key_type! {
    /// Opaque generational handle to one scene node.
    ///
    /// A handle stays valid until its node is removed; afterwards it
    /// resolves to nothing, even if the slot is reused.
    pub struct NodeHandle;
}

/// CPU-side triangle mesh. GPU buffers live in the render engine's cache.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Position, Euler rotation (radians, applied X then Y then Z) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Model matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light added to every lit surface
    Ambient,
    /// Parallel light shining from the node position towards the origin
    Directional,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// What a node contributes to a frame
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh(Mesh),
    Light(Light),
    /// Debug geometry (e.g. a light marker), always drawn unlit
    Helper(Mesh),
}

/// One element of the scene graph
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    pub material: Option<MaterialId>,
}

impl Node {
    pub fn mesh(name: &str, mesh: Mesh, material: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Mesh(mesh),
            transform: Transform::default(),
            visible: true,
            material: Some(material.to_string()),
        }
    }

    pub fn helper(name: &str, mesh: Mesh, material: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Helper(mesh),
            transform: Transform::default(),
            visible: true,
            material: Some(material.to_string()),
        }
    }

    pub fn light(name: &str, light: Light) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Light(light),
            transform: Transform::default(),
            visible: true,
            material: None,
        }
    }

    /// Builder: place the node
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    /// Returns the drawable mesh for mesh and helper nodes
    pub fn drawable(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) | NodeKind::Helper(mesh) => Some(mesh),
            NodeKind::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}
