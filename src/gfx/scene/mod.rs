//! # Scene Management Module
//!
//! The scene graph of the demo: nodes (meshes, lights, helpers) addressed by
//! generational [`NodeHandle`]s, the material library, and the camera.
//!
//! - [`Scene`] - container for nodes, materials and the camera
//! - [`Node`] - one element with a transform, visibility and material reference
//! - [`Vertex3D`] - GPU vertex format with position, normal and UV
//!
//! The scene holds no GPU state, so everything in it can be built and
//! mutated without a device; the render engine mirrors what it needs.

pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{Light, LightKind, Mesh, Node, NodeHandle, NodeKind, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
