//! GPU-side resources and the plain material data they are built from

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent, LightingState};
pub use material::{Material, MaterialManager, MaterialUniform};
pub use texture_resource::TextureResource;
