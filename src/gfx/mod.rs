//! # Graphics Module
//!
//! Everything needed to put the demo scene on screen.
//!
//! - **Camera System** ([`camera`]) - orbit camera with mouse and keyboard controls
//! - **Geometry** ([`geometry`]) - procedural spheres, planes and cubes
//! - **Rendering Pipeline** ([`rendering`]) - skybox, opaque and transparent passes
//! - **Scene Management** ([`scene`]) - nodes, lights and materials
//! - **Resource Management** ([`resources`]) - materials, textures and global bindings
//!
//! The scene is plain data. The [`RenderEngine`] mirrors it to the GPU every
//! frame, so views and options can mutate it without touching a device.
//!
//! ```no_run
//! use aquasphere::gfx::{scene::Scene, RenderEngine};
//!
//! // The engine is created by the app once a window exists:
//! // let engine = RenderEngine::new(window, width, height, present_mode).await?;
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
