//! Aquasphere
//!
//! A small real-time 3D demo built on wgpu and winit: a water plane, three
//! spheres with different surfaces, two lights and an ImGui control panel
//! whose fields are bound to the scene.
//!
//! The scene, options, bindings and animation are plain data and run without
//! a GPU. [`DemoApp`] connects them to a window.

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod gfx;
pub mod options;
pub mod routes;
pub mod ui;
pub mod views;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::DemoApp;
pub use config::DemoConfig;

/// Runs the demo with configuration taken from the environment
pub fn run() -> anyhow::Result<()> {
    DemoApp::new(DemoConfig::from_env())?.run()
}
