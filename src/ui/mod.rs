//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the scene.
//!
//! - [`UiManager`] - ImGui context, winit input glue and wgpu renderer
//! - [`panel`] - control panel writing through the options store
//! - [`nav`] - menu bar links switching between routes
//!
//! While ImGui wants the mouse or keyboard, camera input is suppressed by the
//! app so dragging a slider does not orbit the view.

pub mod manager;
pub mod nav;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{ControlPanel, PanelField, Widget};
