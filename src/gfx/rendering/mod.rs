//! Core rendering functionality
//!
//! Handles render pipelines, GPU mirrors of the scene, draw ordering and
//! frame rendering.

pub mod draw_list;
pub mod gpu_cache;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use draw_list::{DrawItem, DrawList};
pub use gpu_cache::{GpuCache, ObjectUniform};
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager, PipelineStats};
pub use render_engine::{apply_resize, RenderEngine, RenderSurface};
