//! Content of the two routes
//!
//! - [`home`] - landing panel shown at "/"
//! - [`art`] - the 3D scene, its bindings and animation shown at "/Art"

pub mod art;
pub mod home;

pub use art::{ArtView, SceneHandles};
