pub mod controller;
pub mod orbit_camera;
pub mod rig;
pub mod uniform;

pub use controller::{CameraAction, CameraController};
pub use orbit_camera::OrbitCamera;
pub use rig::CameraRig;
pub use uniform::CameraUniform;
