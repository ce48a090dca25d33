use winit::{
    event::{DeviceEvent, KeyEvent},
    keyboard::PhysicalKey,
};

use super::{controller::CameraController, orbit_camera::OrbitCamera};

/// The scene camera together with the input controller that steers it
pub struct CameraRig {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraRig {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn handle_device(&mut self, event: &DeviceEvent) {
        if let Some(action) = self.controller.on_device(event) {
            action.apply(&mut self.camera);
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        if let Some(action) = self.controller.on_key(key, event.state) {
            action.apply(&mut self.camera);
        }
    }
}
