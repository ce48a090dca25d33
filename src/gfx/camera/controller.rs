//! Translates raw mouse and keyboard input into camera moves
//!
//! Left drag orbits, shift + left drag pans, the wheel zooms and
//! shift + C restores the initial view.

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta},
    keyboard::KeyCode,
};

use super::orbit_camera::OrbitCamera;

const LEFT_BUTTON: u32 = 0;

/// One camera move requested by input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    Orbit { yaw: f32, pitch: f32 },
    Pan { right: f32, up: f32 },
    Zoom(f32),
    Reset,
}

impl CameraAction {
    pub fn apply(self, camera: &mut OrbitCamera) {
        match self {
            CameraAction::Orbit { yaw, pitch } => {
                camera.add_yaw(yaw);
                camera.add_pitch(pitch);
            }
            CameraAction::Pan { right, up } => camera.pan((right, up)),
            CameraAction::Zoom(amount) => camera.add_distance(amount),
            CameraAction::Reset => {
                log::debug!("Resetting camera to its initial view");
                camera.reset_to_default();
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    shift_held: bool,
    dragging: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            shift_held: false,
            dragging: false,
        }
    }

    pub fn on_device(&mut self, event: &DeviceEvent) -> Option<CameraAction> {
        match event {
            DeviceEvent::Button {
                button: LEFT_BUTTON,
                state,
            } => {
                self.dragging = state.is_pressed();
                None
            }
            DeviceEvent::MouseWheel { delta } => {
                let lines = match *delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32,
                };
                Some(CameraAction::Zoom(-lines * self.zoom_speed))
            }
            DeviceEvent::MouseMotion { delta: (dx, dy) } if self.dragging => {
                Some(self.drag(*dx as f32, *dy as f32))
            }
            _ => None,
        }
    }

    pub fn on_key(&mut self, key: KeyCode, state: ElementState) -> Option<CameraAction> {
        match key {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.shift_held = state.is_pressed();
                None
            }
            KeyCode::KeyC if self.shift_held && state.is_pressed() => Some(CameraAction::Reset),
            _ => None,
        }
    }

    fn drag(&self, dx: f32, dy: f32) -> CameraAction {
        if self.shift_held {
            CameraAction::Pan {
                right: -dx * self.pan_speed,
                up: dy * self.pan_speed,
            }
        } else {
            CameraAction::Orbit {
                yaw: -dx * self.rotate_speed,
                pitch: dy * self.rotate_speed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn press_left(controller: &mut CameraController) {
        controller.on_device(&DeviceEvent::Button {
            button: LEFT_BUTTON,
            state: ElementState::Pressed,
        });
    }

    fn motion(dx: f64, dy: f64) -> DeviceEvent {
        DeviceEvent::MouseMotion { delta: (dx, dy) }
    }

    #[test]
    fn test_motion_without_drag_does_nothing() {
        let mut controller = CameraController::new(0.01, 0.5);
        assert_eq!(controller.on_device(&motion(5.0, 5.0)), None);
    }

    #[test]
    fn test_drag_orbits_and_shift_drag_pans() {
        let mut controller = CameraController::new(0.5, 0.5);
        controller.pan_speed = 0.25;
        press_left(&mut controller);
        assert_eq!(
            controller.on_device(&motion(10.0, -20.0)),
            Some(CameraAction::Orbit { yaw: -5.0, pitch: -10.0 })
        );

        controller.on_key(KeyCode::ShiftLeft, ElementState::Pressed);
        assert_eq!(
            controller.on_device(&motion(100.0, 50.0)),
            Some(CameraAction::Pan { right: -25.0, up: 12.5 })
        );

        controller.on_device(&DeviceEvent::Button {
            button: LEFT_BUTTON,
            state: ElementState::Released,
        });
        assert_eq!(controller.on_device(&motion(1.0, 1.0)), None);
    }

    #[test]
    fn test_wheel_zooms_in_on_scroll_up() {
        let mut controller = CameraController::new(0.01, 0.5);
        let action = controller.on_device(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
        });
        assert_eq!(action, Some(CameraAction::Zoom(-1.0)));

        let mut camera = OrbitCamera::new(10.0, 0.3, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        action.unwrap().apply(&mut camera);
        assert!(camera.distance < 10.0);
    }

    #[test]
    fn test_reset_needs_shift() {
        let mut controller = CameraController::new(0.01, 0.5);
        assert_eq!(controller.on_key(KeyCode::KeyC, ElementState::Pressed), None);

        controller.on_key(KeyCode::ShiftRight, ElementState::Pressed);
        assert_eq!(controller.on_key(KeyCode::KeyC, ElementState::Released), None);
        assert_eq!(
            controller.on_key(KeyCode::KeyC, ElementState::Pressed),
            Some(CameraAction::Reset)
        );

        controller.on_key(KeyCode::ShiftRight, ElementState::Released);
        assert_eq!(controller.on_key(KeyCode::KeyC, ElementState::Pressed), None);
    }

    #[test]
    fn test_reset_action_restores_eye() {
        let mut camera = OrbitCamera::new(12.0, 0.3, 0.5, Vector3::new(0.0, 1.0, 0.0), 1.0);
        let initial = camera.eye;
        CameraAction::Orbit { yaw: 1.0, pitch: 0.2 }.apply(&mut camera);
        CameraAction::Pan { right: 0.5, up: 0.0 }.apply(&mut camera);
        assert!((camera.eye - initial).magnitude() > 1.0);

        CameraAction::Reset.apply(&mut camera);
        assert!((camera.eye - initial).magnitude() < 1e-5);
    }
}
