//! # Animation
//!
//! Per-frame transform update of the liquid sphere. The math lives in
//! [`animate`], a pure function of elapsed time and the current options;
//! [`AnimationLoop`] writes its result into the scene and asks a
//! [`FrameRenderer`] to draw exactly once.

pub mod scheduler;

pub use scheduler::{FrameScheduler, Timestep};

use cgmath::Vector3;

use crate::gfx::scene::{NodeHandle, Scene};
use crate::options::Options;

/// Transform components recomputed every frame. Rotation z is never touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedTransform {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
}

/// Computes the oscillation for elapsed time `t_ms`
pub fn animate(t_ms: f64, options: &Options) -> AnimatedTransform {
    let t = t_ms;

    let rotation_x = (options.rotation_speed_x * t / 8000.0).sin() / 2.0;
    let rotation_y = (options.rotation_speed_y * t / 10000.0).cos() / 2.0;

    let position = Vector3::new(
        4.0 + (options.movement_speed_x * t / 8000.0).sin() / 2.0,
        0.7 + (options.movement_speed_y * t / 10000.0).cos() / 2.0,
        (options.movement_speed_z * t / 7000.0).cos() / 2.0,
    );

    // Scale does not depend on any option
    let scale = Vector3::new(
        (t / 3000.0).sin().abs() / 10.0 + 0.9,
        (1.2 + t / 2000.0).cos().abs() / 10.0 + 0.9,
        (t / 5000.0 + 1.2).sin().abs() / 10.0 + 0.9,
    );

    AnimatedTransform {
        rotation_x: rotation_x as f32,
        rotation_y: rotation_y as f32,
        position: position.map(|v| v as f32),
        scale: scale.map(|v| v as f32),
    }
}

/// Receives the single draw request issued per animation frame
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene);
}

/// Drives one designated node from elapsed time
pub struct AnimationLoop {
    target: NodeHandle,
}

impl AnimationLoop {
    pub fn new(target: NodeHandle) -> Self {
        Self { target }
    }

    pub fn target(&self) -> NodeHandle {
        self.target
    }

    /// Applies [`animate`] to the target node, then renders once
    pub fn frame<R: FrameRenderer + ?Sized>(
        &self,
        t_ms: f64,
        options: &Options,
        scene: &mut Scene,
        renderer: &mut R,
    ) {
        let animated = animate(t_ms, options);

        match scene.node_mut(self.target) {
            Some(node) => {
                let transform = &mut node.transform;
                transform.rotation.x = animated.rotation_x;
                transform.rotation.y = animated.rotation_y;
                transform.position = animated.position;
                transform.scale = animated.scale;
            }
            None => log::warn!("Animated node is gone, skipping transform update"),
        }

        renderer.render(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_sphere,
        scene::{scene::tests::empty_scene, Node},
    };
    use approx::assert_relative_eq;

    struct CountingRenderer {
        calls: usize,
        seen_position: Option<Vector3<f32>>,
        target: NodeHandle,
    }

    impl FrameRenderer for CountingRenderer {
        fn render(&mut self, scene: &Scene) {
            self.calls += 1;
            self.seen_position = scene.node(self.target).map(|node| node.transform.position);
        }
    }

    fn speeds(value: f64) -> Options {
        Options {
            rotation_speed_x: value,
            rotation_speed_y: value,
            movement_speed_x: value,
            movement_speed_y: value,
            movement_speed_z: value,
            ..Options::default()
        }
    }

    #[test]
    fn test_values_at_time_zero() {
        let animated = animate(0.0, &Options::default());
        assert_relative_eq!(animated.rotation_x, 0.0);
        assert_relative_eq!(animated.rotation_y, 0.5);
        assert_relative_eq!(animated.position.x, 4.0);
        assert_relative_eq!(animated.position.y, 1.2);
        assert_relative_eq!(animated.position.z, 0.5);
        assert_relative_eq!(animated.scale.x, 0.9);
        assert_relative_eq!(animated.scale.y, (1.2f64.cos().abs() / 10.0 + 0.9) as f32);
        assert_relative_eq!(animated.scale.z, (1.2f64.sin().abs() / 10.0 + 0.9) as f32);
    }

    #[test]
    fn test_matches_formulas_at_arbitrary_time() {
        let options = Options {
            rotation_speed_x: 2.0,
            movement_speed_z: 3.0,
            ..Options::default()
        };
        let t = 12_345.0;
        let animated = animate(t, &options);

        assert_relative_eq!(animated.rotation_x, ((2.0 * t / 8000.0).sin() / 2.0) as f32);
        assert_relative_eq!(animated.position.z, ((3.0 * t / 7000.0).cos() / 2.0) as f32);
        assert_relative_eq!(animated.scale.x, ((t / 3000.0).sin().abs() / 10.0 + 0.9) as f32);
    }

    #[test]
    fn test_scale_stays_within_band() {
        for step in 0..2000 {
            let t = step as f64 * 37.5;
            for options in [speeds(0.0), speeds(1.0), speeds(10.0)] {
                let scale = animate(t, &options).scale;
                for component in [scale.x, scale.y, scale.z] {
                    assert!((0.9..=1.0 + 1e-6).contains(&component), "{component} at t={t}");
                }
            }
        }
    }

    #[test]
    fn test_zero_speeds_freeze_rotation() {
        for t in [0.0, 500.0, 90_000.0, 1.0e7] {
            let animated = animate(t, &speeds(0.0));
            assert_eq!(animated.rotation_x, 0.0);
            assert_relative_eq!(animated.rotation_y, 0.5);
            assert_relative_eq!(animated.position.x, 4.0);
        }
    }

    #[test]
    fn test_frame_writes_node_and_renders_once() {
        let mut scene = empty_scene();
        let mut node = Node::mesh("liquid", generate_sphere(1.0, 8, 6).into_mesh(), "default");
        node.transform.rotation.z = 0.75;
        let handle = scene.add_node(node);

        let animation = AnimationLoop::new(handle);
        let mut renderer = CountingRenderer { calls: 0, seen_position: None, target: handle };
        animation.frame(4000.0, &Options::default(), &mut scene, &mut renderer);

        let expected = animate(4000.0, &Options::default());
        let transform = &scene.node(handle).unwrap().transform;
        assert_eq!(renderer.calls, 1);
        assert_eq!(renderer.seen_position, Some(expected.position));
        assert_eq!(transform.scale, expected.scale);
        assert_eq!(transform.rotation.x, expected.rotation_x);
        assert_eq!(transform.rotation.z, 0.75);
    }

    #[test]
    fn test_missing_node_still_renders() {
        let mut scene = empty_scene();
        let handle = scene.add_node(Node::mesh("liquid", generate_sphere(1.0, 8, 6).into_mesh(), "default"));
        scene.remove_node(handle);

        let mut renderer = CountingRenderer { calls: 0, seen_position: None, target: handle };
        AnimationLoop::new(handle).frame(10.0, &Options::default(), &mut scene, &mut renderer);

        assert_eq!(renderer.calls, 1);
        assert_eq!(renderer.seen_position, None);
    }
}
