use cgmath::{Matrix4, SquareMatrix, Vector3, Zero};

/// Camera block of the globals uniform
///
/// The eye is stored as a `vec4` to keep 16 byte alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    /// Used by the skybox to turn screen positions back into view rays
    pub inv_view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// A singular `view_proj` gets an identity inverse
    pub fn new(eye: Vector3<f32>, view_proj: Matrix4<f32>) -> Self {
        let inverse = view_proj.invert().unwrap_or_else(Matrix4::identity);
        Self {
            view_position: eye.extend(1.0).into(),
            view_proj: view_proj.into(),
            inv_view_proj: inverse.into(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Vector3::zero(), Matrix4::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_undoes_view_proj() {
        let view_proj = Matrix4::from_translation(Vector3::new(1.0, -2.0, 3.0))
            * Matrix4::from_nonuniform_scale(2.0, 4.0, 1.0);
        let uniform = CameraUniform::new(Vector3::new(0.0, 5.0, 0.0), view_proj);

        let product = Matrix4::from(uniform.view_proj) * Matrix4::from(uniform.inv_view_proj);
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        let product: [[f32; 4]; 4] = product.into();
        for (row, expected) in product.iter().zip(identity) {
            for (value, want) in row.iter().zip(expected) {
                assert!((value - want).abs() < 1e-6);
            }
        }
        assert_eq!(uniform.view_position, [0.0, 5.0, 0.0, 1.0]);
    }

    #[test]
    fn test_singular_matrix_gets_identity_inverse() {
        let flat = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
        let uniform = CameraUniform::new(Vector3::zero(), flat);
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        assert_eq!(uniform.inv_view_proj, identity);
    }
}
