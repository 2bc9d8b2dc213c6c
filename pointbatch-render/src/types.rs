//! Packed per-instance data for GPU upload.

use glam::Mat4;

/// Packed model matrix for one point instance, column-major.
/// Matches a `mat4x4<f32>` per-instance vertex attribute.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub fn from_matrix(model: &Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl From<&Mat4> for InstanceRaw {
    fn from(model: &Mat4) -> Self {
        Self::from_matrix(model)
    }
}

/// View packed instances as bytes for an instance buffer upload.
pub fn instance_bytes(instances: &[InstanceRaw]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
