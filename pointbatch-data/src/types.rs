//! Core data types for loaded point clouds and their draw instances.
//!
//! These are CPU-side representations. The packed GPU layout of an instance
//! matrix lives in pointbatch-render.

use glam::{Mat4, Quat, Vec3};

/// A loaded point, already re-centered, axis-swapped and scaled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Position in world space.
    pub position: Vec3,
}

impl Vertex {
    /// Create a vertex at the given position.
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl From<Vec3> for Vertex {
    fn from(position: Vec3) -> Self {
        Self::new(position)
    }
}

/// Per-instance placement of the shared mesh for one vertex.
///
/// Stored as position/rotation/scale; the matrix is derived on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    /// Translation in world space.
    pub position: Vec3,
    /// Rotation, identity for point instances.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl InstanceTransform {
    /// Create an instance for a vertex with uniform scale and no rotation.
    pub fn from_vertex(vertex: &Vertex, scale: f32) -> Self {
        Self {
            position: vertex.position,
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(scale),
        }
    }

    /// Model matrix composed as translation × rotation × scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_from_vec3() {
        let v: Vertex = Vec3::new(1.0, 2.0, 3.0).into();
        assert_eq!(v.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_instance_from_vertex() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0));
        let inst = InstanceTransform::from_vertex(&v, 0.1);
        assert_eq!(inst.position, v.position);
        assert_eq!(inst.rotation, Quat::IDENTITY);
        assert_eq!(inst.scale, Vec3::splat(0.1));
    }

    #[test]
    fn test_instance_matrix_scales_then_translates() {
        let inst = InstanceTransform::from_vertex(&Vertex::new(Vec3::new(5.0, 0.0, -2.0)), 0.5);
        let m = inst.matrix();

        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(5.0, 0.0, -2.0));
        let p = m.transform_point3(Vec3::new(2.0, 2.0, 2.0));
        assert!((p - Vec3::new(6.0, 1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_default_instance_is_identity() {
        assert_eq!(InstanceTransform::default().matrix(), Mat4::IDENTITY);
    }
}
