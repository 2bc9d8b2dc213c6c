//! In-memory draw backend.
//!
//! Records every instanced draw instead of issuing it. Used for headless runs
//! and to observe what a frame would submit.

use crate::{InstanceRaw, InstancedDraw, instance_bytes};
use glam::Mat4;
use std::num::NonZeroUsize;

/// One recorded instanced draw.
#[derive(Debug, Clone)]
pub struct DrawCall<M, T> {
    pub mesh: M,
    pub material: T,
    pub instances: Vec<InstanceRaw>,
}

/// Backend that keeps submitted draws in memory.
#[derive(Debug)]
pub struct RecordingBackend<M, T> {
    instance_limit: Option<NonZeroUsize>,
    calls: Vec<DrawCall<M, T>>,
    uploaded_bytes: usize,
}

impl<M, T> RecordingBackend<M, T> {
    pub fn new() -> Self {
        Self {
            instance_limit: None,
            calls: Vec::new(),
            uploaded_bytes: 0,
        }
    }

    /// Advertise a per-draw instance limit, like a real instancing API would.
    pub fn with_instance_limit(mut self, limit: NonZeroUsize) -> Self {
        self.instance_limit = Some(limit);
        self
    }

    /// Draws recorded since the last [`clear`](Self::clear).
    pub fn calls(&self) -> &[DrawCall<M, T>] {
        &self.calls
    }

    /// Instance data bytes submitted since creation.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    /// Forget recorded draws, typically at the start of a frame.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl<M, T> Default for RecordingBackend<M, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone, T: Clone> InstancedDraw for RecordingBackend<M, T> {
    type Mesh = M;
    type Material = T;

    fn max_instances_per_draw(&self) -> Option<NonZeroUsize> {
        self.instance_limit
    }

    fn draw_mesh_instanced(&mut self, mesh: &M, material: &T, transforms: &[Mat4]) {
        let instances: Vec<InstanceRaw> = transforms.iter().map(InstanceRaw::from).collect();
        self.uploaded_bytes += instance_bytes(&instances).len();
        self.calls.push(DrawCall {
            mesh: mesh.clone(),
            material: material.clone(),
            instances,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_records_draws() {
        let mut backend = RecordingBackend::new();
        let transforms = [Mat4::from_translation(Vec3::X), Mat4::IDENTITY];

        backend.draw_mesh_instanced(&1u32, &"lit", &transforms);

        assert_eq!(backend.calls().len(), 1);
        let call = &backend.calls()[0];
        assert_eq!(call.mesh, 1);
        assert_eq!(call.material, "lit");
        assert_eq!(call.instances[0].matrix(), transforms[0]);
        assert_eq!(backend.uploaded_bytes(), 128);
    }

    #[test]
    fn test_clear_keeps_upload_total() {
        let mut backend = RecordingBackend::new();
        backend.draw_mesh_instanced(&(), &(), &[Mat4::IDENTITY]);
        backend.clear();

        assert!(backend.calls().is_empty());
        assert_eq!(backend.uploaded_bytes(), 64);
    }

    #[test]
    fn test_instance_limit() {
        let backend: RecordingBackend<(), ()> = RecordingBackend::new();
        assert_eq!(backend.max_instances_per_draw(), None);

        let limited = backend.with_instance_limit(NonZeroUsize::new(64).unwrap());
        assert_eq!(limited.max_instances_per_draw(), NonZeroUsize::new(64));
    }
}
