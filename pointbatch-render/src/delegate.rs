//! Draw backend trait and per-frame submission.
//!
//! This module provides the `InstancedDraw` trait a host implements to
//! receive instanced draw calls, and the `render` loop that feeds it.

use glam::{Mat4, Vec3};
use pointbatch_data::Batch;
use std::num::NonZeroUsize;
use tracing::trace;

/// Scene bounds computed from vertex positions.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub radius: f32,
}

impl SceneBounds {
    /// Compute bounds from an iterator of positions.
    pub fn from_positions(positions: impl Iterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut count = 0;

        for pos in positions {
            min = min.min(pos);
            max = max.max(pos);
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        let center = (min + max) * 0.5;
        let radius = (max - min).length().max(1.0);
        Self {
            min,
            max,
            center,
            radius,
        }
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

/// Draw calls and instances submitted during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub instances: usize,
}

/// Host-side instanced draw primitive. Implement this to put point batches on
/// screen with whatever graphics API the host uses.
pub trait InstancedDraw {
    /// Handle to the shape drawn at every point.
    type Mesh;
    /// Handle to the shading parameters for that shape.
    type Material;

    /// Largest instance count accepted by a single draw. Default is None (no limit).
    fn max_instances_per_draw(&self) -> Option<NonZeroUsize> {
        None
    }

    /// Record one draw of `mesh` per entry in `transforms`.
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Self::Mesh,
        material: &Self::Material,
        transforms: &[Mat4],
    );
}

/// Submit every batch as one instanced draw call.
///
/// `scratch` receives each batch's matrices in turn so repeated frames do not
/// allocate.
pub fn render<B: InstancedDraw>(
    batches: &[Batch],
    mesh: &B::Mesh,
    material: &B::Material,
    backend: &mut B,
    scratch: &mut Vec<Mat4>,
) -> FrameStats {
    let mut stats = FrameStats::default();

    for batch in batches {
        batch.write_matrices(scratch);
        backend.draw_mesh_instanced(mesh, material, scratch);
        stats.draw_calls += 1;
        stats.instances += scratch.len();
    }

    trace!(
        "Submitted {} instances in {} draw calls",
        stats.instances, stats.draw_calls
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointbatch_data::{Vertex, partition};

    struct CountingBackend {
        calls: Vec<usize>,
    }

    impl InstancedDraw for CountingBackend {
        type Mesh = ();
        type Material = ();

        fn draw_mesh_instanced(&mut self, _mesh: &(), _material: &(), transforms: &[Mat4]) {
            self.calls.push(transforms.len());
        }
    }

    #[test]
    fn test_bounds_from_positions() {
        let bounds = SceneBounds::from_positions(
            [Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 1.0)].into_iter(),
        );
        assert_eq!(bounds.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 4.0, 1.0));
        assert_eq!(bounds.center, Vec3::new(0.0, 2.0, 0.5));
    }

    #[test]
    fn test_bounds_empty_and_degenerate() {
        assert_eq!(SceneBounds::from_positions(std::iter::empty()), SceneBounds::default());

        let single = SceneBounds::from_positions(std::iter::once(Vec3::ONE));
        assert_eq!(single.center, Vec3::ONE);
        assert_eq!(single.radius, 1.0);
    }

    #[test]
    fn test_render_one_call_per_batch() {
        let vertices: Vec<Vertex> = (0..7)
            .map(|i| Vertex::new(Vec3::splat(i as f32)))
            .collect();
        let batches = partition(&vertices, NonZeroUsize::new(3).unwrap());
        let mut backend = CountingBackend { calls: Vec::new() };
        let mut scratch = Vec::new();

        let stats = render(&batches, &(), &(), &mut backend, &mut scratch);

        assert_eq!(backend.calls, vec![3, 3, 1]);
        assert_eq!(
            stats,
            FrameStats {
                draw_calls: 3,
                instances: 7
            }
        );
    }

    #[test]
    fn test_render_nothing() {
        let mut backend = CountingBackend { calls: Vec::new() };
        let stats = render(&[], &(), &(), &mut backend, &mut Vec::new());
        assert!(backend.calls.is_empty());
        assert_eq!(stats, FrameStats::default());
    }
}
