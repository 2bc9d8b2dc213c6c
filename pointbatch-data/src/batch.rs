//! Instance batch partitioning.
//!
//! Splits a vertex sequence into ordered, capacity-bounded groups of
//! [`InstanceTransform`], one group per instanced draw call.

use crate::types::{InstanceTransform, Vertex};
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// Instances per draw accepted by most instancing backends.
pub const DEFAULT_BATCH_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1023) {
    Some(capacity) => capacity,
    None => panic!("batch capacity must be non-zero"),
};

/// Uniform scale given to every point instance.
pub const DEFAULT_INSTANCE_SCALE: f32 = 0.1;

/// What to do with the last batch when it is not full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBatch {
    /// Emit the partial batch so every vertex is drawn.
    #[default]
    Flush,
    /// Drop the partial batch. Matches older exports that only ever
    /// submitted full batches.
    Discard,
}

/// Parameters for [`partition_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionOptions {
    pub capacity: NonZeroUsize,
    pub instance_scale: f32,
    pub trailing: TrailingBatch,
}

impl PartitionOptions {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_instance_scale(mut self, scale: f32) -> Self {
        self.instance_scale = scale;
        self
    }

    pub fn with_trailing(mut self, trailing: TrailingBatch) -> Self {
        self.trailing = trailing;
        self
    }
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BATCH_CAPACITY,
            instance_scale: DEFAULT_INSTANCE_SCALE,
            trailing: TrailingBatch::default(),
        }
    }
}

/// An immutable group of instances submitted with a single draw call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    instances: Vec<InstanceTransform>,
}

impl Batch {
    pub fn instances(&self) -> &[InstanceTransform] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Model matrices for every instance, in order.
    pub fn matrices(&self) -> impl ExactSizeIterator<Item = Mat4> + '_ {
        self.instances.iter().map(InstanceTransform::matrix)
    }

    /// Replace the contents of `out` with this batch's model matrices.
    pub fn write_matrices(&self, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(self.matrices());
    }
}

/// Partition vertices into batches of at most `capacity` instances.
///
/// Uses the default instance scale and flushes the trailing partial batch.
pub fn partition(vertices: &[Vertex], capacity: NonZeroUsize) -> Vec<Batch> {
    partition_with(vertices, &PartitionOptions::new(capacity))
}

/// Partition vertices into batches according to `options`.
#[tracing::instrument(skip_all, fields(vertices = vertices.len(), capacity = options.capacity.get()))]
pub fn partition_with(vertices: &[Vertex], options: &PartitionOptions) -> Vec<Batch> {
    let capacity = options.capacity.get();
    let mut batches = Vec::with_capacity(vertices.len().div_ceil(capacity));

    for chunk in vertices.chunks(capacity) {
        if chunk.len() < capacity && options.trailing == TrailingBatch::Discard {
            debug!("Discarding trailing batch of {} instances", chunk.len());
            break;
        }
        batches.push(Batch {
            instances: chunk
                .iter()
                .map(|v| InstanceTransform::from_vertex(v, options.instance_scale))
                .collect(),
        });
    }

    info!(
        "Partitioned {} vertices into {} batches",
        vertices.len(),
        batches.len()
    );
    batches
}

/// Total number of instances across all batches.
pub fn total_instances(batches: &[Batch]) -> usize {
    batches.iter().map(Batch::len).sum()
}
