//! Pointbatch Data Crate
//!
//! Loading and batching utilities for text point clouds.
//! This crate is GPU-agnostic: it parses `.xyz`-style dumps into vertices and
//! splits them into instance batches sized for a backend's per-draw limit.

pub mod batch;
pub mod types;
pub mod xyz;

pub use batch::{
    Batch, DEFAULT_BATCH_CAPACITY, DEFAULT_INSTANCE_SCALE, PartitionOptions, TrailingBatch,
    partition, partition_with, total_instances,
};
pub use types::{InstanceTransform, Vertex};
pub use xyz::{LoadOptions, XyzError, load, load_from_path, load_with, read_declared_count};
