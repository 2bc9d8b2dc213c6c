//! Point cloud component settings.

use pointbatch_data::xyz::{DEFAULT_SCALE, DEFAULT_SKIP, DEFAULT_TAIL_MARGIN};
use pointbatch_data::{
    DEFAULT_BATCH_CAPACITY, DEFAULT_INSTANCE_SCALE, LoadOptions, PartitionOptions, TrailingBatch,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::warn;

/// Largest accepted line stride.
pub const MAX_SKIP_AMOUNT: usize = 100_000;

/// Errors for out-of-range settings.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("skip amount {0} outside 1..=100000")]
    SkipOutOfRange(usize),

    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f32),

    #[error("instance scale must be positive and finite, got {0}")]
    InvalidInstanceScale(f32),

    #[error("batch capacity must be at least 1")]
    ZeroBatchCapacity,
}

/// Everything configurable on a point cloud before it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointCloudSettings {
    /// Stride between consumed data lines.
    pub skip_amount: usize,
    /// Uniform scale applied to the re-centered cloud.
    pub scale: f32,
    /// Declared lines left unread at the end of the file.
    pub tail_margin: usize,
    /// Uniform scale of each point's mesh instance.
    pub instance_scale: f32,
    /// Upper bound on instances per draw call.
    pub batch_capacity: usize,
    pub trailing_batch: TrailingBatch,
}

impl PointCloudSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_SKIP_AMOUNT).contains(&self.skip_amount) {
            return Err(SettingsError::SkipOutOfRange(self.skip_amount));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SettingsError::InvalidScale(self.scale));
        }
        if !(self.instance_scale.is_finite() && self.instance_scale > 0.0) {
            return Err(SettingsError::InvalidInstanceScale(self.instance_scale));
        }
        if self.batch_capacity == 0 {
            return Err(SettingsError::ZeroBatchCapacity);
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            skip: self.skip_amount,
            scale: self.scale,
            tail_margin: self.tail_margin,
        }
    }

    /// Partition options, with capacity lowered to `backend_limit` when the
    /// backend accepts fewer instances per draw than configured.
    pub fn partition_options(
        &self,
        backend_limit: Option<NonZeroUsize>,
    ) -> Result<PartitionOptions, SettingsError> {
        let configured =
            NonZeroUsize::new(self.batch_capacity).ok_or(SettingsError::ZeroBatchCapacity)?;
        let capacity = match backend_limit {
            Some(limit) if limit < configured => {
                warn!(
                    "Backend accepts {} instances per draw, lowering batch capacity from {}",
                    limit, configured
                );
                limit
            }
            _ => configured,
        };

        Ok(PartitionOptions::new(capacity)
            .with_instance_scale(self.instance_scale)
            .with_trailing(self.trailing_batch))
    }
}

impl Default for PointCloudSettings {
    fn default() -> Self {
        Self {
            skip_amount: DEFAULT_SKIP,
            scale: DEFAULT_SCALE,
            tail_margin: DEFAULT_TAIL_MARGIN,
            instance_scale: DEFAULT_INSTANCE_SCALE,
            batch_capacity: DEFAULT_BATCH_CAPACITY.get(),
            trailing_batch: TrailingBatch::Flush,
        }
    }
}
