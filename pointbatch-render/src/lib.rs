//! Pointbatch Render Crate
//!
//! Draws a loaded point cloud as batches of mesh instances. The host engine
//! owns the GPU, meshes and materials; it exposes a single instanced draw
//! primitive through [`InstancedDraw`] and calls the two lifecycle hooks on
//! [`PointCloudRenderer`]: `start` once, `render_frame` every frame.

mod delegate;
mod point_cloud;
mod recording;
mod settings;
mod types;

pub use delegate::{FrameStats, InstancedDraw, SceneBounds, render};
pub use point_cloud::{CloudSource, PointCloudInit, PointCloudRenderer, StartError};
pub use recording::{DrawCall, RecordingBackend};
pub use settings::{MAX_SKIP_AMOUNT, PointCloudSettings, SettingsError};
pub use types::{InstanceRaw, instance_bytes};

// Re-export the data crate so hosts only need one dependency
pub use pointbatch_data;
