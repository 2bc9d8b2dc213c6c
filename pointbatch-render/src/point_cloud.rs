//! Point cloud render component.

use crate::{FrameStats, InstancedDraw, PointCloudSettings, SceneBounds, SettingsError, render};
use glam::Mat4;
use pointbatch_data::{Batch, XyzError, load_from_path, load_with, partition_with, total_instances};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised by [`PointCloudRenderer::start`].
#[derive(Debug, Error)]
pub enum StartError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Point cloud loading error: {0}")]
    Load(#[from] XyzError),
}

/// Where the point text comes from.
#[derive(Debug, Clone, Default)]
pub enum CloudSource {
    /// No text asset assigned.
    #[default]
    Missing,
    /// Text already loaded by the host's asset system.
    Text(String),
    /// A file read during start.
    Path(PathBuf),
}

/// Initialization data for a point cloud.
pub struct PointCloudInit<M, T> {
    pub source: CloudSource,
    pub settings: PointCloudSettings,
    /// Mesh drawn at every point.
    pub mesh: M,
    /// Material the mesh is drawn with.
    pub material: T,
}

impl<M, T> PointCloudInit<M, T> {
    /// Create init data with no source and default settings.
    pub fn new(mesh: M, material: T) -> Self {
        Self {
            source: CloudSource::Missing,
            settings: PointCloudSettings::default(),
            mesh,
            material,
        }
    }

    /// Use point text the host has already loaded.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.source = CloudSource::Text(text.into());
        self
    }

    /// Read point text from a file at start.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.source = CloudSource::Path(path.as_ref().to_path_buf());
        self
    }

    pub fn with_settings(mut self, settings: PointCloudSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// A loaded, partitioned point cloud ready to be drawn every frame.
///
/// Batches are built once in [`start`](Self::start) and never change.
pub struct PointCloudRenderer<M, T> {
    batches: Vec<Batch>,
    bounds: SceneBounds,
    point_count: usize,
    mesh: M,
    material: T,
    scratch: Vec<Mat4>,
}

impl<M, T> PointCloudRenderer<M, T> {
    /// Load and partition the cloud. Call once before the first frame.
    ///
    /// The backend is only queried for its per-draw instance limit.
    #[tracing::instrument(skip_all)]
    pub fn start<B>(init: PointCloudInit<M, T>, backend: &B) -> Result<Self, StartError>
    where
        B: InstancedDraw<Mesh = M, Material = T>,
    {
        let PointCloudInit {
            source,
            settings,
            mesh,
            material,
        } = init;

        settings.validate()?;
        let partition_options = settings.partition_options(backend.max_instances_per_draw())?;
        let load_options = settings.load_options();

        let vertices = match source {
            CloudSource::Missing => return Err(XyzError::MissingSource.into()),
            CloudSource::Text(text) => load_with(Some(&text), &load_options)?,
            CloudSource::Path(path) => {
                info!("Loading points from {}", path.display());
                load_from_path(&path, &load_options)?
            }
        };

        let bounds = SceneBounds::from_positions(vertices.iter().map(|v| v.position));
        let batches = partition_with(&vertices, &partition_options);
        let point_count = total_instances(&batches);

        info!(
            "Point cloud ready: {} points in {} batches, radius {:.3}",
            point_count,
            batches.len(),
            bounds.radius
        );

        Ok(Self {
            batches,
            bounds,
            point_count,
            mesh,
            material,
            scratch: Vec::with_capacity(partition_options.capacity.get()),
        })
    }

    /// Submit every batch to `backend`. Call once per frame.
    pub fn render_frame<B>(&mut self, backend: &mut B) -> FrameStats
    where
        B: InstancedDraw<Mesh = M, Material = T>,
    {
        render(
            &self.batches,
            &self.mesh,
            &self.material,
            backend,
            &mut self.scratch,
        )
    }

    /// Get the scene bounds for camera positioning.
    pub fn bounds(&self) -> &SceneBounds {
        &self.bounds
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Points that will be drawn each frame.
    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingBackend;
    use glam::Vec3;
    use pointbatch_data::TrailingBatch;
    use std::num::NonZeroUsize;

    fn numbered_cloud(count: usize) -> String {
        let mut text = format!("{}\n", count);
        for i in 1..=count {
            text.push_str(&format!("{} {} 0\n", i, i * 2));
        }
        text
    }

    fn dense_settings() -> PointCloudSettings {
        PointCloudSettings {
            skip_amount: 1,
            scale: 1.0,
            tail_margin: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_and_render_frames() {
        let init = PointCloudInit::new("cube", "unlit")
            .with_text(numbered_cloud(2100))
            .with_settings(dense_settings());
        let mut backend = RecordingBackend::new();
        let mut cloud = PointCloudRenderer::start(init, &backend).unwrap();

        assert_eq!(cloud.point_count(), 2100);
        assert_eq!(cloud.batches().len(), 3);

        for _ in 0..3 {
            backend.clear();
            let stats = cloud.render_frame(&mut backend);
            assert_eq!(stats.draw_calls, 3);
            assert_eq!(stats.instances, 2100);
            assert_eq!(backend.calls().len(), 3);
            assert!(backend.calls().iter().all(|c| c.mesh == "cube" && c.material == "unlit"));
        }

        let first = backend.calls()[0].instances[0].matrix();
        assert_eq!(first.transform_point3(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_backend_limit_lowers_capacity() {
        let init = PointCloudInit::new((), ())
            .with_text(numbered_cloud(1000))
            .with_settings(dense_settings());
        let mut backend = RecordingBackend::new().with_instance_limit(NonZeroUsize::new(256).unwrap());
        let mut cloud = PointCloudRenderer::start(init, &backend).unwrap();

        let stats = cloud.render_frame(&mut backend);
        assert_eq!(stats.draw_calls, 4);
        assert!(backend.calls().iter().all(|c| c.instances.len() <= 256));
    }

    #[test]
    fn test_discard_trailing_batch_setting() {
        let settings = PointCloudSettings {
            batch_capacity: 400,
            trailing_batch: TrailingBatch::Discard,
            ..dense_settings()
        };
        let init = PointCloudInit::new((), ())
            .with_text(numbered_cloud(1000))
            .with_settings(settings);
        let cloud = PointCloudRenderer::start(init, &RecordingBackend::new()).unwrap();

        assert_eq!(cloud.point_count(), 800);
    }

    #[test]
    fn test_bounds_follow_axis_swap() {
        let init = PointCloudInit::new((), ())
            .with_text(numbered_cloud(11))
            .with_settings(dense_settings());
        let cloud = PointCloudRenderer::start(init, &RecordingBackend::new()).unwrap();

        // Source y grows twice as fast as x and lands on z after the swap.
        assert_eq!(cloud.bounds().min, Vec3::ZERO);
        assert_eq!(cloud.bounds().max, Vec3::new(10.0, 0.0, 20.0));
    }

    #[test]
    fn test_start_without_source() {
        let init = PointCloudInit::new((), ());
        let result = PointCloudRenderer::start(init, &RecordingBackend::new());
        assert!(matches!(result, Err(StartError::Load(XyzError::MissingSource))));
    }

    #[test]
    fn test_start_rejects_invalid_settings() {
        let init = PointCloudInit::new((), ())
            .with_text(numbered_cloud(10))
            .with_settings(PointCloudSettings {
                skip_amount: 0,
                ..Default::default()
            });
        let result = PointCloudRenderer::start(init, &RecordingBackend::new());
        assert!(matches!(result, Err(StartError::Settings(_))));
    }

    #[test]
    fn test_start_malformed_line_renders_nothing() {
        let init = PointCloudInit::new((), ())
            .with_text("2\n0 0 0\n1 2\n")
            .with_settings(dense_settings());
        let result = PointCloudRenderer::start(init, &RecordingBackend::new());
        assert!(matches!(
            result,
            Err(StartError::Load(XyzError::MalformedLine { line: 3, .. }))
        ));
    }
}
