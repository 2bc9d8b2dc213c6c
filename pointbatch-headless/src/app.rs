use crate::Args;
use pointbatch_render::{PointCloudInit, PointCloudRenderer, PointCloudSettings, RecordingBackend};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, info};

/// Handle names stored by the recording backend in place of GPU resources.
const MESH: &str = "point-mesh";
const MATERIAL: &str = "point-material";

pub fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let settings = resolve_settings(args)?;
    debug!("Resolved settings: {:?}", settings);

    let mut backend = RecordingBackend::new();
    if let Some(limit) = args.instance_limit {
        let limit = NonZeroUsize::new(limit).ok_or("instance limit must be at least 1")?;
        backend = backend.with_instance_limit(limit);
    }

    let init = PointCloudInit::new(MESH, MATERIAL)
        .with_path(&args.file)
        .with_settings(settings);
    let mut cloud = PointCloudRenderer::start(init, &backend)?;

    let bounds = cloud.bounds();
    info!(
        "Bounds min {:?} max {:?} center {:?} radius {:.3}",
        bounds.min, bounds.max, bounds.center, bounds.radius
    );

    for frame in 0..args.frames {
        backend.clear();
        let stats = cloud.render_frame(&mut backend);
        info!(
            "Frame {}: {} draw calls, {} instances",
            frame, stats.draw_calls, stats.instances
        );
    }

    info!(
        "Replayed {} frames of {} points, {} bytes of instance data submitted",
        args.frames,
        cloud.point_count(),
        backend.uploaded_bytes()
    );
    Ok(())
}

fn resolve_settings(args: &Args) -> Result<PointCloudSettings, Box<dyn Error>> {
    let mut settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => PointCloudSettings::default(),
    };

    if let Some(skip) = args.skip {
        settings.skip_amount = skip;
    }
    if let Some(scale) = args.scale {
        settings.scale = scale;
    }
    if let Some(capacity) = args.capacity {
        settings.batch_capacity = capacity;
    }
    Ok(settings)
}

fn read_settings(path: &Path) -> Result<PointCloudSettings, Box<dyn Error>> {
    info!("Reading settings from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
