//! Pointbatch Headless
//!
//! Plays the host engine without a GPU: loads a point file, starts a
//! point cloud renderer over an in-memory backend and replays a number of
//! frames, logging what each frame submits.

mod app;

use clap::Parser;
use std::path::PathBuf;

/// Pointbatch - headless instanced point cloud replay
#[derive(Parser, Debug)]
#[command(name = "pointbatch-headless")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the point text file to load
    pub file: PathBuf,

    /// JSON settings file; individual flags below override its fields
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Stride between consumed data lines
    #[arg(long)]
    pub skip: Option<usize>,

    /// Uniform scale applied after centering
    #[arg(long)]
    pub scale: Option<f32>,

    /// Upper bound on instances per draw call
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Per-draw instance limit advertised by the simulated backend
    #[arg(long)]
    pub instance_limit: Option<usize>,

    /// Number of frames to replay
    #[arg(short, long, default_value_t = 3)]
    pub frames: u32,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn main() {
    let args = Args::parse();
    app::init_logging(&args.log_level);

    if let Err(e) = app::run(&args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
