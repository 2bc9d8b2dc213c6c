//! Text point-cloud (`.xyz`-style) loading and parsing

mod error;
mod loader;

pub use error::XyzError;
pub use loader::{
    DEFAULT_SCALE, DEFAULT_SKIP, DEFAULT_TAIL_MARGIN, LoadOptions, load, load_from_path,
    load_with, read_declared_count,
};
