//! Errors raised while loading a text point cloud.

use thiserror::Error;

/// Errors that can occur while loading a point cloud.
///
/// Every variant aborts the load; no partial cloud is returned.
#[derive(Debug, Error)]
pub enum XyzError {
    #[error("no point cloud source text provided")]
    MissingSource,

    #[error("invalid vertex count header {header:?}")]
    InvalidHeader { header: String },

    #[error("skip stride must be at least 1")]
    InvalidSkip,

    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f32),

    #[error("malformed point on line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("point cloud contains no points")]
    EmptyCloud,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
