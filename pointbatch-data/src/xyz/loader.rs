//! Text point-cloud loading functions

use super::XyzError;
use crate::types::Vertex;
use glam::{DVec3, Vec3};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default stride between consumed data lines.
pub const DEFAULT_SKIP: usize = 100;

/// Default uniform scale applied after centering.
pub const DEFAULT_SCALE: f32 = 0.05;

/// Default number of declared lines left unread at the end of the file.
///
/// Large scanner dumps tend to end in truncated rows, so the scan stops at
/// `declared - DEFAULT_TAIL_MARGIN + 1`.
pub const DEFAULT_TAIL_MARGIN: usize = 100;

/// Parameters controlling how a point file is sampled and transformed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Stride between consumed data lines. Must be at least 1.
    pub skip: usize,
    /// Uniform scale applied after centering and the axis swap.
    pub scale: f32,
    /// Declared lines left unread at the end of the file.
    pub tail_margin: usize,
}

impl LoadOptions {
    pub fn new(skip: usize, scale: f32) -> Self {
        Self {
            skip,
            scale,
            ..Self::default()
        }
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_tail_margin(mut self, tail_margin: usize) -> Self {
        self.tail_margin = tail_margin;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            scale: DEFAULT_SCALE,
            tail_margin: DEFAULT_TAIL_MARGIN,
        }
    }
}

/// Load vertices from point-cloud text with the default tail margin.
///
/// `source` is `None` when the host has no text asset assigned.
pub fn load(source: Option<&str>, skip: usize, scale: f32) -> Result<Vec<Vertex>, XyzError> {
    load_with(source, &LoadOptions::new(skip, scale))
}

/// Load vertices from point-cloud text.
///
/// The cloud is re-centered on its first sampled point, converted from the
/// file's Z-up convention to Y-up, then scaled.
#[tracing::instrument(skip_all, fields(skip = options.skip, scale = options.scale))]
pub fn load_with(source: Option<&str>, options: &LoadOptions) -> Result<Vec<Vertex>, XyzError> {
    let text = source.ok_or(XyzError::MissingSource)?;
    if options.skip == 0 {
        return Err(XyzError::InvalidSkip);
    }
    if !(options.scale.is_finite() && options.scale > 0.0) {
        return Err(XyzError::InvalidScale(options.scale));
    }

    let lines = split_lines(text);
    let header = lines.first().ok_or(XyzError::MissingSource)?;
    let declared = parse_header(header)?;

    let end = scan_end(declared, options.tail_margin, lines.len());
    debug!(
        "Scanning lines 1..{} of {} (declared {}, stride {})",
        end,
        lines.len(),
        declared,
        options.skip
    );
    if declared > 0 && declared as u64 >= lines.len() as u64 {
        warn!(
            "Header declares {} points but only {} data lines are present",
            declared,
            lines.len() - 1
        );
    }

    let mut raw = Vec::with_capacity(end.saturating_sub(1) / options.skip + 1);
    for index in (1..end).step_by(options.skip) {
        raw.push(parse_point(lines[index], index + 1)?);
    }

    let offset = *raw.first().ok_or(XyzError::EmptyCloud)?;
    let vertices: Vec<Vertex> = raw
        .iter()
        .map(|p| to_vertex(*p - offset, options.scale))
        .collect();

    info!(
        "Point cloud loaded: {} points sampled from {} declared",
        vertices.len(),
        declared
    );
    debug!("Re-centered on offset {:?}", offset);
    Ok(vertices)
}

/// Load vertices from a point-cloud text file on disk.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_from_path(path: &Path, options: &LoadOptions) -> Result<Vec<Vertex>, XyzError> {
    debug!("Reading point cloud from: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    load_with(Some(&text), options)
}

/// Read the declared vertex count from the header without loading points.
pub fn read_declared_count(source: &str) -> Result<i64, XyzError> {
    let lines = split_lines(source);
    let header = lines.first().ok_or(XyzError::MissingSource)?;
    parse_header(header)
}

/// Split on CRLF, LF or CR, dropping empty lines.
fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\r', '\n']).filter(|l| !l.is_empty()).collect()
}

fn parse_header(line: &str) -> Result<i64, XyzError> {
    line.trim().parse::<i64>().map_err(|_| XyzError::InvalidHeader {
        header: line.to_string(),
    })
}

/// Exclusive end of the scanned line indices: `declared - tail_margin + 1`,
/// clamped to the lines actually present.
fn scan_end(declared: i64, tail_margin: usize, line_count: usize) -> usize {
    let margin = i64::try_from(tail_margin).unwrap_or(i64::MAX);
    let bound = declared.saturating_sub(margin).saturating_add(1);
    if bound <= 1 {
        return 1;
    }
    usize::try_from(bound).map_or(line_count, |b| b.min(line_count))
}

/// Parse the first three whitespace-separated coordinates of a data line.
fn parse_point(line: &str, line_number: usize) -> Result<DVec3, XyzError> {
    let mut tokens = line.split([' ', '\t']).filter(|t| !t.is_empty());
    let mut coords = [0.0f64; 3];

    for (found, slot) in coords.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| XyzError::MalformedLine {
            line: line_number,
            reason: format!("expected 3 coordinates, found {}", found),
        })?;
        let value = token.parse::<f64>().map_err(|e| XyzError::MalformedLine {
            line: line_number,
            reason: format!("invalid coordinate {:?}: {}", token, e),
        })?;
        if !value.is_finite() {
            return Err(XyzError::MalformedLine {
                line: line_number,
                reason: format!("non-finite coordinate {:?}", token),
            });
        }
        *slot = value;
    }

    Ok(DVec3::from_array(coords))
}

/// Swap Y and Z, then scale.
fn to_vertex(centered: DVec3, scale: f32) -> Vertex {
    let c = centered.as_vec3();
    Vertex::new(Vec3::new(c.x, c.z, c.y) * scale)
}
