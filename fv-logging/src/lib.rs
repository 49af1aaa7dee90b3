//! fv-logging: NDJSON events for evaluation and scaling runs.
//!
//! Append-only, one JSON object per line. Every event carries the hash of the
//! function file it was computed from and the index layout in force, so a log line
//! can be matched to the exact tables that produced it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event schema version. Bump when an event struct changes shape.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Name of the table layout used by `fv-core` partial indexing.
pub const INDEX_LAYOUT_ID: &str = "mixed_radix_first_var_lsd";

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfoV1 {
    pub schema_version: u32,
    pub crate_version: String,
    pub index_layout_id: String,
}

impl VersionInfoV1 {
    pub fn current() -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION,
            crate_version: VERSION.to_string(),
            index_layout_id: INDEX_LAYOUT_ID.to_string(),
        }
    }
}

/// One evaluation of a function file at a state (and optionally an action).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub config_hash: String,
    pub state: Vec<usize>,
    pub action: Option<Vec<usize>>,
    /// Coefficients applied to `bases`.
    pub weights: Option<Vec<f64>>,
    /// Coefficients applied to `q_bases`.
    pub q_weights: Option<Vec<f64>>,

    /// State value, if the file has vector-form bases.
    pub value: Option<f64>,
    /// Action value, if the file has matrix-form bases and an action was given.
    pub q_value: Option<f64>,
}

/// One in-place scaling of a function file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub config_hash: String,
    pub out_hash: String,
    pub out_path: String,

    pub weights: Option<Vec<f64>>,
    pub q_weights: Option<Vec<f64>>,
    pub scalar: Option<f64>,
    pub num_bases: u64,
    pub num_q_bases: u64,
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("ndjson io: {0}")]
    Io(#[from] std::io::Error),
    #[error("ndjson json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

/// Read every parseable line of an NDJSON file, skipping blank and torn lines.
pub fn read_events_lenient(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>, NdjsonError> {
    let s = std::fs::read_to_string(path)?;
    Ok(s.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
