//! Image optimization subsystem.
//!
//! # Data Flow
//! ```text
//! uploaded bytes + OptimizeOptions
//!     → ImageOptimizer::optimize (blocking, on tokio's blocking pool)
//!     → OptimizationResult (optimized bytes + statistics, or an internal error)
//! ```
//!
//! # Design Decisions
//! - The web layer only sees the `ImageOptimizer` trait; tests swap in fakes
//! - Failures are data (`internal_error`), never panics or `Err`
//! - `JpegOptimizer` is the default backend, built on the `image` crate

pub mod jpeg;
pub mod metadata;

use std::time::Duration;

pub use jpeg::JpegOptimizer;

/// Tuning handed to the optimizer for each upload.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOptions {
    /// Maximum visual difference allowed, in percent.
    pub max_visual_diff: f64,
    /// Upper bound for the output size in KB, if any.
    pub max_file_weight_kb: Option<u64>,
    /// Keep metadata segments from the source, if requested.
    pub keep_metadata: Option<bool>,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_visual_diff: 0.5,
            max_file_weight_kb: None,
            keep_metadata: None,
        }
    }
}

/// Failure reported by an optimizer instead of a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizerError {
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    Encode(String),
}

/// Outcome of a single optimization.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// The optimized picture (a copy of the source on failure).
    pub picture: Vec<u8>,
    /// Wall time spent optimizing.
    pub elapsed: Duration,
    /// `source_len - optimized_len`; negative when the output grew.
    pub saved_bytes: i64,
    /// `saved_bytes / source_len`.
    pub saved_ratio: f64,
    /// JPEG quality of the returned picture.
    pub jpeg_quality_used: u8,
    /// Set when the optimizer could not process the source.
    pub internal_error: Option<OptimizerError>,
}

impl OptimizationResult {
    /// Build a successful result, deriving the savings from the two sizes.
    pub fn success(source: &[u8], picture: Vec<u8>, quality: u8, elapsed: Duration) -> Self {
        let (saved_bytes, saved_ratio) = savings(source.len(), picture.len());
        Self {
            picture,
            elapsed,
            saved_bytes,
            saved_ratio,
            jpeg_quality_used: quality,
            internal_error: None,
        }
    }

    /// Build a failed result. The picture is the untouched source.
    pub fn failure(source: &[u8], error: OptimizerError, elapsed: Duration) -> Self {
        Self {
            picture: source.to_vec(),
            elapsed,
            saved_bytes: 0,
            saved_ratio: 0.0,
            jpeg_quality_used: 0,
            internal_error: Some(error),
        }
    }
}

/// Bytes and ratio saved going from `source_len` to `optimized_len`.
pub fn savings(source_len: usize, optimized_len: usize) -> (i64, f64) {
    let saved = source_len as i64 - optimized_len as i64;
    let ratio = if source_len == 0 {
        0.0
    } else {
        saved as f64 / source_len as f64
    };
    (saved, ratio)
}

/// Narrow capability the HTTP layer depends on.
///
/// Implementations are synchronous and may block for as long as they need.
pub trait ImageOptimizer: Send + Sync {
    fn optimize(&self, source: &[u8], options: &OptimizeOptions) -> OptimizationResult;
}
