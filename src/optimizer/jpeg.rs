//! Default optimizer: JPEG re-encoding with a visual-difference bound.
//!
//! # Algorithm
//! 1. Decode the source with `image` (any supported format).
//! 2. Binary-search the lowest JPEG quality whose mean absolute RGB error
//!    against the source stays within `max_visual_diff` percent.
//! 3. If a weight limit is set and still exceeded, keep lowering quality.
//! 4. Optionally copy metadata segments over from the source.
//! 5. A JPEG source is returned untouched when nothing smaller was found.

use std::collections::HashMap;
use std::time::Instant;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use super::metadata;
use super::{ImageOptimizer, OptimizationResult, OptimizeOptions, OptimizerError};

const MIN_QUALITY: u8 = 1;
const MAX_QUALITY: u8 = 100;

/// One trial encoding.
#[derive(Debug, Clone)]
struct Candidate {
    quality: u8,
    bytes: Vec<u8>,
    diff: f64,
}

/// Optimizer backed by the `image` crate's JPEG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegOptimizer;

impl JpegOptimizer {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, source: &[u8], options: &OptimizeOptions) -> Result<(Vec<u8>, u8), OptimizerError> {
        let reference = image::load_from_memory(source)
            .map_err(|e| OptimizerError::Decode(e.to_string()))?
            .to_rgb8();

        let mut trials = Trials::new(&reference);

        let mut best = match trials.lowest_quality_within(options.max_visual_diff)? {
            Some(candidate) => candidate,
            None => trials.encode(MAX_QUALITY)?,
        };

        if let Some(limit_kb) = options.max_file_weight_kb {
            let limit = limit_kb.saturating_mul(1024) as usize;
            if best.bytes.len() > limit {
                best = trials.highest_quality_under(limit, best.quality)?;
            }
        }

        tracing::debug!(
            quality = best.quality,
            visual_diff = best.diff,
            size = best.bytes.len(),
            trials = trials.cache.len(),
            "Quality search finished"
        );

        let mut picture = best.bytes;
        if options.keep_metadata == Some(true) {
            picture = metadata::transplant(source, picture);
        }

        if metadata::is_jpeg(source) && picture.len() >= source.len() {
            return Ok((source.to_vec(), MAX_QUALITY));
        }

        Ok((picture, best.quality))
    }
}

impl ImageOptimizer for JpegOptimizer {
    fn optimize(&self, source: &[u8], options: &OptimizeOptions) -> OptimizationResult {
        let start = Instant::now();
        match self.run(source, options) {
            Ok((picture, quality)) => {
                OptimizationResult::success(source, picture, quality, start.elapsed())
            }
            Err(error) => OptimizationResult::failure(source, error, start.elapsed()),
        }
    }
}

/// Memoized encodings of one reference image.
struct Trials<'a> {
    reference: &'a RgbImage,
    cache: HashMap<u8, Candidate>,
}

impl<'a> Trials<'a> {
    fn new(reference: &'a RgbImage) -> Self {
        Self {
            reference,
            cache: HashMap::new(),
        }
    }

    fn encode(&mut self, quality: u8) -> Result<Candidate, OptimizerError> {
        if let Some(candidate) = self.cache.get(&quality) {
            return Ok(candidate.clone());
        }

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        self.reference
            .write_with_encoder(encoder)
            .map_err(|e| OptimizerError::Encode(e.to_string()))?;

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
            .map_err(|e| OptimizerError::Encode(e.to_string()))?
            .to_rgb8();
        let diff = visual_diff(self.reference, &decoded);

        let candidate = Candidate { quality, bytes, diff };
        self.cache.insert(quality, candidate.clone());
        Ok(candidate)
    }

    /// Lowest quality whose visual difference is at most `max_diff`.
    fn lowest_quality_within(&mut self, max_diff: f64) -> Result<Option<Candidate>, OptimizerError> {
        let (mut lo, mut hi) = (MIN_QUALITY, MAX_QUALITY);
        let mut found = None;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = self.encode(mid)?;
            if candidate.diff <= max_diff {
                found = Some(candidate);
                if mid == MIN_QUALITY {
                    break;
                }
                hi = mid - 1;
            } else {
                lo = mid + 1;
            }
        }
        Ok(found)
    }

    /// Highest quality below `ceiling` that fits in `limit` bytes, or the
    /// minimum quality when nothing fits.
    fn highest_quality_under(&mut self, limit: usize, ceiling: u8) -> Result<Candidate, OptimizerError> {
        let (mut lo, mut hi) = (MIN_QUALITY, ceiling.saturating_sub(1).max(MIN_QUALITY));
        let mut found = None;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = self.encode(mid)?;
            if candidate.bytes.len() <= limit {
                found = Some(candidate);
                lo = mid + 1;
            } else {
                if mid == MIN_QUALITY {
                    break;
                }
                hi = mid - 1;
            }
        }
        match found {
            Some(candidate) => Ok(candidate),
            None => self.encode(MIN_QUALITY),
        }
    }
}

/// Mean absolute per-channel error between two images, in percent of full scale.
fn visual_diff(a: &RgbImage, b: &RgbImage) -> f64 {
    if a.dimensions() != b.dimensions() {
        return 100.0;
    }
    let raw_a = a.as_raw();
    if raw_a.is_empty() {
        return 0.0;
    }
    let total: u64 = raw_a
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| x.abs_diff(*y) as u64)
        .sum();
    total as f64 / (raw_a.len() as f64 * 255.0) * 100.0
}
