//! The sentence shown above the comparison slider.

use crate::optimizer::OptimizationResult;
use crate::render::format::{format_file_size, format_millis, format_percentage};

/// Shown when the optimizer handed back the source unchanged.
pub const NOTHING_TO_DO: &str = "The optimization was a success, but it returned exactly the same picture. \
    There was nothing to do: the original was already so well optimized that \
    any further gain would cost visible quality.";

/// Which branch of the policy produced the explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Failed,
    Optimized,
    Unchanged,
}

impl Outcome {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Failed => "failed",
            Outcome::Optimized => "optimized",
            Outcome::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub outcome: Outcome,
    pub text: String,
}

impl Explanation {
    /// Apply the explanation policy to one optimization.
    pub fn new(source_content_type: &str, source: &[u8], result: &OptimizationResult) -> Self {
        if let Some(error) = &result.internal_error {
            return Self {
                outcome: Outcome::Failed,
                text: format!(
                    "The optimization failed. Something in your picture could not be processed \
                     by the image decoder, which reported '{}'. Please file an issue including \
                     this error and the picture you tried to compress.",
                    error
                ),
            };
        }

        if result.picture.as_slice() == source {
            return Self {
                outcome: Outcome::Unchanged,
                text: NOTHING_TO_DO.to_string(),
            };
        }

        let mut text = format!(
            "The optimization was a success. It took {}ms, saved {} which is {} of the file, \
             and applied a JPEG quality of {}%.",
            format_millis(result.elapsed),
            format_file_size(result.saved_bytes),
            format_percentage(result.saved_ratio),
            result.jpeg_quality_used
        );
        if result.saved_ratio < 0.0 {
            text.push_str(&format!(
                " Why is the optimized file bigger than the original one? Because the original \
                 was not a JPEG, and converting it from {} to JPEG gave a bigger file.",
                readable_content_type(source_content_type)
            ));
        }

        Self {
            outcome: Outcome::Optimized,
            text,
        }
    }

    /// Whether the page should offer the "file an issue" link.
    pub fn wants_issue_link(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

/// `image/png` → `PNG`: the subtype after the last `/`, uppercased.
pub fn readable_content_type(content_type: &str) -> String {
    let subtype = match content_type.rfind('/') {
        Some(idx) => &content_type[idx + 1..],
        None => content_type,
    };
    subtype.to_uppercase()
}
