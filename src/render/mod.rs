//! Response rendering subsystem.
//!
//! # Data Flow
//! ```text
//! source bytes + content type + OptimizationResult
//!     → explanation.rs (failed / optimized / unchanged policy)
//!     → page.rs (RenderContext → askama template, images as data URIs)
//!     → HTML string
//! ```
//!
//! # Design Decisions
//! - The explanation is plain text; the template escapes it
//! - Data URIs are built from sanitized content types and base64 only
//! - Sizes under the images are whole KB, truncated

pub mod explanation;
pub mod format;
pub mod page;

pub use explanation::{Explanation, Outcome};
pub use page::{render_index, render_result, RenderContext};
