//! Upload decoding subsystem.
//!
//! # Data Flow
//! ```text
//! POST /optimize (multipart/form-data)
//!     → axum Multipart extractor
//!     → multipart.rs (PartStream: one UploadPart per body part, wire order)
//!     → handler picks the first File part for optimization
//! ```

pub mod multipart;

pub use multipart::{PartStream, UploadError, UploadPart, FALLBACK_CONTENT_TYPE};
