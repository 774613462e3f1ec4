//! Slim JPG demo server library.
//!
//! Accepts an uploaded picture, runs it through an [`ImageOptimizer`] and
//! renders a before/after comparison page.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod optimizer;
pub mod render;
pub mod upload;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use optimizer::{ImageOptimizer, JpegOptimizer, OptimizationResult, OptimizeOptions};
