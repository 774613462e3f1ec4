//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware.rs (Accept-Encoding ranking)
//!     → handlers.rs (GET / form, POST /optimize pipeline)
//!     → upload → optimizer → render
//!     → error.rs (AppError → status code)
//!     → compression, X-Engine header, access log
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::AppError;
pub use server::{AppState, HttpServer, X_ENGINE};
