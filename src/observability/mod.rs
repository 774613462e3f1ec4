//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, optimizer, middleware produce:
//!     → logging.rs (tracing events, TraceLayer access log)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```

pub mod logging;
pub mod metrics;
