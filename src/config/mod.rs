//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → loader.rs (PORT environment override)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with the request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so an empty file (or none at all) works
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, parse_config, port_from_env, ConfigError};
pub use schema::AppConfig;
pub use schema::HttpConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::OptimizerConfig;
pub use schema::PageConfig;
pub use schema::PageMode;
