//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the demo server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::optimizer::OptimizeOptions;

/// Root configuration for the demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Options handed to the optimizer on every upload.
    pub optimizer: OptimizerConfig,

    /// Result page settings.
    pub page: PageConfig,

    /// HTTP middleware settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. The `PORT` environment variable overrides this.
    pub port: u16,
}

impl ListenerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Port used when neither the config file nor `PORT` provide one.
pub const DEFAULT_PORT: u16 = 8888;

/// Optimizer tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum visual difference allowed, in percent.
    pub max_visual_diff: f64,

    /// Target upper bound for the optimized file, in KB.
    pub max_file_weight_kb: Option<u64>,

    /// Carry JPEG metadata segments over to the optimized file.
    pub keep_metadata: Option<bool>,
}

impl OptimizerConfig {
    pub fn options(&self) -> OptimizeOptions {
        OptimizeOptions {
            max_visual_diff: self.max_visual_diff,
            max_file_weight_kb: self.max_file_weight_kb,
            keep_metadata: self.keep_metadata,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_visual_diff: 0.5,
            max_file_weight_kb: None,
            keep_metadata: None,
        }
    }
}

/// What `POST /optimize` answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// Before/after comparison page.
    #[default]
    Compare,
    /// Plain-text listing of the parts received.
    Debug,
}

/// Result page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    pub mode: PageMode,

    /// Where users are sent to report optimizer failures.
    pub issue_url: String,

    /// Juxtapose slider script.
    pub juxtapose_js: String,

    /// Juxtapose slider stylesheet.
    pub juxtapose_css: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            mode: PageMode::Compare,
            issue_url: "https://github.com/Fewlaps/slim-jpg/issues/new".to_string(),
            juxtapose_js: "https://cdn.knightlab.com/libs/juxtapose/latest/js/juxtapose.min.js"
                .to_string(),
            juxtapose_css: "https://cdn.knightlab.com/libs/juxtapose/latest/css/juxtapose.css"
                .to_string(),
        }
    }
}

/// HTTP middleware configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the `X-Engine` header sent with every response.
    pub engine_header: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Smallest body (bytes) that is deflate-compressed.
    pub deflate_min_size: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            engine_header: "axum".to_string(),
            max_body_size: 20 * 1024 * 1024, // 20MB
            deflate_min_size: 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
