//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges. All errors are
//! collected, not just the first one.

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.port must not be 0")]
    ZeroPort,
    #[error("optimizer.max_visual_diff must be a finite value >= 0 (got {0})")]
    InvalidVisualDiff(f64),
    #[error("optimizer.max_file_weight_kb must be greater than 0")]
    ZeroFileWeight,
    #[error("http.max_body_size must be greater than 0")]
    ZeroBodySize,
    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, returning every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let diff = config.optimizer.max_visual_diff;
    if !diff.is_finite() || diff < 0.0 {
        errors.push(ValidationError::InvalidVisualDiff(diff));
    }

    if config.optimizer.max_file_weight_kb == Some(0) {
        errors.push(ValidationError::ZeroFileWeight);
    }

    if config.http.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodySize);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
