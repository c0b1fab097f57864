//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool size, connection limits)
//! - Check the socket base path is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: DaemonConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use crate::config::schema::DaemonConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The socket base path is empty.
    EmptySocketBasePath,
    /// The per-listener connection limit is zero.
    ZeroMaxConnections,
    /// The worker pool size is zero.
    ZeroPoolSize,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptySocketBasePath => {
                write!(f, "sockets.base_path must not be empty")
            }
            ValidationError::ZeroMaxConnections => {
                write!(f, "sockets.max_connections must be at least 1")
            }
            ValidationError::ZeroPoolSize => {
                write!(f, "workers.pool_size must be at least 1")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &DaemonConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sockets.base_path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySocketBasePath);
    }
    if config.sockets.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.workers.pool_size == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&DaemonConfig::default()).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let mut config = DaemonConfig::default();
        config.sockets.base_path = PathBuf::new();
        config.sockets.max_connections = 0;
        config.workers.pool_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptySocketBasePath,
                ValidationError::ZeroMaxConnections,
                ValidationError::ZeroPoolSize,
            ]
        );
    }
}
