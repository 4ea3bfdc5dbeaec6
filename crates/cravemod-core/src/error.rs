//! Error types for `cravemod-core`.
//!
//! The limiter itself never fails. The only fallible step is building a
//! [`LimiterConfig`](crate::limiter::LimiterConfig) from operator input.

/// Unified error type for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A configuration value is out of range (zero attempts, empty window, ...).
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout `cravemod-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_displays_message() {
        let err = CoreError::InvalidConfig("max_attempts must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "invalid config: max_attempts must be at least 1"
        );
    }

    #[test]
    fn core_result_err() {
        let result: CoreResult<i32> = Err(CoreError::InvalidConfig("x".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::InvalidConfig("window".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidConfig"));
    }
}
