//! Error types shared across DevCamper crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised by the shared infrastructure
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid log setting '{value}' for {setting}")]
    InvalidLogSetting { setting: &'static str, value: String },
}

impl CommonError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_log_setting_display() {
        let err = CommonError::InvalidLogSetting {
            setting: "LOG_LEVEL",
            value: "loud".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid log setting 'loud' for LOG_LEVEL");
    }

    #[test]
    fn test_config_helper() {
        let err = CommonError::config("missing secret");
        assert!(matches!(err, CommonError::Config(ref m) if m == "missing secret"));
    }
}
