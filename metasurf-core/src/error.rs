//! Error types for metasurf

use thiserror::Error;

/// Main error type for metasurf operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for metasurf operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfig("cube size must be positive, got 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: cube size must be positive, got 0"
        );

        let err = Error::InvalidData("source 2 has radius 0".to_string());
        assert_eq!(err.to_string(), "Invalid data: source 2 has radius 0");
    }
}
