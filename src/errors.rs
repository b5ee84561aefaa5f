use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::{DomainError, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidInput(msg) => AppError::InvalidInput(msg),
        }
    }
}

impl AppError {
    /// Whether the console can report the error and carry on with the menu.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::InvalidInput(_) | AppError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_display() {
        assert_eq!(
            AppError::InvalidInput("msg".to_string()).to_string(),
            "Invalid input: msg"
        );
    }

    #[test]
    fn domain_invalid_input_maps_to_app_invalid_input() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::InvalidInput(_)));
    }

    #[test]
    fn store_errors_are_recoverable() {
        let err: AppError = StoreError::Database("constraint".to_string()).into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn closed_input_and_io_are_fatal() {
        assert!(!AppError::InputClosed.is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(!AppError::from(io).is_recoverable());
    }

    #[test]
    fn config_error_is_transparent() {
        let err: AppError = ConfigError::Missing("DATABASE_URL").into();
        assert_eq!(err.to_string(), "DATABASE_URL must be set");
    }
}
