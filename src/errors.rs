//! Error types for the luckbox game core
//!
//! Rule rejections (a spin without a bet, a bet mid-spin) live next to the
//! game that produces them. This module holds the root error used for
//! everything around the games: configuration, ticket construction, I/O.

use thiserror::Error;

/// Root error type for all luckbox operations
#[derive(Debug, Error)]
pub enum LuckboxError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Scratch ticket construction errors
    #[error("Ticket error: {0}")]
    Ticket(#[from] TicketError),

    /// Filesystem errors (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

/// Errors raised when assembling a scratch ticket from explicit parts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("Number {0} is outside 1..=9")]
    NumberOutOfRange(u8),

    #[error("Unknown prize label '{0}'")]
    UnknownPrize(String),

    #[error("Ticket needs exactly {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
}

impl ConfigurationError {
    pub(crate) fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        ConfigurationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

// Convenience type alias for Results
pub type LuckboxResult<T> = Result<T, LuckboxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display() {
        let config_error =
            ConfigurationError::invalid("roulette.stake", 0, "Stake must be positive");
        let error = LuckboxError::Configuration(config_error);

        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("roulette.stake"));
    }

    #[test]
    fn test_ticket_error_details() {
        let err = TicketError::CellCount {
            expected: 6,
            actual: 4,
        };

        assert!(err.to_string().contains("exactly 6"));
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn test_error_conversion() {
        let error: LuckboxError = TicketError::NumberOutOfRange(12).into();

        match error {
            LuckboxError::Ticket(TicketError::NumberOutOfRange(12)) => {}
            _ => panic!("Expected ticket error"),
        }
    }

    #[test]
    fn test_error_source() {
        let error = LuckboxError::Configuration(ConfigurationError::invalid(
            "roulette.stake",
            0,
            "Stake cannot be zero",
        ));

        assert!(error.source().is_some());
        assert!(error.to_string().contains("roulette.stake"));
    }
}
