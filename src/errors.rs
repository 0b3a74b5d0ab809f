//! Unified error type for the rate ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation and not-found
//! failures are recoverable by the caller; arithmetic overflow aborts the computation
//! that hit it.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input (bad amount, bad date, empty reason, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Referenced room type does not exist
    #[error("Room type not found: {id}")]
    RoomTypeNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Referenced hotel does not exist
    #[error("Hotel not found: {id}")]
    HotelNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Monetary arithmetic left the representable range
    #[error("Arithmetic overflow while computing a monetary amount")]
    ArithmeticOverflow,

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Output could not be serialised
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for the not-found family of errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomTypeNotFound { .. } | Self::HotelNotFound { .. }
        )
    }

    /// True when the caller supplied bad input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
