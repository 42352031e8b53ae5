//! Unified error type for the dashboard.
//!
//! Every fallible operation returns [`Result`]. Storage failures arrive as
//! [`Error::Database`] and are never retried here; callers decide what to show.

use sea_orm::DbErr;
use thiserror::Error;

/// All errors surfaced by the habit and finance services.
#[derive(Debug, Error)]
pub enum Error {
    /// Input failed a precondition (blank habit name, blank card name, bad date range)
    #[error("Validation failed: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Expense amount was zero, negative, or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Referenced habit does not exist (strict mode only)
    #[error("Habit not found: {id}")]
    HabitNotFound {
        /// Requested habit id
        id: i64,
    },

    /// Referenced expense does not exist (strict mode only)
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// Settings file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details of the failure
        message: String,
    },

    /// Underlying storage failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for the input-rejection kinds. These never have side effects.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidAmount { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
