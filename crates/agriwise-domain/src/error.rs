//! Domain error types

use thiserror::Error;

/// A farmer profile field outside its documented domain.
///
/// Raised before any scoring happens; the assessor never produces a result
/// for a profile that fails validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Farm size must be a finite number of acres greater than zero
    #[error("farm_size must be a positive number of acres, got {0}")]
    NonPositiveFarmSize(f64),

    /// Credit score outside the conventional range
    #[error("credit_score must be between {min} and {max}, got {actual}")]
    CreditScoreOutOfRange {
        /// Lowest accepted score
        min: i32,
        /// Highest accepted score
        max: i32,
        /// Score supplied by the caller
        actual: i32,
    },

    /// Income level is not one of low, medium or high
    #[error("income_level must be one of low, medium, high; got '{0}'")]
    UnknownIncomeLevel(String),

    /// Crop is not one of the supported crop identifiers
    #[error("crop_type '{0}' is not supported (expected maize, beans, tomatoes or potatoes)")]
    UnsupportedCrop(String),

    /// Loan policy constants are inconsistent
    #[error("invalid loan policy: {0}")]
    InvalidPolicy(String),
}
