use thiserror::Error;

use crate::outcome::FailureCategory;

/// Rejections raised while turning raw field values into request objects.
/// None of these ever reach the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{raw}': {reason}")]
    InvalidAmount {
        field: &'static str,
        raw: String,
        reason: &'static str,
    },

    #[error("invalid event date '{raw}': {reason}")]
    InvalidDate { raw: String, reason: &'static str },

    #[error("event name must not be empty")]
    InvalidName,

    #[error("invalid recipient '{raw}': {reason}")]
    InvalidAddress { raw: String, reason: String },
}

impl ValidationError {
    pub fn category(&self) -> FailureCategory {
        match self {
            ValidationError::InvalidAmount { .. } => FailureCategory::InvalidAmount,
            ValidationError::InvalidDate { .. } => FailureCategory::InvalidDate,
            ValidationError::InvalidName => FailureCategory::InvalidName,
            ValidationError::InvalidAddress { .. } => FailureCategory::InvalidAddress,
        }
    }
}
