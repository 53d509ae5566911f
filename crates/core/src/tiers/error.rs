//! Third-party error types.

use ohada_shared::AppError;
use ohada_shared::types::ThirdPartyId;
use thiserror::Error;

/// Errors raised by the third-party service.
#[derive(Debug, Error)]
pub enum TiersError {
    /// Third party not found.
    #[error("Third party not found: {0}")]
    NotFound(ThirdPartyId),

    /// A required field is blank.
    #[error("Field {0} is required")]
    Required(&'static str),

    /// Email does not look like an address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Collective account outside 40/41.
    #[error("Account {0} is not a third-party account (40x or 41x)")]
    InvalidAccount(String),

    /// Business code already used.
    #[error("Third party code already exists: {0}")]
    DuplicateCode(String),

    /// Negative credit limit or balance.
    #[error("Amount cannot be negative")]
    NegativeAmount,
}

impl TiersError {
    /// Returns the HTTP-like status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateCode(_) => 409,
            Self::Required(_)
            | Self::InvalidEmail(_)
            | Self::InvalidAccount(_)
            | Self::NegativeAmount => 400,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "THIRD_PARTY_NOT_FOUND",
            Self::Required(_) => "FIELD_REQUIRED",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::InvalidAccount(_) => "INVALID_THIRD_PARTY_ACCOUNT",
            Self::DuplicateCode(_) => "DUPLICATE_THIRD_PARTY_CODE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
        }
    }
}

impl From<TiersError> for AppError {
    fn from(err: TiersError) -> Self {
        let msg = err.to_string();
        match err.status_code() {
            404 => Self::NotFound(msg),
            409 => Self::Conflict(msg),
            _ => Self::Validation(msg),
        }
    }
}
