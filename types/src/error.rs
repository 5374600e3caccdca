//! The error taxonomy shared by every operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of an operation failure.
///
/// Every crate-level error maps onto exactly one kind so that callers can
/// tell retryable conditions from permanent ones without matching on the
/// concrete error type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The sender fails the operation's capability predicate.
    Unauthorized,
    /// The operation is not valid for the entity's current status.
    InvalidState,
    /// Too early or too late relative to a window, delay or grace period.
    TemporalViolation,
    /// An argument is out of its declared bounds.
    Validation,
    /// Posted collateral does not cover the loan.
    InsufficientCollateral,
    /// The payment rail declined a transfer.
    TransferFailed,
    /// Integer arithmetic would have wrapped.
    ArithmeticOverflow,
    /// Unknown entity id.
    NotFound,
    /// The host storage engine failed.
    Storage,
    /// Host configuration is invalid.
    Config,
}

impl ErrorKind {
    /// Whether the same call may succeed if submitted again later unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TemporalViolation | Self::TransferFailed | Self::Storage
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidState => "invalid_state",
            Self::TemporalViolation => "temporal_violation",
            Self::Validation => "validation",
            Self::InsufficientCollateral => "insufficient_collateral",
            Self::TransferFailed => "transfer_failed",
            Self::ArithmeticOverflow => "arithmetic_overflow",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("malformed identity: {0}")]
    Malformed(String),
}
