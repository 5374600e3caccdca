use crate::loan::LoanStatus;
use agora_accounting::AccountingError;
use agora_auth::AuthError;
use agora_ledger::LedgerError;
use agora_types::{ErrorKind, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{op} is not allowed while the loan is {status:?}")]
    WrongStatus {
        op: &'static str,
        status: LoanStatus,
    },

    #[error("active loan has no investor recorded")]
    NoInvestor,

    #[error("grace period has not elapsed at {now}, {wait}")]
    GracePeriodNotElapsed { now: Timestamp, wait: String },

    #[error("emergency withdrawal not available at {now}, {wait}")]
    EmergencyWindowNotElapsed { now: Timestamp, wait: String },

    #[error("payment amount must be non-zero")]
    ZeroPayment,

    #[error("refinance rate {proposed}% does not improve on {current}%")]
    RateNotLower { current: u64, proposed: u64 },

    #[error("split amount {split} must lie strictly between 0 and {amount}")]
    InvalidSplit { split: u64, amount: u64 },

    #[error("collateral {collateral} does not cover principal {amount}")]
    CollateralBelowPrincipal { collateral: u64, amount: u64 },

    #[error("loan has no collateral to liquidate")]
    NoCollateral,

    #[error("unknown verification status {0:?}")]
    UnknownVerification(String),

    #[error(transparent)]
    Accounting(#[from] AccountingError),

    #[error(transparent)]
    Transfer(#[from] LedgerError),
}

impl LendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(e) => e.kind(),
            Self::WrongStatus { .. } | Self::NoInvestor => ErrorKind::InvalidState,
            Self::GracePeriodNotElapsed { .. } | Self::EmergencyWindowNotElapsed { .. } => {
                ErrorKind::TemporalViolation
            }
            Self::ZeroPayment
            | Self::RateNotLower { .. }
            | Self::InvalidSplit { .. }
            | Self::UnknownVerification(_) => ErrorKind::Validation,
            Self::CollateralBelowPrincipal { .. } | Self::NoCollateral => {
                ErrorKind::InsufficientCollateral
            }
            Self::Accounting(e) => e.kind(),
            Self::Transfer(e) => e.kind(),
        }
    }

    pub(crate) fn overflow() -> Self {
        Self::Accounting(AccountingError::Overflow)
    }
}
