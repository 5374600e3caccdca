//! Accounting errors.

use agora_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountingError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("collateral {collateral} does not cover {amount} at {max_ltv_pct}% loan-to-value")]
    InsufficientCollateral {
        collateral: u64,
        amount: u64,
        max_ltv_pct: u64,
    },

    #[error("arithmetic overflow")]
    Overflow,
}

impl AccountingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfRange { .. } => ErrorKind::Validation,
            Self::InsufficientCollateral { .. } => ErrorKind::InsufficientCollateral,
            Self::Overflow => ErrorKind::ArithmeticOverflow,
        }
    }
}
