//! Accounting: pure integer arithmetic shared by both state machines.
//!
//! Every function is total over `u64` except for overflow, which is reported
//! as [`AccountingError::Overflow`] instead of wrapping. Percentages use
//! truncating division throughout.
//!
//! - Repayment derivation (`amount + floor(amount * rate / 100)`)
//! - Percentage shares and threshold comparisons for vote tallies
//! - Range validation for operation arguments
//! - Loan-to-value coverage

pub mod bounds;
pub mod collateral;
pub mod error;
pub mod interest;

pub use bounds::{validate_range, Bounds};
pub use collateral::loan_to_value_ok;
pub use error::AccountingError;
pub use interest::{compute_repayment, meets_threshold, percent_of, share_pct};
