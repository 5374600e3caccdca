//! Collateralized peer-to-peer loans.
//!
//! A borrower creates a `Pending` loan; an investor funds it through the
//! payment rail and it becomes `Active`. From there it is repaid
//! (`Completed`), defaulted after the grace period and then liquidated
//! against its collateral, paused, refinanced, split, or withdrawn from by
//! the investor after the emergency window.

pub mod engine;
pub mod error;
pub mod loan;
pub mod params;

pub use engine::LoanMachine;
pub use error::LendingError;
pub use loan::{Loan, LoanStatus, NewLoan, VerificationStatus};
pub use params::LendingParams;
