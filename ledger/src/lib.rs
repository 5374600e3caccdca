//! Payment rail.
//!
//! The engines only *decide* who pays whom and how much. Moving value is the
//! host ledger's job: it receives a [`TransferRequest`] through the
//! [`PaymentRail`] trait and reports back whether the transfer was confirmed.
//! No status transition that depends on a transfer commits before that report.

pub mod error;
pub mod rail;

pub use error::LedgerError;
pub use rail::{settle, PaymentRail, TransferOutcome, TransferPurpose, TransferReceipt, TransferRequest};
