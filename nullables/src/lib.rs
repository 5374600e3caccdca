//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the engine (clock, payment rail, storage)
//! sits behind a trait. This crate provides implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network

pub mod clock;
pub mod ledger;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use store::NullStore;
