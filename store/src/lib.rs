//! Abstract storage traits for the agora engine.
//!
//! Records are stored as opaque bytes; encoding belongs to the caller. Every
//! backend (in-memory for testing, or a host ledger's key-value state)
//! implements these traits and the dispatcher depends only on them.

pub mod error;
pub mod loan;
pub mod meta;
pub mod proposal;

pub use error::StoreError;
pub use loan::LoanStore;
pub use meta::{EntityKind, IdAllocator};
pub use proposal::{ProposalStore, VoterRow};
