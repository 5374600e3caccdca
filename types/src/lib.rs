//! Fundamental types for the Agora engines.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! caller identities, entity ids, timestamps and the clock seam, and the error
//! taxonomy every operation failure maps onto.

pub mod error;
pub mod id;
pub mod identity;
pub mod time;

pub use error::{ErrorKind, IdentityError};
pub use id::{LoanId, ProposalId};
pub use identity::Identity;
pub use time::{days_to_secs, Clock, SystemClock, Timestamp, SECS_PER_DAY};
