//! Id allocation.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Proposal,
    Loan,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proposal => write!(f, "proposal"),
            Self::Loan => write!(f, "loan"),
        }
    }
}

/// Monotonic id counters, one per entity kind.
pub trait IdAllocator: Send + Sync {
    /// Reserve the next id for `kind`. The first id handed out is 1 and ids
    /// are never reused, even if the entity is never written.
    fn next_id(&self, kind: EntityKind) -> Result<u64, StoreError>;
}
