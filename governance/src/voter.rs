//! Per-identity voter record, one per (proposal, identity).

use agora_types::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub owner: Identity,
    /// Power currently held, own plus any delegated in, minus any delegated out.
    pub voting_power: u64,
    pub delegated_to: Option<Identity>,
    /// Amount moved out by the outstanding delegation.
    pub delegation_amount: u64,
    pub last_vote_time: Option<Timestamp>,
}

impl Voter {
    /// A voter who has never interacted with the proposal.
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            voting_power: 0,
            delegated_to: None,
            delegation_amount: 0,
            last_vote_time: None,
        }
    }

    pub fn has_delegation(&self) -> bool {
        self.delegated_to.is_some()
    }
}
