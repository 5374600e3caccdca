//! Proposal records and the per-(proposal, identity) voter side-table.

use crate::StoreError;
use agora_types::{Identity, ProposalId};

/// One encoded voter record keyed by its owner.
pub type VoterRow = (Identity, Vec<u8>);

pub trait ProposalStore: Send + Sync {
    /// Get an encoded proposal.
    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError>;

    /// Get an encoded voter record; `None` if the identity never touched the proposal.
    fn get_voter(&self, id: ProposalId, voter: &Identity) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a proposal and any voter rows it changed as one unit.
    ///
    /// Either every record is written or none is.
    fn commit_proposal(
        &self,
        id: ProposalId,
        proposal: &[u8],
        voters: &[VoterRow],
    ) -> Result<(), StoreError>;

    fn proposal_count(&self) -> Result<u64, StoreError>;
}
