//! Nullable store: thread-safe in-memory storage for testing.

use agora_store::{EntityKind, IdAllocator, LoanStore, ProposalStore, StoreError, VoterRow};
use agora_types::{Identity, LoanId, ProposalId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    proposals: HashMap<u64, Vec<u8>>,
    voters: HashMap<(u64, Identity), Vec<u8>>,
    loans: HashMap<u64, Vec<u8>>,
    counters: HashMap<EntityKind, u64>,
}

/// An in-memory proposal, voter and loan store.
///
/// All tables sit behind one mutex so a proposal commit with its voter rows
/// is applied as one unit.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    /// Fail every write while set.
    fail_writes: Mutex<bool>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("null store poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        let failing = self
            .fail_writes
            .lock()
            .map(|f| *f)
            .map_err(|_| StoreError::Backend("null store poisoned".to_string()))?;
        if failing {
            return Err(StoreError::Backend("write failure injected".to_string()));
        }
        Ok(())
    }
}

impl ProposalStore for NullStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError> {
        self.tables()?
            .proposals
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_voter(&self, id: ProposalId, voter: &Identity) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .tables()?
            .voters
            .get(&(id.raw(), voter.clone()))
            .cloned())
    }

    fn commit_proposal(
        &self,
        id: ProposalId,
        proposal: &[u8],
        voters: &[VoterRow],
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables()?;
        tables.proposals.insert(id.raw(), proposal.to_vec());
        for (owner, bytes) in voters {
            tables.voters.insert((id.raw(), owner.clone()), bytes.clone());
        }
        Ok(())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.proposals.len() as u64)
    }
}

impl LoanStore for NullStore {
    fn get_loan(&self, id: LoanId) -> Result<Vec<u8>, StoreError> {
        self.tables()?
            .loans
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_loan(&self, id: LoanId, loan: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.tables()?.loans.insert(id.raw(), loan.to_vec());
        Ok(())
    }

    fn loan_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.loans.len() as u64)
    }
}

impl IdAllocator for NullStore {
    fn next_id(&self, kind: EntityKind) -> Result<u64, StoreError> {
        let mut tables = self.tables()?;
        let counter = tables.counters.entry(kind).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| StoreError::IdsExhausted(kind.to_string()))?;
        Ok(*counter)
    }
}
