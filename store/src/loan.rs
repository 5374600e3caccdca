//! Loan records.

use crate::StoreError;
use agora_types::LoanId;

pub trait LoanStore: Send + Sync {
    fn get_loan(&self, id: LoanId) -> Result<Vec<u8>, StoreError>;

    /// Insert or replace an encoded loan.
    fn put_loan(&self, id: LoanId, loan: &[u8]) -> Result<(), StoreError>;

    fn loan_count(&self) -> Result<u64, StoreError>;
}
