use agora_types::{ErrorKind, Identity};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transfer of {amount} from {from} to {to} failed: {reason}")]
    TransferFailed {
        from: Identity,
        to: Identity,
        amount: u64,
        reason: String,
    },
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::TransferFailed
    }
}
