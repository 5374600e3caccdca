//! The host-ledger transfer seam.

use crate::error::LedgerError;
use agora_types::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a transfer is being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferPurpose {
    /// Principal from investor to borrower.
    Funding,
    /// Borrower payment forwarded to the investor.
    Repayment,
    /// Posted collateral from escrow to the investor.
    Liquidation,
}

impl fmt::Display for TransferPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funding => write!(f, "funding"),
            Self::Repayment => write!(f, "repayment"),
            Self::Liquidation => write!(f, "liquidation"),
        }
    }
}

/// One instruction to move `amount` smallest units from `from` to `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: Identity,
    pub to: Identity,
    pub amount: u64,
    pub purpose: TransferPurpose,
}

/// Host-issued proof that a transfer was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Host ledger sequence number of the applied transfer.
    pub sequence: u64,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Confirmed(TransferReceipt),
    Failed { reason: String },
}

/// Moves value between accounts on instruction from the engines.
///
/// Implementations must be synchronous: `transfer` returns only once the
/// host knows whether the transfer was applied.
pub trait PaymentRail: Send + Sync {
    fn transfer(&self, request: &TransferRequest) -> TransferOutcome;
}

/// Submit `request` and turn a declined transfer into [`LedgerError::TransferFailed`].
pub fn settle(
    rail: &dyn PaymentRail,
    request: TransferRequest,
) -> Result<TransferReceipt, LedgerError> {
    let _span = tracing::debug_span!(
        "transfer",
        purpose = %request.purpose,
        from = %request.from,
        to = %request.to,
        amount = request.amount
    )
    .entered();
    match rail.transfer(&request) {
        TransferOutcome::Confirmed(receipt) => {
            tracing::debug!(sequence = receipt.sequence, "transfer confirmed");
            Ok(receipt)
        }
        TransferOutcome::Failed { reason } => {
            tracing::warn!(%reason, "transfer declined by payment rail");
            Err(LedgerError::TransferFailed {
                from: request.from,
                to: request.to,
                amount: request.amount,
                reason,
            })
        }
    }
}
