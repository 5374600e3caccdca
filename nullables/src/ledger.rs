//! Nullable payment rail: records transfers and fails on demand.

use agora_ledger::{PaymentRail, TransferOutcome, TransferReceipt, TransferRequest};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// A payment rail that confirms every transfer unless told to decline.
///
/// Only confirmed transfers are recorded; declined ones are counted.
#[derive(Default)]
pub struct NullLedger {
    sequence: AtomicU64,
    declining: AtomicBool,
    declined: AtomicU64,
    confirmed: Mutex<Vec<TransferRequest>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decline every transfer until switched back.
    pub fn set_declining(&self, declining: bool) {
        self.declining.store(declining, Ordering::SeqCst);
    }

    /// Snapshot of every confirmed transfer, in order.
    pub fn transfers(&self) -> Vec<TransferRequest> {
        self.confirmed
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    pub fn declined_count(&self) -> u64 {
        self.declined.load(Ordering::SeqCst)
    }
}

impl PaymentRail for NullLedger {
    fn transfer(&self, request: &TransferRequest) -> TransferOutcome {
        if self.declining.load(Ordering::SeqCst) {
            self.declined.fetch_add(1, Ordering::SeqCst);
            return TransferOutcome::Failed {
                reason: "declined by null ledger".to_string(),
            };
        }
        let mut confirmed = match self.confirmed.lock() {
            Ok(guard) => guard,
            Err(_) => {
                return TransferOutcome::Failed {
                    reason: "null ledger poisoned".to_string(),
                }
            }
        };
        confirmed.push(request.clone());
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        TransferOutcome::Confirmed(TransferReceipt {
            sequence,
            amount: request.amount,
        })
    }
}
