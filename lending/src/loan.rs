//! Loan records and their lifecycle.

use crate::error::LendingError;
use agora_types::{Identity, LoanId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a loan.
///
/// ```text
/// Pending ──► Active ──► Completed | Defaulted ──► Liquidated
///    │          ▲  │ └──► EmergencyWithdrawal
///    ▼          └──┴──► Paused
/// Cancelled
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Pending,
    Active,
    Completed,
    Defaulted,
    Liquidated,
    Paused,
    Cancelled,
    EmergencyWithdrawal,
}

impl LoanStatus {
    pub fn can_transition_to(self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Cancelled)
                | (Active, Completed)
                | (Active, Defaulted)
                | (Active, Paused)
                | (Active, EmergencyWithdrawal)
                | (Paused, Active)
                | (Defaulted, Liquidated)
        )
    }

    /// No outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Liquidated | Self::Cancelled | Self::EmergencyWithdrawal
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl FromStr for VerificationStatus {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            _ => Err(LendingError::UnknownVerification(s.to_string())),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Arguments to `create`, in wire order after the borrower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub amount: u64,
    pub purpose: String,
    pub interest_rate_pct: u64,
    pub duration_days: u64,
    pub collateral_amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower: Identity,
    pub investor: Option<Identity>,
    pub amount: u64,
    pub purpose: String,
    pub interest_rate_pct: u64,
    pub duration_days: u64,
    pub status: LoanStatus,
    pub created_at: Timestamp,
    /// `EPOCH` until funded.
    pub funded_at: Timestamp,
    pub repayment_amount: u64,
    /// May exceed `repayment_amount`; over-payment is accepted.
    pub amount_repaid: u64,
    pub collateral_amount: u64,
    pub liquidation_threshold_pct: u64,
    pub max_ltv_pct: u64,
    pub grace_period_days: u64,
    pub penalty_rate_pct: u64,
    pub risk_score: u64,
    pub verification_status: VerificationStatus,
}

impl Loan {
    pub(crate) fn require_status(
        &self,
        op: &'static str,
        allowed: &[LoanStatus],
    ) -> Result<(), LendingError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(LendingError::WrongStatus {
                op,
                status: self.status,
            })
        }
    }

    pub(crate) fn transition(&mut self, op: &'static str, next: LoanStatus) -> Result<(), LendingError> {
        if !self.status.can_transition_to(next) {
            return Err(LendingError::WrongStatus {
                op,
                status: self.status,
            });
        }
        tracing::info!(
            loan = self.id.raw(),
            op,
            from = ?self.status,
            to = ?next,
            "loan status changed"
        );
        self.status = next;
        Ok(())
    }

    pub(crate) fn investor(&self) -> Result<&Identity, LendingError> {
        self.investor.as_ref().ok_or(LendingError::NoInvestor)
    }

    /// Outstanding balance, zero once fully repaid.
    pub fn outstanding(&self) -> u64 {
        self.repayment_amount.saturating_sub(self.amount_repaid)
    }
}
