//! Lending parameters fixed at engine construction.

use agora_accounting::{AccountingError, Bounds};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingParams {
    /// Smallest principal accepted at create, in smallest units.
    pub min_amount: u64,
    pub max_amount: u64,
    pub max_interest_rate_pct: u64,
    pub min_duration_days: u64,
    pub max_duration_days: u64,
    pub liquidation_threshold_pct: u64,
    pub max_ltv_pct: u64,
    pub grace_period_days: u64,
    pub penalty_rate_pct: u64,
    /// Added to `penalty_rate_pct` for every repayment made after the grace period.
    pub penalty_step_pct: u64,
    /// How long after funding the investor may pull out of an active loan.
    pub emergency_withdrawal_secs: u64,
}

impl Default for LendingParams {
    fn default() -> Self {
        Self {
            min_amount: 1_000_000,
            max_amount: 1_000_000_000_000,
            max_interest_rate_pct: 50,
            min_duration_days: 1,
            max_duration_days: 365,
            liquidation_threshold_pct: 80,
            max_ltv_pct: 70,
            grace_period_days: 3,
            penalty_rate_pct: 5,
            penalty_step_pct: 2,
            emergency_withdrawal_secs: 2_592_000,
        }
    }
}

impl LendingParams {
    pub fn validate(&self) -> Result<(), AccountingError> {
        Bounds::new("min_amount", 1, self.max_amount).check(self.min_amount)?;
        Bounds::percent("max_interest_rate_pct").check(self.max_interest_rate_pct)?;
        Bounds::new("min_duration_days", 1, self.max_duration_days).check(self.min_duration_days)?;
        Bounds::percent("liquidation_threshold_pct").check(self.liquidation_threshold_pct)?;
        Bounds::new("max_ltv_pct", 1, 100).check(self.max_ltv_pct)?;
        Bounds::percent("penalty_rate_pct").check(self.penalty_rate_pct)?;
        Ok(())
    }

    pub fn amount_bounds(&self) -> Bounds {
        Bounds::new("amount", self.min_amount, self.max_amount)
    }

    pub fn rate_bounds(&self) -> Bounds {
        Bounds::new("interest_rate_pct", 0, self.max_interest_rate_pct)
    }

    pub fn duration_bounds(&self) -> Bounds {
        Bounds::new("duration_days", self.min_duration_days, self.max_duration_days)
    }
}
