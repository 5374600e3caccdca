//! Governance parameters fixed at engine construction.

use agora_accounting::{AccountingError, Bounds};
use serde::{Deserialize, Serialize};

/// Defaults applied to every proposal the engine creates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Upper bound for `min_voting_period_days` at create (lower bound is 1).
    #[serde(default = "default_min_voting_period_days_max")]
    pub min_voting_period_days_max: u64,

    /// Largest single `extend` a proposal accepts, in days.
    #[serde(default = "default_max_voting_period_days")]
    pub max_voting_period_days: u64,

    /// Percentage of `for` votes among counted votes needed to pass.
    #[serde(default = "default_majority_threshold_pct")]
    pub default_majority_threshold_pct: u64,

    /// Percentage of `against` votes that lets a veto succeed.
    #[serde(default = "default_veto_threshold_pct")]
    pub default_veto_threshold_pct: u64,

    /// Create proposals in `Draft`; the creator opens them with `start_voting`.
    #[serde(default)]
    pub start_as_draft: bool,
}

fn default_min_voting_period_days_max() -> u64 {
    90
}

fn default_max_voting_period_days() -> u64 {
    90
}

fn default_majority_threshold_pct() -> u64 {
    51
}

fn default_veto_threshold_pct() -> u64 {
    33
}

impl GovernanceParams {
    /// Reject percentages above 100 and an empty voting-period range.
    pub fn validate(&self) -> Result<(), AccountingError> {
        Bounds::percent("default_majority_threshold_pct").check(self.default_majority_threshold_pct)?;
        Bounds::percent("default_veto_threshold_pct").check(self.default_veto_threshold_pct)?;
        Bounds::new("min_voting_period_days_max", 1, u64::MAX).check(self.min_voting_period_days_max)?;
        Ok(())
    }

    pub fn min_voting_period_bounds(&self) -> Bounds {
        Bounds::new("min_voting_period_days", 1, self.min_voting_period_days_max)
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_voting_period_days_max: default_min_voting_period_days_max(),
            max_voting_period_days: default_max_voting_period_days(),
            default_majority_threshold_pct: default_majority_threshold_pct(),
            default_veto_threshold_pct: default_veto_threshold_pct(),
            start_as_draft: false,
        }
    }
}
