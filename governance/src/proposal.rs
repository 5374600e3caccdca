//! Governance proposals and their lifecycle.

use crate::error::GovernanceError;
use agora_types::{Identity, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a proposal.
///
/// ```text
/// Draft ──► Active ──► Passed | Rejected | Expired | Vetoed | Cancelled
///             ▲  │
///             └──┴──► Paused
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Draft,
    Active,
    Paused,
    Passed,
    Rejected,
    Vetoed,
    Expired,
    Cancelled,
}

impl ProposalStatus {
    /// Whether the transition table contains the edge `self → next`.
    pub fn can_transition_to(self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, next),
            (Draft, Active)
                | (Active, Passed)
                | (Active, Rejected)
                | (Active, Expired)
                | (Active, Vetoed)
                | (Active, Cancelled)
                | (Active, Paused)
                | (Paused, Active)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Passed | Self::Rejected | Self::Vetoed | Self::Expired | Self::Cancelled
        )
    }
}

/// A ballot choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    For,
    Against,
    /// Recorded against the voter but counted in neither tally.
    Abstain,
}

impl FromStr for VoteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "for" | "yes" | "1" => Ok(Self::For),
            "against" | "no" | "0" => Ok(Self::Against),
            "abstain" | "2" => Ok(Self::Abstain),
            other => Err(format!("unknown vote choice {:?}", other)),
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::For => write!(f, "for"),
            Self::Against => write!(f, "against"),
            Self::Abstain => write!(f, "abstain"),
        }
    }
}

/// Arguments of `create`, in wire order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProposal {
    pub min_voting_period_days: u64,
    pub title: String,
    pub description: String,
    pub proposal_type: String,
    pub quorum_threshold: u64,
    pub execution_delay_days: u64,
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub creator: Identity,
    pub title: String,
    pub description: String,
    pub proposal_type: String,
    pub status: ProposalStatus,
    pub votes_for: u64,
    pub votes_against: u64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub min_voting_period_days: u64,
    pub max_voting_period_days: u64,
    /// Absolute count of `for + against` votes required for the outcome to stand.
    pub quorum_threshold: u64,
    pub majority_threshold_pct: u64,
    pub veto_threshold_pct: u64,
    pub execution_delay_days: u64,
    pub executed: bool,
}

impl Proposal {
    /// `votes_for + votes_against`.
    pub fn counted_votes(&self) -> Result<u64, GovernanceError> {
        self.votes_for
            .checked_add(self.votes_against)
            .ok_or_else(GovernanceError::overflow)
    }

    /// Fail unless the current status is one of `allowed`.
    pub(crate) fn require_status(
        &self,
        op: &'static str,
        allowed: &[ProposalStatus],
    ) -> Result<(), GovernanceError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(GovernanceError::WrongStatus {
                op,
                status: self.status,
            })
        }
    }

    /// Move along an edge of the transition table.
    pub(crate) fn transition(
        &mut self,
        op: &'static str,
        next: ProposalStatus,
    ) -> Result<(), GovernanceError> {
        if !self.status.can_transition_to(next) {
            return Err(GovernanceError::WrongStatus {
                op,
                status: self.status,
            });
        }
        tracing::info!(
            proposal = self.id.raw(),
            op,
            from = ?self.status,
            to = ?next,
            "proposal status changed"
        );
        self.status = next;
        Ok(())
    }
}
