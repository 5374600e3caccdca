use crate::proposal::ProposalStatus;
use agora_accounting::AccountingError;
use agora_auth::AuthError;
use agora_types::{ErrorKind, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{op} is not allowed while the proposal is {status:?}")]
    WrongStatus {
        op: &'static str,
        status: ProposalStatus,
    },

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(u64),

    #[error("no outstanding delegation to cancel")]
    NoDelegation,

    #[error("voting has not matured yet at {now}, {wait}")]
    VotingNotOpen { now: Timestamp, wait: String },

    #[error("voting window closed at {closed_at}")]
    VotingClosed { closed_at: Timestamp },

    #[error("execution delay has not elapsed at {now}, {wait}")]
    ExecutionDelay { now: Timestamp, wait: String },

    #[error("veto threshold not met: {against} against of {counted} counted, need {threshold_pct}%")]
    VetoThresholdNotMet {
        against: u64,
        counted: u64,
        threshold_pct: u64,
    },

    #[error("insufficient voting power: have {have}, need {need}")]
    InsufficientVotingPower { have: u64, need: u64 },

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("delegation amount must be non-zero")]
    ZeroDelegation,

    #[error("quorum threshold must be non-zero")]
    ZeroQuorum,

    #[error("extension of {days} days exceeds the {max} day maximum")]
    ExtensionTooLong { days: u64, max: u64 },

    #[error("delegatee does not match the recorded delegation")]
    DelegateeMismatch,

    #[error(transparent)]
    Accounting(#[from] AccountingError),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(e) => e.kind(),
            Self::WrongStatus { .. }
            | Self::AlreadyExecuted(_)
            | Self::NoDelegation
            | Self::DelegateeMismatch => ErrorKind::InvalidState,
            Self::VotingNotOpen { .. } | Self::VotingClosed { .. } | Self::ExecutionDelay { .. } => {
                ErrorKind::TemporalViolation
            }
            Self::VetoThresholdNotMet { .. }
            | Self::InsufficientVotingPower { .. }
            | Self::SelfDelegation
            | Self::ZeroDelegation
            | Self::ZeroQuorum
            | Self::ExtensionTooLong { .. } => ErrorKind::Validation,
            Self::Accounting(e) => e.kind(),
        }
    }
}

impl GovernanceError {
    pub(crate) fn overflow() -> Self {
        Self::Accounting(AccountingError::Overflow)
    }
}
