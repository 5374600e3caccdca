//! Named operations, one variant per wire method.

use agora_governance::NewProposal;
use agora_lending::NewLoan;
use agora_types::Identity;
use serde_json::Value;

use crate::wire_message::wire_identity;
use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProposalOp {
    Create(NewProposal),
    StartVoting,
    /// `choice` is decoded after the status and window checks.
    Vote { choice: String, weight: u64 },
    Execute,
    Delegate { to: Identity, amount: u64 },
    CancelDelegation,
    UpdateVotingPower { power: u64 },
    Info,
    /// Voter record of `who`, or of the sender when absent.
    UserInfo { who: Option<Identity> },
    Pause,
    Resume,
    Cancel,
    Veto,
    Extend { days: u64 },
    UpdateParams {
        quorum_threshold: u64,
        majority_threshold_pct: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoanOp {
    Create(NewLoan),
    Fund,
    Repay { amount: u64 },
    Complete,
    Default,
    Liquidate,
    Verify { status: String },
    Risk { score: u64 },
    Info,
    Pause,
    Resume,
    Batch {
        verification: String,
        score: u64,
        collateral: Option<u64>,
    },
    Emergency,
    Refinance { rate_pct: u64, duration_days: u64 },
    Split { amount: u64 },
    Cancel,
}

/// Positional argument reader for one method.
struct Args<'a> {
    method: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(method: &'static str, values: &'a [Value], min: usize, max: usize) -> Result<Self, EngineError> {
        if values.len() < min || values.len() > max {
            return Err(EngineError::Arity {
                method,
                expected: if values.len() < min { min } else { max },
                got: values.len(),
            });
        }
        Ok(Self { method, values })
    }

    fn exact(method: &'static str, values: &'a [Value], n: usize) -> Result<Self, EngineError> {
        Self::new(method, values, n, n)
    }

    fn bad(&self, index: usize, reason: &str) -> EngineError {
        EngineError::BadArgument {
            method: self.method,
            index,
            reason: reason.to_string(),
        }
    }

    fn u64(&self, index: usize) -> Result<u64, EngineError> {
        self.values
            .get(index)
            .and_then(Value::as_u64)
            .ok_or_else(|| self.bad(index, "must be a non-negative integer"))
    }

    fn opt_u64(&self, index: usize) -> Result<Option<u64>, EngineError> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.u64(index).map(Some),
        }
    }

    fn string(&self, index: usize) -> Result<String, EngineError> {
        self.values
            .get(index)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.bad(index, "must be a string"))
    }

    fn identity(&self, index: usize) -> Result<Identity, EngineError> {
        wire_identity(&self.string(index)?)
    }
}

impl ProposalOp {
    pub fn from_wire(method: &str, args: &[Value]) -> Result<Self, EngineError> {
        let op = match method {
            "create" => {
                let a = Args::exact("create", args, 6)?;
                Self::Create(NewProposal {
                    min_voting_period_days: a.u64(0)?,
                    title: a.string(1)?,
                    description: a.string(2)?,
                    proposal_type: a.string(3)?,
                    quorum_threshold: a.u64(4)?,
                    execution_delay_days: a.u64(5)?,
                })
            }
            "start_voting" | "startVoting" => {
                Args::exact("start_voting", args, 0)?;
                Self::StartVoting
            }
            "vote" => {
                let a = Args::exact("vote", args, 2)?;
                let choice = match &args[0] {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return Err(a.bad(0, "must be a string or number")),
                };
                Self::Vote {
                    choice,
                    weight: a.u64(1)?,
                }
            }
            "execute" => {
                Args::exact("execute", args, 0)?;
                Self::Execute
            }
            "delegate" => {
                let a = Args::exact("delegate", args, 2)?;
                Self::Delegate {
                    to: a.identity(0)?,
                    amount: a.u64(1)?,
                }
            }
            "cancel_delegation" | "cancelDelegation" => {
                Args::exact("cancel_delegation", args, 0)?;
                Self::CancelDelegation
            }
            "update_voting_power" | "updateVotingPower" => {
                let a = Args::exact("update_voting_power", args, 1)?;
                Self::UpdateVotingPower { power: a.u64(0)? }
            }
            "info" => {
                Args::exact("info", args, 0)?;
                Self::Info
            }
            "user_info" | "userInfo" => {
                let a = Args::new("user_info", args, 0, 1)?;
                let who = if args.is_empty() { None } else { Some(a.identity(0)?) };
                Self::UserInfo { who }
            }
            "pause" => {
                Args::exact("pause", args, 0)?;
                Self::Pause
            }
            "resume" => {
                Args::exact("resume", args, 0)?;
                Self::Resume
            }
            "cancel" => {
                Args::exact("cancel", args, 0)?;
                Self::Cancel
            }
            "veto" => {
                Args::exact("veto", args, 0)?;
                Self::Veto
            }
            "extend" => {
                let a = Args::exact("extend", args, 1)?;
                Self::Extend { days: a.u64(0)? }
            }
            "update_params" | "updateParams" => {
                let a = Args::exact("update_params", args, 2)?;
                Self::UpdateParams {
                    quorum_threshold: a.u64(0)?,
                    majority_threshold_pct: a.u64(1)?,
                }
            }
            other => {
                return Err(EngineError::UnknownMethod {
                    entity: "proposal",
                    method: other.to_string(),
                })
            }
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::StartVoting => "start_voting",
            Self::Vote { .. } => "vote",
            Self::Execute => "execute",
            Self::Delegate { .. } => "delegate",
            Self::CancelDelegation => "cancel_delegation",
            Self::UpdateVotingPower { .. } => "update_voting_power",
            Self::Info => "info",
            Self::UserInfo { .. } => "user_info",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
            Self::Veto => "veto",
            Self::Extend { .. } => "extend",
            Self::UpdateParams { .. } => "update_params",
        }
    }
}

impl LoanOp {
    pub fn from_wire(method: &str, args: &[Value]) -> Result<Self, EngineError> {
        let op = match method {
            "create" => {
                let a = Args::exact("create", args, 5)?;
                Self::Create(NewLoan {
                    amount: a.u64(0)?,
                    purpose: a.string(1)?,
                    interest_rate_pct: a.u64(2)?,
                    duration_days: a.u64(3)?,
                    collateral_amount: a.u64(4)?,
                })
            }
            "fund" => {
                Args::exact("fund", args, 0)?;
                Self::Fund
            }
            "repay" => {
                let a = Args::exact("repay", args, 1)?;
                Self::Repay { amount: a.u64(0)? }
            }
            "complete" => {
                Args::exact("complete", args, 0)?;
                Self::Complete
            }
            "default" => {
                Args::exact("default", args, 0)?;
                Self::Default
            }
            "liquidate" => {
                Args::exact("liquidate", args, 0)?;
                Self::Liquidate
            }
            "verify" => {
                let a = Args::exact("verify", args, 1)?;
                Self::Verify { status: a.string(0)? }
            }
            "risk" => {
                let a = Args::exact("risk", args, 1)?;
                Self::Risk { score: a.u64(0)? }
            }
            "info" => {
                Args::exact("info", args, 0)?;
                Self::Info
            }
            "pause" => {
                Args::exact("pause", args, 0)?;
                Self::Pause
            }
            "resume" => {
                Args::exact("resume", args, 0)?;
                Self::Resume
            }
            "batch" => {
                let a = Args::new("batch", args, 2, 3)?;
                Self::Batch {
                    verification: a.string(0)?,
                    score: a.u64(1)?,
                    collateral: a.opt_u64(2)?,
                }
            }
            "emergency" => {
                Args::exact("emergency", args, 0)?;
                Self::Emergency
            }
            "refinance" => {
                let a = Args::exact("refinance", args, 2)?;
                Self::Refinance {
                    rate_pct: a.u64(0)?,
                    duration_days: a.u64(1)?,
                }
            }
            "split" => {
                let a = Args::exact("split", args, 1)?;
                Self::Split { amount: a.u64(0)? }
            }
            "cancel" => {
                Args::exact("cancel", args, 0)?;
                Self::Cancel
            }
            other => {
                return Err(EngineError::UnknownMethod {
                    entity: "loan",
                    method: other.to_string(),
                })
            }
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Fund => "fund",
            Self::Repay { .. } => "repay",
            Self::Complete => "complete",
            Self::Default => "default",
            Self::Liquidate => "liquidate",
            Self::Verify { .. } => "verify",
            Self::Risk { .. } => "risk",
            Self::Info => "info",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Batch { .. } => "batch",
            Self::Emergency => "emergency",
            Self::Refinance { .. } => "refinance",
            Self::Split { .. } => "split",
            Self::Cancel => "cancel",
        }
    }
}
