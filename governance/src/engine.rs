//! Proposal state machine: guarded transitions over a [`Proposal`].
//!
//! Every operation checks, in order: authorization, status, time, then
//! numeric arguments. All checks run before the first field is written, so a
//! rejected call leaves the record untouched.

use crate::delegation;
use crate::error::GovernanceError;
use crate::params::GovernanceParams;
use crate::proposal::{NewProposal, Proposal, ProposalStatus, VoteChoice};
use crate::voter::Voter;
use agora_accounting::{meets_threshold, share_pct, Bounds};
use agora_auth::{AuthorizationGuard, Caller, Policy};
use agora_types::{days_to_secs, Identity, ProposalId, Timestamp};
use agora_utils::format_wait;

use ProposalStatus::*;

pub struct ProposalMachine {
    params: GovernanceParams,
    guard: AuthorizationGuard,
}

fn after_days(base: Timestamp, days: u64) -> Result<Timestamp, GovernanceError> {
    days_to_secs(days)
        .and_then(|secs| base.checked_add_secs(secs))
        .ok_or_else(GovernanceError::overflow)
}

impl ProposalMachine {
    pub fn new(params: GovernanceParams, guard: AuthorizationGuard) -> Self {
        Self { params, guard }
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    fn authorize(
        &self,
        policy: &Policy,
        caller: &Caller,
        proposal: &Proposal,
    ) -> Result<(), GovernanceError> {
        let ctx = caller.context().with_creator(&proposal.creator);
        self.guard.check(policy, &ctx)?;
        Ok(())
    }

    /// Build a new proposal created by `creator` at `now`.
    /// Argument checks of [`ProposalMachine::create`], run before an id is allocated.
    pub fn validate_new(&self, args: &NewProposal, now: Timestamp) -> Result<(), GovernanceError> {
        self.params
            .min_voting_period_bounds()
            .check(args.min_voting_period_days)?;
        if args.quorum_threshold == 0 {
            return Err(GovernanceError::ZeroQuorum);
        }
        after_days(now, args.min_voting_period_days)?;
        Ok(())
    }

    pub fn create(
        &self,
        id: ProposalId,
        creator: Identity,
        args: NewProposal,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        self.validate_new(&args, now)?;
        let end_time = after_days(now, args.min_voting_period_days)?;
        let status = if self.params.start_as_draft { Draft } else { Active };

        let proposal = Proposal {
            id,
            creator,
            title: args.title,
            description: args.description,
            proposal_type: args.proposal_type,
            status,
            votes_for: 0,
            votes_against: 0,
            start_time: now,
            end_time,
            min_voting_period_days: args.min_voting_period_days,
            max_voting_period_days: self.params.max_voting_period_days,
            quorum_threshold: args.quorum_threshold,
            majority_threshold_pct: self.params.default_majority_threshold_pct,
            veto_threshold_pct: self.params.default_veto_threshold_pct,
            execution_delay_days: args.execution_delay_days,
            executed: false,
        };
        tracing::info!(
            proposal = id.raw(),
            creator = %proposal.creator,
            status = ?status,
            end_time = %end_time,
            "proposal created"
        );
        Ok(proposal)
    }

    /// `Draft → Active`, creator only. Restarts the clock at `now`.
    pub fn start_voting(
        &self,
        proposal: &mut Proposal,
        caller: &Caller,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.authorize(&Policy::Creator, caller, proposal)?;
        proposal.require_status("start_voting", &[Draft])?;
        proposal.transition("start_voting", Active)?;
        proposal.start_time = now;
        Ok(())
    }

    /// Status and window checks of `vote`, for callers that still have to
    /// decode the ballot.
    pub fn require_voting_open(&self, proposal: &Proposal, now: Timestamp) -> Result<(), GovernanceError> {
        proposal.require_status("vote", &[Active])?;
        if now >= proposal.end_time {
            return Err(GovernanceError::VotingClosed {
                closed_at: proposal.end_time,
            });
        }
        let opens_at = after_days(proposal.start_time, proposal.min_voting_period_days)?;
        if now < opens_at {
            return Err(GovernanceError::VotingNotOpen {
                now,
                wait: format_wait(now.as_secs(), opens_at.as_secs()),
            });
        }
        Ok(())
    }

    /// Cast `weight` for `choice`.
    ///
    /// Voting opens once `min_voting_period_days` have elapsed since
    /// `start_time` and closes at `end_time`. Neither repeat votes nor weight
    /// beyond the voter's power are refused; both are logged.
    pub fn vote(
        &self,
        proposal: &mut Proposal,
        voter: &mut Voter,
        choice: VoteChoice,
        weight: u64,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.require_voting_open(proposal, now)?;

        let (votes_for, votes_against) = match choice {
            VoteChoice::For => (
                proposal
                    .votes_for
                    .checked_add(weight)
                    .ok_or_else(GovernanceError::overflow)?,
                proposal.votes_against,
            ),
            VoteChoice::Against => (
                proposal.votes_for,
                proposal
                    .votes_against
                    .checked_add(weight)
                    .ok_or_else(GovernanceError::overflow)?,
            ),
            VoteChoice::Abstain => (proposal.votes_for, proposal.votes_against),
        };
        votes_for
            .checked_add(votes_against)
            .ok_or_else(GovernanceError::overflow)?;

        if voter.last_vote_time.is_some() {
            tracing::warn!(proposal = proposal.id.raw(), voter = %voter.owner, "repeat vote accepted");
        }
        if weight > voter.voting_power {
            tracing::warn!(
                proposal = proposal.id.raw(),
                voter = %voter.owner,
                weight,
                power = voter.voting_power,
                "vote weight exceeds voting power"
            );
        }

        proposal.votes_for = votes_for;
        proposal.votes_against = votes_against;
        voter.last_vote_time = Some(now);
        tracing::debug!(proposal = proposal.id.raw(), voter = %voter.owner, %choice, weight, "vote recorded");
        Ok(())
    }

    /// Resolve the outcome once `end_time + execution_delay_days` has passed.
    ///
    /// Quorum met: `Passed` if `floor(for * 100 / counted) >= majority`,
    /// else `Rejected`. Quorum missed: `Expired`.
    pub fn execute(
        &self,
        proposal: &mut Proposal,
        now: Timestamp,
    ) -> Result<ProposalStatus, GovernanceError> {
        proposal.require_status("execute", &[Active])?;
        let executable_at = after_days(proposal.end_time, proposal.execution_delay_days)?;
        if now < executable_at {
            return Err(GovernanceError::ExecutionDelay {
                now,
                wait: format_wait(now.as_secs(), executable_at.as_secs()),
            });
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(proposal.id.raw()));
        }

        let counted = proposal.counted_votes()?;
        let outcome = if counted >= proposal.quorum_threshold {
            match share_pct(proposal.votes_for, counted)? {
                Some(pct) if pct >= proposal.majority_threshold_pct => Passed,
                _ => Rejected,
            }
        } else {
            Expired
        };

        proposal.transition("execute", outcome)?;
        proposal.executed = true;
        Ok(outcome)
    }

    /// `Active → Vetoed` when `against * 100 >= counted * veto_threshold_pct`.
    ///
    /// Open to any caller at any time while active, including before
    /// `end_time`. With no counted votes the inequality holds trivially.
    pub fn veto(&self, proposal: &mut Proposal) -> Result<(), GovernanceError> {
        proposal.require_status("veto", &[Active])?;
        let counted = proposal.counted_votes()?;
        if !meets_threshold(proposal.votes_against, counted, proposal.veto_threshold_pct)? {
            return Err(GovernanceError::VetoThresholdNotMet {
                against: proposal.votes_against,
                counted,
                threshold_pct: proposal.veto_threshold_pct,
            });
        }
        proposal.transition("veto", Vetoed)
    }

    pub fn pause(&self, proposal: &mut Proposal, caller: &Caller) -> Result<(), GovernanceError> {
        self.authorize(&Policy::pause_authority(), caller, proposal)?;
        proposal.require_status("pause", &[Active])?;
        proposal.transition("pause", Paused)
    }

    pub fn resume(&self, proposal: &mut Proposal, caller: &Caller) -> Result<(), GovernanceError> {
        self.authorize(&Policy::pause_authority(), caller, proposal)?;
        proposal.require_status("resume", &[Paused])?;
        proposal.transition("resume", Active)
    }

    pub fn cancel(&self, proposal: &mut Proposal, caller: &Caller) -> Result<(), GovernanceError> {
        self.authorize(&Policy::creator_or_admin(), caller, proposal)?;
        proposal.require_status("cancel", &[Active])?;
        proposal.transition("cancel", Cancelled)
    }

    /// Push `end_time` out by `days`, at most `max_voting_period_days` per call.
    pub fn extend(
        &self,
        proposal: &mut Proposal,
        caller: &Caller,
        days: u64,
    ) -> Result<(), GovernanceError> {
        self.authorize(&Policy::creator_or_admin(), caller, proposal)?;
        proposal.require_status("extend", &[Active])?;
        if days > proposal.max_voting_period_days {
            return Err(GovernanceError::ExtensionTooLong {
                days,
                max: proposal.max_voting_period_days,
            });
        }
        let end_time = after_days(proposal.end_time, days)?;
        tracing::info!(proposal = proposal.id.raw(), days, end_time = %end_time, "voting window extended");
        proposal.end_time = end_time;
        Ok(())
    }

    /// Replace the quorum and majority thresholds of a non-terminal proposal.
    pub fn update_params(
        &self,
        proposal: &mut Proposal,
        caller: &Caller,
        quorum_threshold: u64,
        majority_threshold_pct: u64,
    ) -> Result<(), GovernanceError> {
        self.authorize(&Policy::creator_or_admin(), caller, proposal)?;
        proposal.require_status("update_params", &[Draft, Active, Paused])?;
        if quorum_threshold == 0 {
            return Err(GovernanceError::ZeroQuorum);
        }
        Bounds::percent("majority_threshold_pct").check(majority_threshold_pct)?;
        proposal.quorum_threshold = quorum_threshold;
        proposal.majority_threshold_pct = majority_threshold_pct;
        tracing::info!(
            proposal = proposal.id.raw(),
            quorum_threshold,
            majority_threshold_pct,
            "thresholds updated"
        );
        Ok(())
    }

    pub fn delegate(&self, from: &mut Voter, to: &mut Voter, amount: u64) -> Result<(), GovernanceError> {
        delegation::delegate(from, to, amount)?;
        tracing::info!(delegator = %from.owner, delegatee = %to.owner, amount, "power delegated");
        Ok(())
    }

    pub fn cancel_delegation(&self, from: &mut Voter, delegatee: &mut Voter) -> Result<u64, GovernanceError> {
        let amount = delegation::cancel_delegation(from, delegatee)?;
        tracing::info!(delegator = %from.owner, delegatee = %delegatee.owner, amount, "delegation cancelled");
        Ok(amount)
    }

    /// Overwrite the caller's own voting power.
    ///
    /// Outstanding delegations are not reconciled against the new value.
    pub fn update_voting_power(&self, voter: &mut Voter, power: u64) {
        tracing::info!(voter = %voter.owner, from = voter.voting_power, to = power, "voting power set");
        voter.voting_power = power;
    }
}
