//! The dispatcher: one named operation in, one committed result out.
//!
//! Each operation samples the clock once, takes the entity's exclusive lock,
//! loads the record, runs the state machine on the loaded copy and writes it
//! back only if every check (and any transfer) succeeded. A rejected
//! operation writes nothing.

use std::sync::Arc;

use agora_auth::Caller;
use agora_governance::{GovernanceError, NewProposal, Proposal, ProposalMachine, VoteChoice, Voter};
use agora_ledger::{PaymentRail, TransferReceipt};
use agora_lending::{LendingError, Loan, LoanMachine, NewLoan};
use agora_store::{EntityKind, IdAllocator, LoanStore, ProposalStore, VoterRow};
use agora_types::{Clock, ErrorKind, Identity, LoanId, ProposalId, Timestamp};

use crate::codec::{decode, encode};
use crate::config::EngineConfig;
use crate::locks::{hold, EntityLocks};
use crate::metrics::EngineMetrics;
use crate::operation::{LoanOp, ProposalOp};
use crate::tracing_spans::{commit_span, operation_span};
use crate::wire_message::{Call, Entity, Outcome, Status};
use crate::EngineError;

/// Everything the dispatcher needs from storage.
pub trait EngineStore: ProposalStore + LoanStore + IdAllocator {}

impl<T: ProposalStore + LoanStore + IdAllocator> EngineStore for T {}

pub struct Engine<S, R, C> {
    store: Arc<S>,
    rail: Arc<R>,
    clock: Arc<C>,
    proposals: ProposalMachine,
    loans: LoanMachine,
    locks: EntityLocks,
    metrics: Option<EngineMetrics>,
}

impl<S, R, C> Engine<S, R, C>
where
    S: EngineStore,
    R: PaymentRail,
    C: Clock,
{
    pub fn new(
        config: &EngineConfig,
        store: Arc<S>,
        rail: Arc<R>,
        clock: Arc<C>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let guard = config.guard()?;
        let metrics = if config.enable_metrics {
            Some(EngineMetrics::new()?)
        } else {
            None
        };
        tracing::info!(
            authorized = config.authorized_set.len(),
            multisig_min_signatures = config.multisig_min_signatures,
            start_as_draft = config.governance.start_as_draft,
            "engine ready"
        );
        Ok(Self {
            proposals: ProposalMachine::new(config.governance.clone(), guard.clone()),
            loans: LoanMachine::new(config.lending.clone(), guard, config.escrow()?),
            store,
            rail,
            clock,
            locks: EntityLocks::new(),
            metrics,
        })
    }

    pub fn metrics(&self) -> Option<&EngineMetrics> {
        self.metrics.as_ref()
    }

    /// Decode and run one wire call.
    pub fn dispatch(&self, call: &Call) -> Result<Outcome, EngineError> {
        let caller = call.caller()?;
        match call.entity {
            Entity::Proposal => {
                let op = ProposalOp::from_wire(&call.method, &call.args)?;
                self.proposal(&caller, call.id.map(ProposalId::new), op)
            }
            Entity::Loan => {
                let op = LoanOp::from_wire(&call.method, &call.args)?;
                self.loan(&caller, call.id.map(LoanId::new), op)
            }
        }
    }

    /// [`Engine::dispatch`] from and to JSON.
    pub fn dispatch_json(&self, json: &str) -> Result<String, EngineError> {
        let call = Call::from_json(json)?;
        self.dispatch(&call)?.to_json()
    }

    // ── Proposals ──────────────────────────────────────────────────────

    pub fn proposal(
        &self,
        caller: &Caller,
        id: Option<ProposalId>,
        op: ProposalOp,
    ) -> Result<Outcome, EngineError> {
        let now = self.clock.now();
        let _span = operation_span(
            Entity::Proposal.as_str(),
            id.map(ProposalId::raw),
            op.name(),
            caller.sender.as_str(),
        )
        .entered();
        let result = match (id, op) {
            (None, ProposalOp::Create(args)) => self.create_proposal(caller, args, now),
            (Some(_), ProposalOp::Create(_)) => Err(EngineError::UnexpectedId),
            (None, op) => Err(EngineError::MissingId(op.name())),
            (Some(id), op) => self.apply_proposal(caller, id, op, now),
        };
        self.record(&result);
        result
    }

    fn create_proposal(
        &self,
        caller: &Caller,
        args: NewProposal,
        now: Timestamp,
    ) -> Result<Outcome, EngineError> {
        self.proposals.validate_new(&args, now)?;
        let id = ProposalId::new(self.store.next_id(EntityKind::Proposal)?);
        let proposal = self.proposals.create(id, caller.sender.clone(), args, now)?;
        self.commit_proposal(&proposal, &[])?;
        self.refresh_gauges();
        Ok(Outcome::Created { id: id.raw() })
    }

    fn apply_proposal(
        &self,
        caller: &Caller,
        id: ProposalId,
        op: ProposalOp,
        now: Timestamp,
    ) -> Result<Outcome, EngineError> {
        // Records are never deleted, so a record seen here still exists once
        // the slot is held; unknown ids never get a slot.
        self.store.get_proposal(id)?;
        let slot = self.locks.slot(EntityKind::Proposal, id.raw());
        let _held = hold(&slot);

        let mut proposal = self.load_proposal(id)?;
        let machine = &self.proposals;
        let sender = &caller.sender;

        let touched = match op {
            ProposalOp::Create(_) => return Err(EngineError::UnexpectedId),
            ProposalOp::Info => return Ok(Outcome::Proposal(proposal)),
            ProposalOp::UserInfo { who } => {
                let who = who.unwrap_or_else(|| sender.clone());
                return Ok(Outcome::Voter(self.load_voter(id, &who)?));
            }
            ProposalOp::StartVoting => {
                machine.start_voting(&mut proposal, caller, now)?;
                Vec::new()
            }
            ProposalOp::Vote { choice, weight } => {
                machine.require_voting_open(&proposal, now)?;
                let choice: VoteChoice = choice.parse().map_err(|reason| EngineError::BadArgument {
                    method: "vote",
                    index: 0,
                    reason,
                })?;
                let mut voter = self.load_voter(id, sender)?;
                machine.vote(&mut proposal, &mut voter, choice, weight, now)?;
                vec![voter]
            }
            ProposalOp::Execute => {
                machine.execute(&mut proposal, now)?;
                Vec::new()
            }
            ProposalOp::Delegate { to, amount } => {
                let mut from = self.load_voter(id, sender)?;
                let mut target = self.load_voter(id, &to)?;
                machine.delegate(&mut from, &mut target, amount)?;
                vec![from, target]
            }
            ProposalOp::CancelDelegation => {
                let mut from = self.load_voter(id, sender)?;
                let to = from
                    .delegated_to
                    .clone()
                    .ok_or(GovernanceError::NoDelegation)?;
                let mut target = self.load_voter(id, &to)?;
                machine.cancel_delegation(&mut from, &mut target)?;
                vec![from, target]
            }
            ProposalOp::UpdateVotingPower { power } => {
                let mut voter = self.load_voter(id, sender)?;
                machine.update_voting_power(&mut voter, power);
                vec![voter]
            }
            ProposalOp::Pause => {
                machine.pause(&mut proposal, caller)?;
                Vec::new()
            }
            ProposalOp::Resume => {
                machine.resume(&mut proposal, caller)?;
                Vec::new()
            }
            ProposalOp::Cancel => {
                machine.cancel(&mut proposal, caller)?;
                Vec::new()
            }
            ProposalOp::Veto => {
                machine.veto(&mut proposal)?;
                Vec::new()
            }
            ProposalOp::Extend { days } => {
                machine.extend(&mut proposal, caller, days)?;
                Vec::new()
            }
            ProposalOp::UpdateParams {
                quorum_threshold,
                majority_threshold_pct,
            } => {
                machine.update_params(&mut proposal, caller, quorum_threshold, majority_threshold_pct)?;
                Vec::new()
            }
        };

        self.commit_proposal(&proposal, &touched)?;
        Ok(Outcome::Committed {
            status: Status::Proposal(proposal.status),
        })
    }

    fn load_proposal(&self, id: ProposalId) -> Result<Proposal, EngineError> {
        decode(&self.store.get_proposal(id)?)
    }

    /// A voter row, or a fresh zero-power record if `who` never touched the proposal.
    fn load_voter(&self, id: ProposalId, who: &Identity) -> Result<Voter, EngineError> {
        match self.store.get_voter(id, who)? {
            Some(bytes) => decode(&bytes),
            None => Ok(Voter::new(who.clone())),
        }
    }

    fn commit_proposal(&self, proposal: &Proposal, voters: &[Voter]) -> Result<(), EngineError> {
        let _span = commit_span(Entity::Proposal.as_str(), proposal.id.raw()).entered();
        let bytes = encode(proposal)?;
        let rows = voters
            .iter()
            .map(|v| Ok((v.owner.clone(), encode(v)?)))
            .collect::<Result<Vec<VoterRow>, EngineError>>()?;
        self.store.commit_proposal(proposal.id, &bytes, &rows)?;
        Ok(())
    }

    // ── Loans ──────────────────────────────────────────────────────────

    pub fn loan(&self, caller: &Caller, id: Option<LoanId>, op: LoanOp) -> Result<Outcome, EngineError> {
        let now = self.clock.now();
        let _span = operation_span(
            Entity::Loan.as_str(),
            id.map(LoanId::raw),
            op.name(),
            caller.sender.as_str(),
        )
        .entered();
        let result = match (id, op) {
            (None, LoanOp::Create(args)) => self.create_loan(caller, args, now),
            (Some(_), LoanOp::Create(_)) => Err(EngineError::UnexpectedId),
            (None, op) => Err(EngineError::MissingId(op.name())),
            (Some(id), op) => self.apply_loan(caller, id, op, now),
        };
        self.record(&result);
        result
    }

    fn create_loan(&self, caller: &Caller, args: NewLoan, now: Timestamp) -> Result<Outcome, EngineError> {
        self.loans.validate_new(&args)?;
        let id = LoanId::new(self.store.next_id(EntityKind::Loan)?);
        let loan = self.loans.create(id, caller.sender.clone(), args, now)?;
        self.put_loan(&loan)?;
        self.refresh_gauges();
        Ok(Outcome::Created { id: id.raw() })
    }

    fn apply_loan(
        &self,
        caller: &Caller,
        id: LoanId,
        op: LoanOp,
        now: Timestamp,
    ) -> Result<Outcome, EngineError> {
        self.store.get_loan(id)?;
        let slot = self.locks.slot(EntityKind::Loan, id.raw());
        let _held = hold(&slot);

        let mut loan = self.load_loan(id)?;
        let machine = &self.loans;
        let rail: &dyn PaymentRail = self.rail.as_ref();

        let receipt = match op {
            LoanOp::Create(_) => return Err(EngineError::UnexpectedId),
            LoanOp::Info => return Ok(Outcome::Loan(loan)),
            LoanOp::Fund => Some(self.count_transfer(machine.fund(&mut loan, caller, rail, now))?),
            LoanOp::Repay { amount } => {
                Some(self.count_transfer(machine.repay(&mut loan, caller, amount, rail, now))?)
            }
            LoanOp::Liquidate => Some(self.count_transfer(machine.liquidate(&mut loan, caller, rail))?),
            LoanOp::Complete => {
                machine.complete(&mut loan, caller)?;
                None
            }
            LoanOp::Default => {
                machine.default(&mut loan, caller, now)?;
                None
            }
            LoanOp::Verify { status } => {
                machine.verify(&mut loan, caller, &status)?;
                None
            }
            LoanOp::Risk { score } => {
                machine.risk(&mut loan, caller, score)?;
                None
            }
            LoanOp::Pause => {
                machine.pause(&mut loan, caller)?;
                None
            }
            LoanOp::Resume => {
                machine.resume(&mut loan, caller)?;
                None
            }
            LoanOp::Batch {
                verification,
                score,
                collateral,
            } => {
                machine.batch(&mut loan, caller, &verification, score, collateral)?;
                None
            }
            LoanOp::Emergency => {
                machine.emergency(&mut loan, caller, now)?;
                None
            }
            LoanOp::Refinance {
                rate_pct,
                duration_days,
            } => {
                machine.refinance(&mut loan, caller, rate_pct, duration_days)?;
                None
            }
            LoanOp::Split { amount } => {
                machine.split(&mut loan, caller, amount)?;
                None
            }
            LoanOp::Cancel => {
                machine.cancel(&mut loan, caller)?;
                None
            }
        };

        if let Err(e) = self.put_loan(&loan) {
            if let Some(receipt) = receipt {
                tracing::error!(
                    loan = id.raw(),
                    sequence = receipt.sequence,
                    amount = receipt.amount,
                    error = %e,
                    "transfer confirmed but loan commit failed"
                );
            }
            return Err(e);
        }
        Ok(Outcome::Committed {
            status: Status::Loan(loan.status),
        })
    }

    fn load_loan(&self, id: LoanId) -> Result<Loan, EngineError> {
        decode(&self.store.get_loan(id)?)
    }

    fn put_loan(&self, loan: &Loan) -> Result<(), EngineError> {
        let _span = commit_span(Entity::Loan.as_str(), loan.id.raw()).entered();
        self.store.put_loan(loan.id, &encode(loan)?)?;
        Ok(())
    }

    fn count_transfer(
        &self,
        result: Result<TransferReceipt, LendingError>,
    ) -> Result<TransferReceipt, LendingError> {
        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(_) => metrics.transfers_confirmed.inc(),
                Err(e) if e.kind() == ErrorKind::TransferFailed => metrics.transfers_failed.inc(),
                Err(_) => {}
            }
        }
        result
    }

    // ── Bookkeeping ────────────────────────────────────────────────────

    fn record(&self, result: &Result<Outcome, EngineError>) {
        match result {
            Ok(_) => {
                tracing::debug!("operation committed");
                if let Some(metrics) = &self.metrics {
                    metrics.operations_committed.inc();
                }
            }
            Err(e) => {
                tracing::debug!(kind = %e.kind(), error = %e, "operation rejected");
                if let Some(metrics) = &self.metrics {
                    metrics.operations_rejected.inc();
                }
            }
        }
    }

    fn refresh_gauges(&self) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        if let Ok(n) = self.store.proposal_count() {
            metrics.proposal_count.set(i64::try_from(n).unwrap_or(i64::MAX));
        }
        if let Ok(n) = self.store.loan_count() {
            metrics.loan_count.set(i64::try_from(n).unwrap_or(i64::MAX));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::{NullClock, NullLedger, NullStore};

    fn engine() -> Engine<NullStore, NullLedger, NullClock> {
        Engine::new(
            &EngineConfig::default(),
            Arc::new(NullStore::new()),
            Arc::new(NullLedger::new()),
            Arc::new(NullClock::new(1_700_000_000)),
        )
        .unwrap()
    }

    #[test]
    fn unknown_ids_do_not_allocate_lock_slots() {
        let engine = engine();
        let caller = Caller::new(Identity::new("agr_someone"));
        for raw in 1..=50 {
            let err = engine.loan(&caller, Some(LoanId::new(raw)), LoanOp::Info).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            let err = engine
                .proposal(&caller, Some(ProposalId::new(raw)), ProposalOp::Info)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert!(engine.locks.is_empty());
    }

    #[test]
    fn one_slot_per_touched_entity() {
        let engine = engine();
        let borrower = Caller::new(Identity::new("agr_borrower"));
        let args = NewLoan {
            amount: 1_000_000,
            purpose: "stock".into(),
            interest_rate_pct: 10,
            duration_days: 30,
            collateral_amount: 0,
        };
        let Outcome::Created { id } = engine.loan(&borrower, None, LoanOp::Create(args)).unwrap() else {
            panic!("expected a created loan");
        };
        for _ in 0..3 {
            engine.loan(&borrower, Some(LoanId::new(id)), LoanOp::Info).unwrap();
        }
        assert_eq!(engine.locks.len(), 1);
    }
}
