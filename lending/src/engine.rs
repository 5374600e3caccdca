//! Loan state machine.
//!
//! Checks run in the order authorization, status, time, numeric. Operations
//! that move value (`fund`, `repay`, `liquidate`) compute every new field
//! first, then settle through the [`PaymentRail`], and write the loan only
//! after the rail confirms.

use crate::error::LendingError;
use crate::loan::{Loan, LoanStatus, NewLoan, VerificationStatus};
use crate::params::LendingParams;
use agora_accounting::{compute_repayment, loan_to_value_ok, Bounds};
use agora_auth::{AuthorizationGuard, Caller, Policy};
use agora_ledger::{settle, PaymentRail, TransferPurpose, TransferReceipt, TransferRequest};
use agora_types::{days_to_secs, Identity, LoanId, Timestamp};
use agora_utils::format_wait;

use LoanStatus::*;

pub struct LoanMachine {
    params: LendingParams,
    guard: AuthorizationGuard,
    /// Account holding posted collateral.
    escrow: Identity,
}

impl LoanMachine {
    pub fn new(params: LendingParams, guard: AuthorizationGuard, escrow: Identity) -> Self {
        Self {
            params,
            guard,
            escrow,
        }
    }

    pub fn params(&self) -> &LendingParams {
        &self.params
    }

    fn authorize(&self, policy: &Policy, caller: &Caller, loan: &Loan) -> Result<(), LendingError> {
        let ctx = caller
            .context()
            .with_parties(&loan.borrower, loan.investor.as_ref());
        self.guard.check(policy, &ctx)?;
        Ok(())
    }

    /// End of the grace period: `funded_at + (duration + grace) days`.
    fn grace_deadline(loan: &Loan) -> Result<Timestamp, LendingError> {
        loan.duration_days
            .checked_add(loan.grace_period_days)
            .and_then(days_to_secs)
            .and_then(|secs| loan.funded_at.checked_add_secs(secs))
            .ok_or_else(LendingError::overflow)
    }

    /// Argument checks of [`LoanMachine::create`], run before an id is allocated.
    pub fn validate_new(&self, args: &NewLoan) -> Result<(), LendingError> {
        self.params.amount_bounds().check(args.amount)?;
        self.params.rate_bounds().check(args.interest_rate_pct)?;
        self.params.duration_bounds().check(args.duration_days)?;
        if args.collateral_amount > 0 && args.collateral_amount < args.amount {
            return Err(LendingError::CollateralBelowPrincipal {
                collateral: args.collateral_amount,
                amount: args.amount,
            });
        }
        Ok(())
    }

    pub fn create(
        &self,
        id: LoanId,
        borrower: Identity,
        args: NewLoan,
        now: Timestamp,
    ) -> Result<Loan, LendingError> {
        self.validate_new(&args)?;

        let loan = Loan {
            id,
            borrower,
            investor: None,
            amount: args.amount,
            purpose: args.purpose,
            interest_rate_pct: args.interest_rate_pct,
            duration_days: args.duration_days,
            status: Pending,
            created_at: now,
            funded_at: Timestamp::EPOCH,
            repayment_amount: 0,
            amount_repaid: 0,
            collateral_amount: args.collateral_amount,
            liquidation_threshold_pct: self.params.liquidation_threshold_pct,
            max_ltv_pct: self.params.max_ltv_pct,
            grace_period_days: self.params.grace_period_days,
            penalty_rate_pct: self.params.penalty_rate_pct,
            risk_score: 0,
            verification_status: VerificationStatus::Pending,
        };
        tracing::info!(
            loan = id.raw(),
            borrower = %loan.borrower,
            amount = loan.amount,
            rate = loan.interest_rate_pct,
            duration_days = loan.duration_days,
            "loan created"
        );
        Ok(loan)
    }

    /// `Pending → Cancelled`, borrower only.
    pub fn cancel(&self, loan: &mut Loan, caller: &Caller) -> Result<(), LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        loan.require_status("cancel", &[Pending])?;
        loan.transition("cancel", Cancelled)
    }

    /// Fund a pending loan: the caller pays `amount` to the borrower and
    /// becomes the investor.
    pub fn fund(
        &self,
        loan: &mut Loan,
        caller: &Caller,
        rail: &dyn PaymentRail,
        now: Timestamp,
    ) -> Result<TransferReceipt, LendingError> {
        self.authorize(&Policy::not_borrower(), caller, loan)?;
        loan.require_status("fund", &[Pending])?;
        if loan.collateral_amount > 0 {
            loan_to_value_ok(loan.collateral_amount, loan.amount, loan.max_ltv_pct)?;
        }
        let repayment_amount = compute_repayment(loan.amount, loan.interest_rate_pct)?;

        let receipt = settle(
            rail,
            TransferRequest {
                from: caller.sender.clone(),
                to: loan.borrower.clone(),
                amount: loan.amount,
                purpose: TransferPurpose::Funding,
            },
        )?;

        loan.transition("fund", Active)?;
        loan.investor = Some(caller.sender.clone());
        loan.repayment_amount = repayment_amount;
        loan.funded_at = now;
        Ok(receipt)
    }

    /// Forward `payment` from the borrower to the investor.
    ///
    /// A payment after the grace period bumps `penalty_rate_pct` by
    /// `penalty_step_pct`. Reaching `repayment_amount` completes the loan.
    /// Over-payment is accepted as is.
    pub fn repay(
        &self,
        loan: &mut Loan,
        caller: &Caller,
        payment: u64,
        rail: &dyn PaymentRail,
        now: Timestamp,
    ) -> Result<TransferReceipt, LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        loan.require_status("repay", &[Active])?;
        let investor = loan.investor()?.clone();
        let late = now > Self::grace_deadline(loan)?;
        if payment == 0 {
            return Err(LendingError::ZeroPayment);
        }

        let amount_repaid = loan
            .amount_repaid
            .checked_add(payment)
            .ok_or_else(LendingError::overflow)?;
        let penalty_rate_pct = if late {
            loan.penalty_rate_pct
                .checked_add(self.params.penalty_step_pct)
                .ok_or_else(LendingError::overflow)?
        } else {
            loan.penalty_rate_pct
        };

        let receipt = settle(
            rail,
            TransferRequest {
                from: loan.borrower.clone(),
                to: investor,
                amount: payment,
                purpose: TransferPurpose::Repayment,
            },
        )?;

        if late {
            tracing::info!(loan = loan.id.raw(), penalty_rate_pct, "late repayment, penalty escalated");
        }
        if amount_repaid > loan.repayment_amount {
            tracing::warn!(
                loan = loan.id.raw(),
                amount_repaid,
                repayment_amount = loan.repayment_amount,
                "over-repayment accepted"
            );
        }
        loan.amount_repaid = amount_repaid;
        loan.penalty_rate_pct = penalty_rate_pct;
        if amount_repaid >= loan.repayment_amount {
            loan.transition("repay", Completed)?;
        }
        Ok(receipt)
    }

    /// Manual `Active → Completed`, regardless of `amount_repaid`.
    pub fn complete(&self, loan: &mut Loan, caller: &Caller) -> Result<(), LendingError> {
        self.authorize(&Policy::EitherParty, caller, loan)?;
        loan.require_status("complete", &[Active])?;
        loan.transition("complete", Completed)
    }

    /// `Active → Defaulted` once the grace period has passed.
    pub fn default(&self, loan: &mut Loan, caller: &Caller, now: Timestamp) -> Result<(), LendingError> {
        self.authorize(&Policy::Investor, caller, loan)?;
        loan.require_status("default", &[Active])?;
        let deadline = Self::grace_deadline(loan)?;
        if now <= deadline {
            return Err(LendingError::GracePeriodNotElapsed {
                now,
                wait: format_wait(now.as_secs(), deadline.as_secs().saturating_add(1)),
            });
        }
        loan.transition("default", Defaulted)
    }

    /// Move posted collateral from escrow to the investor.
    pub fn liquidate(
        &self,
        loan: &mut Loan,
        caller: &Caller,
        rail: &dyn PaymentRail,
    ) -> Result<TransferReceipt, LendingError> {
        self.authorize(&Policy::Investor, caller, loan)?;
        loan.require_status("liquidate", &[Defaulted])?;
        let investor = loan.investor()?.clone();
        if loan.collateral_amount == 0 {
            return Err(LendingError::NoCollateral);
        }

        let receipt = settle(
            rail,
            TransferRequest {
                from: self.escrow.clone(),
                to: investor,
                amount: loan.collateral_amount,
                purpose: TransferPurpose::Liquidation,
            },
        )?;
        loan.transition("liquidate", Liquidated)?;
        Ok(receipt)
    }

    pub fn pause(&self, loan: &mut Loan, caller: &Caller) -> Result<(), LendingError> {
        self.authorize(&Policy::EitherParty, caller, loan)?;
        loan.require_status("pause", &[Active])?;
        loan.transition("pause", Paused)
    }

    pub fn resume(&self, loan: &mut Loan, caller: &Caller) -> Result<(), LendingError> {
        self.authorize(&Policy::EitherParty, caller, loan)?;
        loan.require_status("resume", &[Paused])?;
        loan.transition("resume", Active)
    }

    /// Investor exit from an active loan once `emergency_withdrawal_secs`
    /// have passed since funding. Ignores the grace period.
    pub fn emergency(&self, loan: &mut Loan, caller: &Caller, now: Timestamp) -> Result<(), LendingError> {
        self.authorize(&Policy::Investor, caller, loan)?;
        loan.require_status("emergency", &[Active])?;
        let opens_at = loan
            .funded_at
            .checked_add_secs(self.params.emergency_withdrawal_secs)
            .ok_or_else(LendingError::overflow)?;
        if now <= opens_at {
            return Err(LendingError::EmergencyWindowNotElapsed {
                now,
                wait: format_wait(now.as_secs(), opens_at.as_secs().saturating_add(1)),
            });
        }
        loan.transition("emergency", EmergencyWithdrawal)
    }

    /// Lower the rate and reset the duration; recomputes the repayment from
    /// the full principal, not net of what has been repaid.
    pub fn refinance(
        &self,
        loan: &mut Loan,
        caller: &Caller,
        new_rate_pct: u64,
        new_duration_days: u64,
    ) -> Result<(), LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        loan.require_status("refinance", &[Active])?;
        if new_rate_pct >= loan.interest_rate_pct {
            return Err(LendingError::RateNotLower {
                current: loan.interest_rate_pct,
                proposed: new_rate_pct,
            });
        }
        self.params.duration_bounds().check(new_duration_days)?;
        let repayment_amount = compute_repayment(loan.amount, new_rate_pct)?;

        tracing::info!(
            loan = loan.id.raw(),
            from_rate = loan.interest_rate_pct,
            to_rate = new_rate_pct,
            duration_days = new_duration_days,
            repayment_amount,
            "loan refinanced"
        );
        loan.interest_rate_pct = new_rate_pct;
        loan.duration_days = new_duration_days;
        loan.repayment_amount = repayment_amount;
        Ok(())
    }

    /// Carve `split` off the principal. The split-off part is not moved or
    /// tracked anywhere.
    pub fn split(&self, loan: &mut Loan, caller: &Caller, split: u64) -> Result<(), LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        loan.require_status("split", &[Active])?;
        if split == 0 || split >= loan.amount {
            return Err(LendingError::InvalidSplit {
                split,
                amount: loan.amount,
            });
        }
        let amount = loan.amount - split;
        let repayment_amount = compute_repayment(amount, loan.interest_rate_pct)?;

        tracing::warn!(loan = loan.id.raw(), split, amount, "principal split without transfer");
        loan.amount = amount;
        loan.repayment_amount = repayment_amount;
        Ok(())
    }

    /// Set the verification status from its wire name (`pending`,
    /// `verified`, `rejected`).
    pub fn verify(&self, loan: &mut Loan, caller: &Caller, status: &str) -> Result<(), LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        let status: VerificationStatus = status.parse()?;
        loan.verification_status = status;
        tracing::debug!(loan = loan.id.raw(), %status, "verification updated");
        Ok(())
    }

    pub fn risk(&self, loan: &mut Loan, caller: &Caller, score: u64) -> Result<(), LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        Bounds::percent("risk_score").check(score)?;
        loan.risk_score = score;
        tracing::debug!(loan = loan.id.raw(), score, "risk score updated");
        Ok(())
    }

    /// Verification, risk score and, when given, collateral in one call.
    pub fn batch(
        &self,
        loan: &mut Loan,
        caller: &Caller,
        status: &str,
        score: u64,
        collateral: Option<u64>,
    ) -> Result<(), LendingError> {
        self.authorize(&Policy::Borrower, caller, loan)?;
        let status: VerificationStatus = status.parse()?;
        Bounds::percent("risk_score").check(score)?;
        loan.verification_status = status;
        loan.risk_score = score;
        if let Some(collateral) = collateral {
            tracing::info!(
                loan = loan.id.raw(),
                from = loan.collateral_amount,
                to = collateral,
                "collateral updated"
            );
            loan.collateral_amount = collateral;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_ledger::TransferOutcome;
    use agora_types::{ErrorKind, SECS_PER_DAY};
    use std::sync::Mutex;

    const T0: u64 = 1_700_000_000;

    /// Confirms everything unless told to decline, and remembers what it saw.
    #[derive(Default)]
    struct TestRail {
        decline: bool,
        seen: Mutex<Vec<TransferRequest>>,
    }

    impl PaymentRail for TestRail {
        fn transfer(&self, request: &TransferRequest) -> TransferOutcome {
            let mut seen = self.seen.lock().unwrap();
            seen.push(request.clone());
            if self.decline {
                TransferOutcome::Failed {
                    reason: "insufficient funds".into(),
                }
            } else {
                TransferOutcome::Confirmed(TransferReceipt {
                    sequence: seen.len() as u64,
                    amount: request.amount,
                })
            }
        }
    }

    fn id(name: &str) -> Identity {
        Identity::new(format!("agr_{}", name))
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn machine() -> LoanMachine {
        LoanMachine::new(LendingParams::default(), AuthorizationGuard::default(), id("escrow"))
    }

    fn borrower() -> Caller {
        Caller::new(id("borrower"))
    }

    fn investor() -> Caller {
        Caller::new(id("investor"))
    }

    fn pending(collateral: u64) -> Loan {
        machine()
            .create(
                LoanId::new(1),
                id("borrower"),
                NewLoan {
                    amount: 1_000_000,
                    purpose: "inventory".into(),
                    interest_rate_pct: 10,
                    duration_days: 30,
                    collateral_amount: collateral,
                },
                at(T0),
            )
            .unwrap()
    }

    fn active(collateral: u64) -> Loan {
        let mut loan = pending(collateral);
        machine()
            .fund(&mut loan, &investor(), &TestRail::default(), at(T0 + 60))
            .unwrap();
        loan
    }

    fn past_grace() -> Timestamp {
        at(T0 + 60 + 33 * SECS_PER_DAY + 1)
    }

    #[test]
    fn test_create_defaults() {
        let loan = pending(0);
        assert_eq!(loan.status, Pending);
        assert_eq!(loan.investor, None);
        assert_eq!(loan.funded_at, Timestamp::EPOCH);
        assert_eq!((loan.repayment_amount, loan.amount_repaid), (0, 0));
        assert_eq!(loan.liquidation_threshold_pct, 80);
        assert_eq!(loan.max_ltv_pct, 70);
        assert_eq!(loan.grace_period_days, 3);
        assert_eq!(loan.penalty_rate_pct, 5);
        assert_eq!(loan.verification_status, VerificationStatus::Pending);
    }

    #[test]
    fn test_create_validates_ranges() {
        let m = machine();
        let base = NewLoan {
            amount: 1_000_000,
            purpose: "p".into(),
            interest_rate_pct: 10,
            duration_days: 30,
            collateral_amount: 0,
        };
        for bad in [
            NewLoan { amount: 999_999, ..base.clone() },
            NewLoan { interest_rate_pct: 51, ..base.clone() },
            NewLoan { duration_days: 0, ..base.clone() },
            NewLoan { duration_days: 366, ..base.clone() },
        ] {
            let err = m.create(LoanId::new(1), id("b"), bad, at(T0)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        let err = m
            .create(
                LoanId::new(1),
                id("b"),
                NewLoan { collateral_amount: 999_999, ..base },
                at(T0),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientCollateral);
    }

    #[test]
    fn test_fund_by_borrower_is_unauthorized_in_any_status() {
        let m = machine();
        let rail = TestRail::default();
        let mut loan = pending(0);
        let err = m.fund(&mut loan, &borrower(), &rail, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let mut loan = active(0);
        let err = m.fund(&mut loan, &borrower(), &rail, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(rail.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fund_moves_principal_and_activates() {
        let rail = TestRail::default();
        let mut loan = pending(0);
        machine()
            .fund(&mut loan, &investor(), &rail, at(T0 + 60))
            .unwrap();
        assert_eq!(loan.status, Active);
        assert_eq!(loan.investor, Some(id("investor")));
        assert_eq!(loan.repayment_amount, 1_100_000);
        assert_eq!(loan.funded_at, at(T0 + 60));
        let seen = rail.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].from, id("investor"));
        assert_eq!(seen[0].to, id("borrower"));
        assert_eq!(seen[0].amount, 1_000_000);
        assert_eq!(seen[0].purpose, TransferPurpose::Funding);
    }

    #[test]
    fn test_fund_declined_leaves_loan_pending() {
        let rail = TestRail {
            decline: true,
            ..TestRail::default()
        };
        let mut loan = pending(0);
        let before = loan.clone();
        let err = machine()
            .fund(&mut loan, &investor(), &rail, at(T0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(loan, before);
    }

    #[test]
    fn test_fund_checks_loan_to_value() {
        let m = machine();
        let rail = TestRail::default();
        let mut loan = pending(1_000_000);
        let err = m.fund(&mut loan, &investor(), &rail, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientCollateral);
        assert!(rail.seen.lock().unwrap().is_empty());

        let mut loan = pending(1_428_572);
        m.fund(&mut loan, &investor(), &rail, at(T0)).unwrap();
        assert_eq!(loan.status, Active);
    }

    #[test]
    fn test_partial_then_full_repayment_completes() {
        let m = machine();
        let rail = TestRail::default();
        let mut loan = active(0);
        m.repay(&mut loan, &borrower(), 600_000, &rail, at(T0 + SECS_PER_DAY))
            .unwrap();
        assert_eq!(loan.status, Active);
        assert_eq!(loan.amount_repaid, 600_000);
        assert_eq!(loan.outstanding(), 500_000);

        m.repay(&mut loan, &borrower(), 500_000, &rail, at(T0 + 2 * SECS_PER_DAY))
            .unwrap();
        assert_eq!(loan.status, Completed);
        let seen = rail.seen.lock().unwrap();
        assert!(seen
            .iter()
            .all(|r| r.purpose == TransferPurpose::Repayment && r.to == id("investor")));
    }

    #[test]
    fn test_over_repayment_is_accepted() {
        let mut loan = active(0);
        machine()
            .repay(&mut loan, &borrower(), 2_000_000, &TestRail::default(), at(T0))
            .unwrap();
        assert_eq!(loan.amount_repaid, 2_000_000);
        assert_eq!(loan.status, Completed);
    }

    #[test]
    fn test_late_repayment_escalates_penalty() {
        let m = machine();
        let rail = TestRail::default();
        let mut loan = active(0);
        m.repay(&mut loan, &borrower(), 1, &rail, past_grace()).unwrap();
        m.repay(&mut loan, &borrower(), 1, &rail, past_grace()).unwrap();
        assert_eq!(loan.penalty_rate_pct, 9);
    }

    #[test]
    fn test_repay_checks() {
        let m = machine();
        let rail = TestRail::default();
        let mut loan = active(0);
        let err = m.repay(&mut loan, &investor(), 10, &rail, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = m.repay(&mut loan, &borrower(), 0, &rail, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let mut fresh = pending(0);
        let err = m.repay(&mut fresh, &borrower(), 10, &rail, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(rail.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_declined_repayment_changes_nothing() {
        let rail = TestRail {
            decline: true,
            ..TestRail::default()
        };
        let mut loan = active(0);
        let before = loan.clone();
        let err = machine()
            .repay(&mut loan, &borrower(), 1_100_000, &rail, past_grace())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(loan, before);
    }

    #[test]
    fn test_default_requires_grace_period() {
        let m = machine();
        let mut loan = active(0);
        let deadline = at(T0 + 60 + 33 * SECS_PER_DAY);
        let err = m.default(&mut loan, &investor(), deadline).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TemporalViolation);
        let err = m.default(&mut loan, &borrower(), past_grace()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        m.default(&mut loan, &investor(), past_grace()).unwrap();
        assert_eq!(loan.status, Defaulted);
    }

    #[test]
    fn test_liquidate_only_from_defaulted() {
        let m = machine();
        let rail = TestRail::default();
        let mut loan = active(2_000_000);
        let err = m.liquidate(&mut loan, &investor(), &rail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        m.default(&mut loan, &investor(), past_grace()).unwrap();
        m.liquidate(&mut loan, &investor(), &rail).unwrap();
        assert_eq!(loan.status, Liquidated);
        let seen = rail.seen.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.from, id("escrow"));
        assert_eq!(last.to, id("investor"));
        assert_eq!(last.amount, 2_000_000);
        assert_eq!(last.purpose, TransferPurpose::Liquidation);
    }

    #[test]
    fn test_liquidate_without_collateral() {
        let m = machine();
        let mut loan = active(0);
        m.default(&mut loan, &investor(), past_grace()).unwrap();
        let err = m
            .liquidate(&mut loan, &investor(), &TestRail::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientCollateral);
        assert_eq!(loan.status, Defaulted);
    }

    #[test]
    fn test_cancel_only_pending_by_borrower() {
        let m = machine();
        let mut loan = pending(0);
        let err = m.cancel(&mut loan, &investor()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        m.cancel(&mut loan, &borrower()).unwrap();
        assert_eq!(loan.status, Cancelled);

        let mut loan = active(0);
        let err = m.cancel(&mut loan, &borrower()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_pause_resume_complete() {
        let m = machine();
        let mut loan = active(0);
        let err = m.pause(&mut loan, &Caller::new(id("stranger"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        m.pause(&mut loan, &borrower()).unwrap();
        let err = m.complete(&mut loan, &investor()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        m.resume(&mut loan, &investor()).unwrap();
        m.complete(&mut loan, &investor()).unwrap();
        assert_eq!(loan.status, Completed);
        assert_eq!(loan.amount_repaid, 0);
    }

    #[test]
    fn test_emergency_after_thirty_days() {
        let m = machine();
        let mut loan = active(0);
        let boundary = at(T0 + 60 + 2_592_000);
        let err = m.emergency(&mut loan, &investor(), boundary).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TemporalViolation);
        m.emergency(&mut loan, &investor(), at(boundary.as_secs() + 1))
            .unwrap();
        assert_eq!(loan.status, EmergencyWithdrawal);
    }

    #[test]
    fn test_refinance_requires_lower_rate() {
        let m = machine();
        let mut loan = active(0);
        for rate in [10, 11] {
            let err = m.refinance(&mut loan, &borrower(), rate, 60).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(loan.repayment_amount, 1_100_000);
        }
        let err = m.refinance(&mut loan, &borrower(), 5, 400).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        m.refinance(&mut loan, &borrower(), 5, 60).unwrap();
        assert_eq!(loan.interest_rate_pct, 5);
        assert_eq!(loan.duration_days, 60);
        assert_eq!(loan.repayment_amount, 1_050_000);
    }

    #[test]
    fn test_split_reduces_principal() {
        let m = machine();
        let mut loan = active(0);
        for bad in [0, 1_000_000, 2_000_000] {
            let err = m.split(&mut loan, &borrower(), bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        m.split(&mut loan, &borrower(), 400_000).unwrap();
        assert_eq!(loan.amount, 600_000);
        assert_eq!(loan.repayment_amount, 660_000);
    }

    #[test]
    fn test_metadata_updates() {
        let m = machine();
        let mut loan = pending(0);
        let err = m
            .verify(&mut loan, &investor(), "verified")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = m.verify(&mut loan, &borrower(), "approved").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        m.verify(&mut loan, &borrower(), "verified").unwrap();
        assert_eq!(loan.verification_status, VerificationStatus::Verified);
        let err = m.risk(&mut loan, &borrower(), 101).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        m.risk(&mut loan, &borrower(), 42).unwrap();
        assert_eq!(loan.risk_score, 42);

        m.batch(&mut loan, &borrower(), "rejected", 7, Some(5_000_000))
            .unwrap();
        assert_eq!(loan.verification_status, VerificationStatus::Rejected);
        assert_eq!(loan.risk_score, 7);
        assert_eq!(loan.collateral_amount, 5_000_000);

        m.batch(&mut loan, &borrower(), "verified", 8, None)
            .unwrap();
        assert_eq!(loan.collateral_amount, 5_000_000);
    }
}
