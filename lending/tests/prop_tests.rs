use agora_auth::{AuthorizationGuard, Caller};
use agora_ledger::{PaymentRail, TransferOutcome, TransferReceipt, TransferRequest};
use agora_lending::*;
use agora_types::{ErrorKind, Identity, LoanId, Timestamp};
use proptest::prelude::*;

struct AlwaysConfirm;

impl PaymentRail for AlwaysConfirm {
    fn transfer(&self, request: &TransferRequest) -> TransferOutcome {
        TransferOutcome::Confirmed(TransferReceipt {
            sequence: 1,
            amount: request.amount,
        })
    }
}

fn machine() -> LoanMachine {
    LoanMachine::new(
        LendingParams::default(),
        AuthorizationGuard::default(),
        Identity::new("agr_escrow"),
    )
}

fn funded(amount: u64, rate: u64) -> Loan {
    let m = machine();
    let mut loan = m
        .create(
            LoanId::new(1),
            Identity::new("agr_borrower"),
            NewLoan {
                amount,
                purpose: "working capital".into(),
                interest_rate_pct: rate,
                duration_days: 30,
                collateral_amount: 0,
            },
            Timestamp::new(1_000),
        )
        .unwrap();
    m.fund(
        &mut loan,
        &Caller::new(Identity::new("agr_investor")),
        &AlwaysConfirm,
        Timestamp::new(2_000),
    )
    .unwrap();
    loan
}

proptest! {
    #[test]
    fn repayment_amount_formula(amount in 1_000_000u64..=1_000_000_000_000, rate in 0u64..=50) {
        let loan = funded(amount, rate);
        prop_assert_eq!(loan.repayment_amount, amount + amount * rate / 100);
    }

    #[test]
    fn refinance_without_improvement_fails(
        rate in 0u64..=50,
        bump in 0u64..=50,
        duration in 1u64..=365,
    ) {
        let mut loan = funded(5_000_000, rate);
        let before = loan.clone();
        let err = machine()
            .refinance(&mut loan, &Caller::new(Identity::new("agr_borrower")), rate + bump, duration)
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);
        prop_assert_eq!(loan, before);
    }

    #[test]
    fn fund_by_borrower_never_authorized(amount in 1_000_000u64..10_000_000, rate in 0u64..=50) {
        let m = machine();
        let borrower = Caller::new(Identity::new("agr_borrower"));
        let mut loan = m
            .create(
                LoanId::new(7),
                borrower.sender.clone(),
                NewLoan {
                    amount,
                    purpose: "p".into(),
                    interest_rate_pct: rate,
                    duration_days: 10,
                    collateral_amount: 0,
                },
                Timestamp::new(0),
            )
            .unwrap();
        let err = m.fund(&mut loan, &borrower, &AlwaysConfirm, Timestamp::new(1)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Unauthorized);
        prop_assert_eq!(loan.status, LoanStatus::Pending);
    }

    #[test]
    fn repaid_total_is_sum_of_payments(payments in prop::collection::vec(1u64..500_000, 1..10)) {
        let m = machine();
        let borrower = Caller::new(Identity::new("agr_borrower"));
        let mut loan = funded(1_000_000, 10);
        let mut total = 0u64;
        for p in payments {
            if loan.status != LoanStatus::Active {
                break;
            }
            m.repay(&mut loan, &borrower, p, &AlwaysConfirm, Timestamp::new(3_000)).unwrap();
            total += p;
        }
        prop_assert_eq!(loan.amount_repaid, total);
        prop_assert_eq!(loan.status == LoanStatus::Completed, total >= loan.repayment_amount);
    }
}
