use agora_auth::{AuthorizationGuard, Caller};
use agora_governance::*;
use agora_types::{Identity, ProposalId, Timestamp, SECS_PER_DAY};
use proptest::prelude::*;

const T0: u64 = 1_700_000_000;

fn machine() -> ProposalMachine {
    ProposalMachine::new(GovernanceParams::default(), AuthorizationGuard::default())
}

fn open_proposal(min_days: u64) -> Proposal {
    let m = machine();
    let creator = Identity::new("agr_creator");
    let mut p = m
        .create(
            ProposalId::new(1),
            creator.clone(),
            NewProposal {
                min_voting_period_days: min_days,
                title: "t".into(),
                description: "d".into(),
                proposal_type: "general".into(),
                quorum_threshold: 1,
                execution_delay_days: 0,
            },
            Timestamp::new(T0),
        )
        .unwrap();
    m.extend(&mut p, &Caller::new(creator), 90).unwrap();
    p
}

fn choice() -> impl Strategy<Value = VoteChoice> {
    prop_oneof![
        Just(VoteChoice::For),
        Just(VoteChoice::Against),
        Just(VoteChoice::Abstain),
    ]
}

proptest! {
    #[test]
    fn tallies_never_decrease(
        min_days in 1u64..=30,
        votes in prop::collection::vec((choice(), 0u64..1_000_000), 1..20),
    ) {
        let m = machine();
        let mut p = open_proposal(min_days);
        let mut voter = Voter::new(Identity::new("agr_voter"));
        let now = Timestamp::new(T0 + min_days * SECS_PER_DAY);
        let mut expected_for = 0u64;
        let mut expected_against = 0u64;
        for (c, w) in votes {
            let before = (p.votes_for, p.votes_against);
            m.vote(&mut p, &mut voter, c, w, now).unwrap();
            prop_assert!(p.votes_for >= before.0);
            prop_assert!(p.votes_against >= before.1);
            match c {
                VoteChoice::For => expected_for += w,
                VoteChoice::Against => expected_against += w,
                VoteChoice::Abstain => {}
            }
        }
        prop_assert_eq!(p.votes_for, expected_for);
        prop_assert_eq!(p.votes_against, expected_against);
    }

    #[test]
    fn delegate_then_cancel_restores_power(
        a_power in 1u64..1_000_000_000,
        b_power in 0u64..1_000_000_000,
        fraction in 1u64..=100,
    ) {
        let amount = (a_power * fraction / 100).max(1);
        let mut a = Voter::new(Identity::new("agr_alice"));
        let mut b = Voter::new(Identity::new("agr_bob"));
        a.voting_power = a_power;
        b.voting_power = b_power;

        delegate(&mut a, &mut b, amount).unwrap();
        prop_assert_eq!(a.voting_power + b.voting_power, a_power + b_power);
        prop_assert_eq!(a.delegation_amount, amount);

        let returned = cancel_delegation(&mut a, &mut b).unwrap();
        prop_assert_eq!(returned, amount);
        prop_assert_eq!(a.voting_power, a_power);
        prop_assert_eq!(b.voting_power, b_power);
        prop_assert!(!a.has_delegation());
    }

    #[test]
    fn execute_outcome_matches_thresholds(
        votes_for in 0u64..10_000,
        votes_against in 0u64..10_000,
        quorum in 1u64..20_000,
    ) {
        let m = machine();
        let mut p = open_proposal(1);
        p.votes_for = votes_for;
        p.votes_against = votes_against;
        p.quorum_threshold = quorum;
        let end = p.end_time;
        let outcome = m.execute(&mut p, end).unwrap();
        let counted = votes_for + votes_against;
        let expected = if counted < quorum {
            ProposalStatus::Expired
        } else if votes_for * 100 / counted >= 51 {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Rejected
        };
        prop_assert_eq!(outcome, expected);
        prop_assert!(p.executed);
    }
}
