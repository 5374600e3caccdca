//! Vote delegation: move voting power to a representative and back.
//!
//! A unit of power is held by exactly one of {owner, current delegatee}:
//! `delegate` subtracts from the delegator what it adds to the delegatee, and
//! `cancel_delegation` reverses exactly the recorded amount.
//!
//! A delegator holds one outstanding delegation. Delegating again overwrites
//! the record without first restoring the earlier amount; the earlier
//! delegatee keeps that power.

use crate::error::GovernanceError;
use crate::voter::Voter;

/// Move `amount` of `from`'s power to `to` and record the delegation on `from`.
pub fn delegate(from: &mut Voter, to: &mut Voter, amount: u64) -> Result<(), GovernanceError> {
    if from.owner == to.owner {
        return Err(GovernanceError::SelfDelegation);
    }
    if amount == 0 {
        return Err(GovernanceError::ZeroDelegation);
    }
    if amount > from.voting_power {
        return Err(GovernanceError::InsufficientVotingPower {
            have: from.voting_power,
            need: amount,
        });
    }
    let to_power = to
        .voting_power
        .checked_add(amount)
        .ok_or_else(GovernanceError::overflow)?;

    if let Some(previous) = &from.delegated_to {
        tracing::warn!(
            delegator = %from.owner,
            previous = %previous,
            stranded = from.delegation_amount,
            "overwriting an outstanding delegation without restoring it"
        );
    }

    from.voting_power -= amount;
    to.voting_power = to_power;
    from.delegated_to = Some(to.owner.clone());
    from.delegation_amount = amount;
    Ok(())
}

/// Return the recorded delegation from `delegatee` to `from` and clear it.
///
/// Returns the amount restored.
pub fn cancel_delegation(from: &mut Voter, delegatee: &mut Voter) -> Result<u64, GovernanceError> {
    let recorded = from.delegated_to.as_ref().ok_or(GovernanceError::NoDelegation)?;
    if *recorded != delegatee.owner {
        return Err(GovernanceError::DelegateeMismatch);
    }
    let amount = from.delegation_amount;
    let delegatee_power = delegatee
        .voting_power
        .checked_sub(amount)
        .ok_or_else(GovernanceError::overflow)?;
    let from_power = from
        .voting_power
        .checked_add(amount)
        .ok_or_else(GovernanceError::overflow)?;

    delegatee.voting_power = delegatee_power;
    from.voting_power = from_power;
    from.delegated_to = None;
    from.delegation_amount = 0;
    Ok(amount)
}
