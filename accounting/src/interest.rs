//! Simple interest and percentage arithmetic (truncating division).

use crate::error::AccountingError;

/// `floor(amount * pct / 100)`.
pub fn percent_of(amount: u64, pct: u64) -> Result<u64, AccountingError> {
    amount
        .checked_mul(pct)
        .map(|scaled| scaled / 100)
        .ok_or(AccountingError::Overflow)
}

/// Total owed on a loan: `amount + floor(amount * rate_pct / 100)`.
pub fn compute_repayment(amount: u64, rate_pct: u64) -> Result<u64, AccountingError> {
    let interest = percent_of(amount, rate_pct)?;
    amount
        .checked_add(interest)
        .ok_or(AccountingError::Overflow)
}

/// `floor(part * 100 / whole)`, or `None` when `whole` is zero.
pub fn share_pct(part: u64, whole: u64) -> Result<Option<u64>, AccountingError> {
    if whole == 0 {
        return Ok(None);
    }
    let scaled = part.checked_mul(100).ok_or(AccountingError::Overflow)?;
    Ok(Some(scaled / whole))
}

/// `part * 100 >= whole * threshold_pct`, compared without division.
pub fn meets_threshold(part: u64, whole: u64, threshold_pct: u64) -> Result<bool, AccountingError> {
    let lhs = part.checked_mul(100).ok_or(AccountingError::Overflow)?;
    let rhs = whole
        .checked_mul(threshold_pct)
        .ok_or(AccountingError::Overflow)?;
    Ok(lhs >= rhs)
}
