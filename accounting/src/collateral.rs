//! Loan-to-value coverage.

use crate::error::AccountingError;

/// Collateral must satisfy `collateral * max_ltv_pct >= amount * 100`,
/// i.e. the loan may be at most `max_ltv_pct` percent of the collateral.
pub fn loan_to_value_ok(
    collateral: u64,
    amount: u64,
    max_ltv_pct: u64,
) -> Result<(), AccountingError> {
    let covered = collateral
        .checked_mul(max_ltv_pct)
        .ok_or(AccountingError::Overflow)?;
    let required = amount.checked_mul(100).ok_or(AccountingError::Overflow)?;
    if covered < required {
        return Err(AccountingError::InsufficientCollateral {
            collateral,
            amount,
            max_ltv_pct,
        });
    }
    Ok(())
}
