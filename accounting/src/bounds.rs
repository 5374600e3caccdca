//! Inclusive argument bounds.

use crate::error::AccountingError;

/// An inclusive `[min, max]` range for a named argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub field: &'static str,
    pub min: u64,
    pub max: u64,
}

impl Bounds {
    pub const fn new(field: &'static str, min: u64, max: u64) -> Self {
        Self { field, min, max }
    }

    /// Percentages: `[0, 100]`.
    pub const fn percent(field: &'static str) -> Self {
        Self::new(field, 0, 100)
    }

    pub fn check(&self, value: u64) -> Result<(), AccountingError> {
        validate_range(value, self.min, self.max, self.field)
    }
}

/// Fail with [`AccountingError::OutOfRange`] unless `min <= value <= max`.
pub fn validate_range(
    value: u64,
    min: u64,
    max: u64,
    field: &'static str,
) -> Result<(), AccountingError> {
    if value < min || value > max {
        return Err(AccountingError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let days = Bounds::new("duration_days", 1, 365);
        assert!(days.check(1).is_ok());
        assert!(days.check(365).is_ok());
        assert!(days.check(0).is_err());
        assert!(days.check(366).is_err());
    }

    #[test]
    fn out_of_range_reports_field_and_limits() {
        let err = validate_range(101, 0, 100, "veto_threshold_pct").unwrap_err();
        assert_eq!(
            err,
            AccountingError::OutOfRange {
                field: "veto_threshold_pct",
                value: 101,
                min: 0,
                max: 100,
            }
        );
        assert_eq!(err.kind(), agora_types::ErrorKind::Validation);
    }

    #[test]
    fn percent_bounds() {
        assert!(Bounds::percent("rate").check(100).is_ok());
        assert!(Bounds::percent("rate").check(101).is_err());
    }
}
