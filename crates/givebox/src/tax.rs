//! Section 80G tax benefit estimates.

use serde::Serialize;

/// Tax benefit for a donation: the deductible share, rounded down.
#[must_use]
pub fn tax_benefit(amount: u64, deduction_percent: u32) -> u64 {
    amount.saturating_mul(u64::from(deduction_percent)) / 100
}

/// A tax estimate for a single donation amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxEstimate {
    /// Donation amount.
    pub amount: u64,
    /// Estimated benefit.
    pub benefit: u64,
    /// What the donation costs after the benefit.
    pub effective_cost: u64,
    /// Benefit as a share of the amount, in percent.
    pub saving_percent: f64,
}

impl TaxEstimate {
    /// Estimate the benefit for `amount`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(amount: u64, deduction_percent: u32) -> Self {
        let benefit = tax_benefit(amount, deduction_percent);
        let saving_percent = if amount == 0 {
            0.0
        } else {
            benefit as f64 / amount as f64 * 100.0
        };
        Self {
            amount,
            benefit,
            effective_cost: amount.saturating_sub(benefit),
            saving_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_benefit_half() {
        assert_eq!(tax_benefit(1_000, 50), 500);
        assert_eq!(tax_benefit(25_000, 50), 12_500);
    }

    #[test]
    fn test_tax_benefit_rounds_down() {
        assert_eq!(tax_benefit(51, 50), 25);
    }

    #[test]
    fn test_estimate() {
        let estimate = TaxEstimate::new(1_000, 50);
        assert_eq!(estimate.benefit, 500);
        assert_eq!(estimate.effective_cost, 500);
        assert!((estimate.saving_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_estimate_zero_amount() {
        let estimate = TaxEstimate::new(0, 50);
        assert_eq!(estimate.benefit, 0);
        assert!(estimate.saving_percent.abs() < f64::EPSILON);
    }
}
