//! Donor dashboard summary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::donation::{Donation, DonationStatus};
use crate::store::DonationStore;
use crate::tax::tax_benefit;

/// How many donations the summary lists as recent.
pub const RECENT_LIMIT: usize = 5;

/// Donations grouped under one cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseTotal {
    /// Cause name.
    pub cause: String,
    /// Number of donations to the cause.
    pub count: usize,
    /// Sum donated to the cause.
    pub amount: u64,
}

/// Aggregate view over everything in a store.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Running total donated.
    pub total_donated: u64,
    /// Families helped so far.
    pub total_impact: u64,
    /// Number of recorded donations.
    pub donation_count: usize,
    /// Number of completed donations.
    pub completed_count: usize,
    /// Tax deduction on the total donated.
    pub tax_saved: u64,
    /// Total donated minus the tax saved.
    pub effective_cost: u64,
    /// Per-cause totals, largest amount first.
    pub by_cause: Vec<CauseTotal>,
    /// Most recent donations, newest first.
    pub recent: Vec<Donation>,
}

impl DashboardSummary {
    /// Summarize a store.
    #[must_use]
    pub fn from_store(store: &DonationStore, deduction_percent: u32) -> Self {
        let donations = store.donations();
        let total_donated = store.total_donated();
        let tax_saved = tax_benefit(total_donated, deduction_percent);

        Self {
            total_donated,
            total_impact: store.total_impact(),
            donation_count: donations.len(),
            completed_count: donations
                .iter()
                .filter(|d| d.status == DonationStatus::Completed)
                .count(),
            tax_saved,
            effective_cost: total_donated.saturating_sub(tax_saved),
            by_cause: cause_totals(donations),
            recent: recent(donations, RECENT_LIMIT),
        }
    }
}

fn cause_totals(donations: &[Donation]) -> Vec<CauseTotal> {
    let mut grouped: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
    for donation in donations {
        let entry = grouped.entry(donation.cause.as_str()).or_default();
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(donation.amount);
    }

    let mut totals: Vec<CauseTotal> = grouped
        .into_iter()
        .map(|(cause, (count, amount))| CauseTotal {
            cause: cause.to_string(),
            count,
            amount,
        })
        .collect();
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

fn recent(donations: &[Donation], limit: usize) -> Vec<Donation> {
    let mut sorted: Vec<&Donation> = donations.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donation::{DonationForm, PaymentMethod};
    use chrono::Duration;

    fn donation(amount: u64, cause: &str, minutes_ago: i64) -> Donation {
        let form = DonationForm {
            amount,
            donor_name: "Meera".to_string(),
            donor_email: "meera@example.org".to_string(),
            message: None,
            is_anonymous: false,
            payment_method: PaymentMethod::Card,
        };
        let mut donation = Donation::from_form(form, cause, amount / 2);
        donation.timestamp -= Duration::minutes(minutes_ago);
        donation
    }

    #[test]
    fn test_empty_store() {
        let summary = DashboardSummary::from_store(&DonationStore::new(), 50);
        assert_eq!(summary.total_donated, 0);
        assert_eq!(summary.donation_count, 0);
        assert_eq!(summary.tax_saved, 0);
        assert!(summary.by_cause.is_empty());
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_totals_and_tax() {
        let mut store = DonationStore::new();
        store.add_donation(donation(1_001, "Education", 3)).unwrap();
        let mut completed = donation(2_000, "Water", 1);
        completed.status = DonationStatus::Completed;
        store.add_donation(completed).unwrap();

        let summary = DashboardSummary::from_store(&store, 50);
        assert_eq!(summary.total_donated, 3_001);
        assert_eq!(summary.donation_count, 2);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.tax_saved, 1_500);
        assert_eq!(summary.effective_cost, 1_501);
    }

    #[test]
    fn test_cause_breakdown_sorted_by_amount() {
        let mut store = DonationStore::new();
        store.add_donation(donation(500, "Education", 3)).unwrap();
        store.add_donation(donation(4_000, "Water", 2)).unwrap();
        store.add_donation(donation(700, "Education", 1)).unwrap();

        let summary = DashboardSummary::from_store(&store, 50);
        assert_eq!(summary.by_cause[0].cause, "Water");
        assert_eq!(
            summary.by_cause[1],
            CauseTotal {
                cause: "Education".to_string(),
                count: 2,
                amount: 1_200,
            }
        );
    }

    #[test]
    fn test_recent_newest_first_and_limited() {
        let mut store = DonationStore::new();
        for minutes in 0..8 {
            store.add_donation(donation(100, "General", minutes)).unwrap();
        }

        let summary = DashboardSummary::from_store(&store, 50);
        assert_eq!(summary.recent.len(), RECENT_LIMIT);
        assert!(summary
            .recent
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
    }
}
