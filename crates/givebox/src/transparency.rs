//! Transparency ledger.
//!
//! The ledger is a fixed set of fabricated "blockchain" transaction records
//! showing how individual donations were spent, plus an overview of how the
//! platform's funds are allocated across categories. Nothing here touches a
//! real chain.

use serde::Serialize;

/// Confirmation state of a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    /// Included in a block.
    Confirmed,
    /// Waiting for a block.
    Pending,
    /// Rejected.
    Failed,
}

/// One spending line within a ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundUsage {
    /// What the money bought.
    pub item: &'static str,
    /// Amount spent.
    pub amount: u64,
    /// Whether the spend has been verified.
    pub verified: bool,
}

/// A fabricated on-chain donation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    /// Transaction hash.
    pub id: &'static str,
    /// Donor reference.
    pub donor_id: &'static str,
    /// Donated amount.
    pub amount: u64,
    /// Campaign the donation went to.
    pub campaign: &'static str,
    /// RFC 3339 timestamp.
    pub timestamp: &'static str,
    /// Confirmation state.
    pub status: LedgerStatus,
    /// Block the record was included in, once confirmed.
    pub block_number: Option<u64>,
    /// How the amount was spent.
    pub usage: Vec<FundUsage>,
}

impl LedgerRecord {
    /// Sum of verified spending lines.
    #[must_use]
    pub fn verified_amount(&self) -> u64 {
        self.usage
            .iter()
            .filter(|u| u.verified)
            .map(|u| u.amount)
            .sum()
    }

    /// Part of the amount not yet accounted for by any spending line.
    #[must_use]
    pub fn unallocated_amount(&self) -> u64 {
        let spent: u64 = self.usage.iter().map(|u| u.amount).sum();
        self.amount.saturating_sub(spent)
    }

    fn matches(&self, term: &str) -> bool {
        self.id.to_lowercase().contains(term)
            || self.donor_id.to_lowercase().contains(term)
            || self.campaign.to_lowercase().contains(term)
    }
}

/// Share of raised funds allocated to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAllocation {
    /// Category name.
    pub name: &'static str,
    /// Amount allocated.
    pub amount: u64,
    /// Share of the total raised, in percent.
    pub percentage: u8,
}

/// Platform-wide fund allocation overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundAllocation {
    /// Total raised across all campaigns.
    pub total_raised: u64,
    /// Total already allocated to projects.
    pub total_allocated: u64,
    /// Per-category breakdown.
    pub categories: Vec<CategoryAllocation>,
}

impl FundAllocation {
    /// Allocated share of the total raised, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn allocated_percent(&self) -> f64 {
        if self.total_raised == 0 {
            return 0.0;
        }
        self.total_allocated as f64 / self.total_raised as f64 * 100.0
    }
}

/// The ledger records shown on the transparency page.
#[must_use]
pub fn ledger() -> Vec<LedgerRecord> {
    vec![
        LedgerRecord {
            id: "0x1a2b3c4d5e6f",
            donor_id: "DN2024001",
            amount: 5_000,
            campaign: "Education for All",
            timestamp: "2024-01-15T10:30:00Z",
            status: LedgerStatus::Confirmed,
            block_number: Some(18_945_672),
            usage: vec![
                FundUsage { item: "School books", amount: 2_000, verified: true },
                FundUsage { item: "Uniforms", amount: 1_500, verified: true },
                FundUsage { item: "Stationery", amount: 1_000, verified: true },
                FundUsage { item: "Admin (5%)", amount: 250, verified: true },
                FundUsage { item: "Remaining", amount: 250, verified: false },
            ],
        },
        LedgerRecord {
            id: "0x2b3c4d5e6f7g",
            donor_id: "DN2024002",
            amount: 10_000,
            campaign: "Clean Water Initiative",
            timestamp: "2024-01-14T15:45:00Z",
            status: LedgerStatus::Confirmed,
            block_number: Some(18_945_234),
            usage: vec![
                FundUsage { item: "Water purification system", amount: 8_000, verified: true },
                FundUsage { item: "Installation", amount: 1_500, verified: true },
                FundUsage { item: "Admin (5%)", amount: 500, verified: true },
            ],
        },
        LedgerRecord {
            id: "0x3c4d5e6f7g8h",
            donor_id: "DN2024003",
            amount: 2_500,
            campaign: "Emergency Food Relief",
            timestamp: "2024-01-13T09:20:00Z",
            status: LedgerStatus::Pending,
            block_number: None,
            usage: Vec::new(),
        },
    ]
}

/// The fund allocation overview.
#[must_use]
pub fn fund_allocation() -> FundAllocation {
    FundAllocation {
        total_raised: 2_500_000,
        total_allocated: 2_100_000,
        categories: vec![
            CategoryAllocation { name: "Education", amount: 800_000, percentage: 32 },
            CategoryAllocation { name: "Healthcare", amount: 600_000, percentage: 24 },
            CategoryAllocation { name: "Food & Nutrition", amount: 400_000, percentage: 16 },
            CategoryAllocation { name: "Water & Sanitation", amount: 300_000, percentage: 12 },
            CategoryAllocation { name: "Emergency Relief", amount: 400_000, percentage: 16 },
        ],
    }
}

/// Records whose id, donor id or campaign contains `term`, ignoring case.
///
/// An empty term matches every record.
#[must_use]
pub fn search<'a>(records: &'a [LedgerRecord], term: &str) -> Vec<&'a LedgerRecord> {
    let term = term.trim().to_lowercase();
    records.iter().filter(|r| r.matches(&term)).collect()
}
