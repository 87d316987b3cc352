//! What a donation buys.

use serde::Serialize;

/// A fixed "amount buys outcome" equivalence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactItem {
    /// Short title.
    pub title: &'static str,
    /// Cost of one unit of the outcome.
    pub unit_cost: u64,
    /// What one unit provides.
    pub outcome: &'static str,
}

/// How many units of an impact item an amount covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactEstimate {
    /// The item being estimated.
    pub item: ImpactItem,
    /// Whole units covered.
    pub units: u64,
}

/// The impact table shown next to the donation form.
pub const IMPACT_ITEMS: &[ImpactItem] = &[
    ImpactItem {
        title: "Meals Provided",
        unit_cost: 50,
        outcome: "10 nutritious meals for children",
    },
    ImpactItem {
        title: "Education Support",
        unit_cost: 500,
        outcome: "School supplies for 1 child for 1 month",
    },
    ImpactItem {
        title: "Clean Water",
        unit_cost: 1_000,
        outcome: "Clean water access for 5 families for 1 month",
    },
    ImpactItem {
        title: "Healthcare",
        unit_cost: 2_000,
        outcome: "Basic medical treatment for 3 patients",
    },
];

/// Units of each impact item that `amount` would cover.
#[must_use]
pub fn estimate(amount: u64) -> Vec<ImpactEstimate> {
    IMPACT_ITEMS
        .iter()
        .map(|item| ImpactEstimate {
            item: *item,
            units: amount / item.unit_cost,
        })
        .collect()
}
