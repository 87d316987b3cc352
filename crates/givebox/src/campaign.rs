//! Campaign types and campaign browsing.
//!
//! A campaign is a fundraising cause with a monetary target. Browsing applies a
//! [`CampaignQuery`] (text search, category, location, sort order) over the
//! campaigns held by the store.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category filter value that matches every campaign.
pub const ALL_CATEGORIES: &str = "All";

/// Categories offered when browsing campaigns.
pub const CATEGORIES: &[&str] = &[
    ALL_CATEGORIES,
    "Education",
    "Food & Nutrition",
    "Healthcare",
    "Water & Sanitation",
    "Emergency Relief",
    "Women Empowerment",
    "Child Welfare",
];

/// Location filter value that matches every campaign.
pub const ALL_LOCATIONS: &str = "All Locations";

/// Locations offered when browsing campaigns.
pub const LOCATIONS: &[&str] = &[
    ALL_LOCATIONS,
    "Rural Areas",
    "Urban Slums",
    "Disaster Areas",
    "Tribal Areas",
];

/// Amount that supports one family, used for the "help N families" figure.
pub const FAMILY_SUPPORT_AMOUNT: u64 = 500;

/// A fundraising campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Category name, one of [`CATEGORIES`] by convention.
    pub category: String,
    /// Fundraising goal.
    pub target_amount: u64,
    /// Amount raised so far. May exceed the target.
    pub raised_amount: u64,
    /// Number of donations received.
    pub donor_count: u64,
    /// Image reference.
    pub image_url: String,
    /// Whether the campaign is flagged as urgent.
    pub is_urgent: bool,
    /// Optional closing date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Where the funds are used.
    pub location: String,
}

impl Campaign {
    /// Percentage of the target raised, capped at 100.
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress_percentage(self.raised_amount, self.target_amount)
    }

    /// Number of families the target amount would support.
    #[must_use]
    pub fn families_helped(&self) -> u64 {
        families_helped(self.target_amount)
    }

    /// Whether the raised amount has reached the target.
    #[must_use]
    pub fn is_funded(&self) -> bool {
        self.raised_amount >= self.target_amount
    }

    /// Amount still needed to reach the target.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.target_amount.saturating_sub(self.raised_amount)
    }

    /// Apply a partial update. Fields left as `None` are untouched.
    pub fn apply(&mut self, update: CampaignUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(target_amount) = update.target_amount {
            self.target_amount = target_amount;
        }
        if let Some(raised_amount) = update.raised_amount {
            self.raised_amount = raised_amount;
        }
        if let Some(donor_count) = update.donor_count {
            self.donor_count = donor_count;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = image_url;
        }
        if let Some(is_urgent) = update.is_urgent {
            self.is_urgent = is_urgent;
        }
        if let Some(end_date) = update.end_date {
            self.end_date = end_date;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
    }
}

/// A partial campaign update.
///
/// The campaign id is not part of the update and never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New target amount.
    pub target_amount: Option<u64>,
    /// New raised amount.
    pub raised_amount: Option<u64>,
    /// New donor count.
    pub donor_count: Option<u64>,
    /// New image reference.
    pub image_url: Option<String>,
    /// New urgency flag.
    pub is_urgent: Option<bool>,
    /// New end date; `Some(None)` clears it.
    pub end_date: Option<Option<NaiveDate>>,
    /// New location.
    pub location: Option<String>,
}

impl CampaignUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Percentage of `target` covered by `raised`, capped at 100.
///
/// A zero target yields 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percentage(raised: u64, target: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (raised as f64 / target as f64 * 100.0).min(100.0)
}

/// Number of families a given amount supports.
#[must_use]
pub fn families_helped(amount: u64) -> u64 {
    amount / FAMILY_SUPPORT_AMOUNT
}

/// Sort order for campaign browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignSort {
    /// Insertion order.
    #[default]
    Newest,
    /// Urgent campaigns first, otherwise insertion order.
    Urgent,
    /// Highest target first.
    Amount,
    /// Highest progress first.
    Progress,
}

impl fmt::Display for CampaignSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Urgent => write!(f, "urgent"),
            Self::Amount => write!(f, "amount"),
            Self::Progress => write!(f, "progress"),
        }
    }
}

impl FromStr for CampaignSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "urgent" => Ok(Self::Urgent),
            "amount" => Ok(Self::Amount),
            "progress" => Ok(Self::Progress),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filter and sort criteria for browsing campaigns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignQuery {
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
    /// Exact category; `None` or [`ALL_CATEGORIES`] matches everything.
    pub category: Option<String>,
    /// Case-insensitive substring matched against the location; `None` or
    /// [`ALL_LOCATIONS`] matches everything.
    pub location: Option<String>,
    /// Result ordering.
    pub sort: CampaignSort,
}

impl CampaignQuery {
    /// Check whether a campaign passes the filters.
    #[must_use]
    pub fn matches(&self, campaign: &Campaign) -> bool {
        let matches_search = self.search.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            campaign.title.to_lowercase().contains(&term)
                || campaign.description.to_lowercase().contains(&term)
        });

        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |c| c == ALL_CATEGORIES || c == campaign.category);

        let matches_location = self.location.as_deref().map_or(true, |loc| {
            loc.eq_ignore_ascii_case(ALL_LOCATIONS)
                || campaign
                    .location
                    .to_lowercase()
                    .contains(&loc.to_lowercase())
        });

        matches_search && matches_category && matches_location
    }

    /// Filter and sort the given campaigns.
    #[must_use]
    pub fn apply<'a>(&self, campaigns: &'a [Campaign]) -> Vec<&'a Campaign> {
        let mut selected: Vec<&Campaign> = campaigns.iter().filter(|c| self.matches(c)).collect();

        // sort_by is stable, so ties keep insertion order
        match self.sort {
            CampaignSort::Newest => {}
            CampaignSort::Urgent => selected.sort_by_key(|c| !c.is_urgent),
            CampaignSort::Amount => {
                selected.sort_by(|a, b| b.target_amount.cmp(&a.target_amount));
            }
            CampaignSort::Progress => selected.sort_by(|a, b| {
                b.progress()
                    .partial_cmp(&a.progress())
                    .unwrap_or(Ordering::Equal)
            }),
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: &str, target: u64, raised: u64, urgent: bool) -> Campaign {
        Campaign {
            id: id.to_string(),
            title: format!("Campaign {id}"),
            description: "Helping people".to_string(),
            category: "Education".to_string(),
            target_amount: target,
            raised_amount: raised,
            donor_count: 0,
            image_url: String::new(),
            is_urgent: urgent,
            end_date: None,
            location: "Rural Rajasthan".to_string(),
        }
    }

    fn ids(campaigns: &[&Campaign]) -> Vec<String> {
        campaigns.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_progress_percentage() {
        assert!((progress_percentage(350_000, 500_000) - 70.0).abs() < f64::EPSILON);
        assert!((progress_percentage(0, 0)).abs() < f64::EPSILON);
        assert!((progress_percentage(900, 300) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_families_helped() {
        assert_eq!(families_helped(500_000), 1_000);
        assert_eq!(families_helped(499), 0);
    }

    #[test]
    fn test_raised_may_exceed_target() {
        let c = campaign("1", 100, 250, false);
        assert!(c.is_funded());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_apply_partial_update_keeps_other_fields() {
        let mut c = campaign("1", 1_000, 100, false);
        c.apply(CampaignUpdate {
            raised_amount: Some(600),
            is_urgent: Some(true),
            ..CampaignUpdate::default()
        });

        assert_eq!(c.raised_amount, 600);
        assert!(c.is_urgent);
        assert_eq!(c.title, "Campaign 1");
        assert_eq!(c.target_amount, 1_000);
    }

    #[test]
    fn test_apply_clears_end_date() {
        let mut c = campaign("1", 1_000, 0, false);
        c.end_date = NaiveDate::from_ymd_opt(2030, 1, 1);
        c.apply(CampaignUpdate {
            end_date: Some(None),
            ..CampaignUpdate::default()
        });
        assert!(c.end_date.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(CampaignUpdate::default().is_empty());
        let update = CampaignUpdate {
            title: Some("x".to_string()),
            ..CampaignUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_query_search_is_case_insensitive() {
        let campaigns = vec![campaign("1", 10, 0, false), campaign("2", 10, 0, false)];
        let query = CampaignQuery {
            search: Some("CAMPAIGN 2".to_string()),
            ..CampaignQuery::default()
        };
        assert_eq!(ids(&query.apply(&campaigns)), vec!["2"]);
    }

    #[test]
    fn test_query_category_all_matches_everything() {
        let mut water = campaign("2", 10, 0, false);
        water.category = "Water & Sanitation".to_string();
        let campaigns = vec![campaign("1", 10, 0, false), water];

        let all = CampaignQuery {
            category: Some(ALL_CATEGORIES.to_string()),
            ..CampaignQuery::default()
        };
        assert_eq!(all.apply(&campaigns).len(), 2);

        let only_water = CampaignQuery {
            category: Some("Water & Sanitation".to_string()),
            ..CampaignQuery::default()
        };
        assert_eq!(ids(&only_water.apply(&campaigns)), vec!["2"]);
    }

    #[test]
    fn test_query_location_substring() {
        let mut kerala = campaign("2", 10, 0, false);
        kerala.location = "Flood-affected Kerala".to_string();
        let campaigns = vec![campaign("1", 10, 0, false), kerala];

        let query = CampaignQuery {
            location: Some("kerala".to_string()),
            ..CampaignQuery::default()
        };
        assert_eq!(ids(&query.apply(&campaigns)), vec!["2"]);
    }

    #[test]
    fn test_query_all_locations_matches_everything() {
        let mut kerala = campaign("2", 10, 0, false);
        kerala.location = "Flood-affected Kerala".to_string();
        let campaigns = vec![campaign("1", 10, 0, false), kerala];

        for sentinel in [ALL_LOCATIONS, "all locations"] {
            let query = CampaignQuery {
                location: Some(sentinel.to_string()),
                ..CampaignQuery::default()
            };
            assert_eq!(ids(&query.apply(&campaigns)), vec!["1", "2"]);
        }
        assert!(LOCATIONS.contains(&ALL_LOCATIONS));
    }

    #[test]
    fn test_sort_orders() {
        let campaigns = vec![
            campaign("1", 500, 100, false),
            campaign("2", 200, 180, true),
            campaign("3", 750, 420, false),
        ];

        let by = |sort| {
            ids(&CampaignQuery {
                sort,
                ..CampaignQuery::default()
            }
            .apply(&campaigns))
        };

        assert_eq!(by(CampaignSort::Newest), vec!["1", "2", "3"]);
        assert_eq!(by(CampaignSort::Urgent), vec!["2", "1", "3"]);
        assert_eq!(by(CampaignSort::Amount), vec!["3", "1", "2"]);
        assert_eq!(by(CampaignSort::Progress), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_sort_from_str() {
        assert_eq!("urgent".parse::<CampaignSort>(), Ok(CampaignSort::Urgent));
        assert!("sideways".parse::<CampaignSort>().is_err());
        assert_eq!(CampaignSort::Progress.to_string(), "progress");
    }
}
