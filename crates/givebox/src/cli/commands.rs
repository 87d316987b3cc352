//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::campaign::{CampaignQuery, CampaignSort, CampaignUpdate};
use crate::donation::{DonationStatus, PaymentMethod};
use crate::volunteer::{SignupForm, VolunteerQuery};

/// Campaign commands.
#[derive(Debug, Subcommand)]
pub enum CampaignCommand {
    /// List campaigns, optionally filtered and sorted
    List(CampaignListCommand),

    /// Show a single campaign
    Show {
        /// Campaign id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a new campaign
    Add(CampaignAddCommand),

    /// Update fields of an existing campaign
    Update(CampaignUpdateCommand),
}

/// Campaign listing arguments.
#[derive(Debug, Args)]
pub struct CampaignListCommand {
    /// Search title and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only show campaigns whose location contains this text ("All Locations" shows all)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Sort order
    #[arg(long, value_enum, default_value = "newest")]
    pub sort: SortArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl CampaignListCommand {
    /// Build the campaign query these arguments describe.
    #[must_use]
    pub fn query(&self) -> CampaignQuery {
        CampaignQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            sort: self.sort.into(),
        }
    }
}

/// Arguments for adding a campaign.
#[derive(Debug, Args)]
pub struct CampaignAddCommand {
    /// Campaign id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Short title
    #[arg(short, long)]
    pub title: String,

    /// Longer description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Category
    #[arg(long, default_value = "Education")]
    pub category: String,

    /// Fundraising goal
    #[arg(long)]
    pub target: u64,

    /// Amount already raised
    #[arg(long, default_value = "0")]
    pub raised: u64,

    /// Image reference
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Flag the campaign as urgent
    #[arg(long)]
    pub urgent: bool,

    /// Closing date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Where the funds are used
    #[arg(short, long, default_value = "")]
    pub location: String,
}

/// Arguments for a partial campaign update.
#[derive(Debug, Args)]
pub struct CampaignUpdateCommand {
    /// Campaign id
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// New target amount
    #[arg(long)]
    pub target: Option<u64>,

    /// New raised amount
    #[arg(long)]
    pub raised: Option<u64>,

    /// New donor count
    #[arg(long)]
    pub donors: Option<u64>,

    /// New image reference
    #[arg(long)]
    pub image_url: Option<String>,

    /// Set or clear the urgent flag
    #[arg(long)]
    pub urgent: Option<bool>,

    /// New closing date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_end_date")]
    pub end_date: Option<NaiveDate>,

    /// Remove the closing date
    #[arg(long)]
    pub clear_end_date: bool,

    /// New location
    #[arg(short, long)]
    pub location: Option<String>,
}

impl CampaignUpdateCommand {
    /// The partial update these arguments describe.
    #[must_use]
    pub fn update(&self) -> CampaignUpdate {
        let end_date = if self.clear_end_date {
            Some(None)
        } else {
            self.end_date.map(Some)
        };

        CampaignUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            target_amount: self.target,
            raised_amount: self.raised,
            donor_count: self.donors,
            image_url: self.image_url.clone(),
            is_urgent: self.urgent,
            end_date,
            location: self.location.clone(),
        }
    }
}

/// Donate command arguments.
#[derive(Debug, Args)]
pub struct DonateCommand {
    /// Amount to donate
    #[arg(short, long, default_value_t = crate::donation::DEFAULT_AMOUNT)]
    pub amount: u64,

    /// Donor name
    #[arg(short, long)]
    pub name: String,

    /// Donor email
    #[arg(short, long)]
    pub email: String,

    /// Campaign to donate to (general donation when omitted)
    #[arg(long)]
    pub campaign: Option<String>,

    /// Message for the campaign
    #[arg(short, long)]
    pub message: Option<String>,

    /// Hide the donor name
    #[arg(long)]
    pub anonymous: bool,

    /// Payment method
    #[arg(long, value_enum, default_value = "upi")]
    pub method: PaymentMethodArg,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Donation history commands.
#[derive(Debug, Subcommand)]
pub enum DonationCommand {
    /// List recorded donations
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Change the status of a donation
    Status {
        /// Donation id
        id: String,

        /// New status
        #[arg(value_enum)]
        status: DonationStatusArg,
    },
}

/// Transparency ledger arguments.
#[derive(Debug, Args)]
pub struct TransparencyCommand {
    /// Filter by transaction id, donor id or campaign
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Volunteer board commands.
#[derive(Debug, Subcommand)]
pub enum VolunteerCommand {
    /// List volunteer opportunities
    List(VolunteerListCommand),

    /// Sign up for an opportunity
    Signup(VolunteerSignupCommand),
}

/// Volunteer listing arguments.
#[derive(Debug, Args)]
pub struct VolunteerListCommand {
    /// Search title, description and skills
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only show opportunities whose location contains this text
    #[arg(short, long)]
    pub location: Option<String>,

    /// Only show opportunities asking for this skill
    #[arg(long)]
    pub skill: Option<String>,

    /// Only show urgent opportunities
    #[arg(long)]
    pub urgent: bool,

    /// Hide opportunities with no places left
    #[arg(long)]
    pub open: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl VolunteerListCommand {
    /// Build the board query these arguments describe.
    #[must_use]
    pub fn query(&self) -> VolunteerQuery {
        VolunteerQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            skill: self.skill.clone(),
            urgent_only: self.urgent,
            open_only: self.open,
        }
    }
}

/// Volunteer signup arguments.
#[derive(Debug, Args)]
pub struct VolunteerSignupCommand {
    /// Opportunity id
    pub id: u32,

    /// Volunteer name
    #[arg(short, long)]
    pub name: String,

    /// Volunteer email
    #[arg(short, long)]
    pub email: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl VolunteerSignupCommand {
    /// The signup form these arguments describe.
    #[must_use]
    pub fn form(&self) -> SignupForm {
        SignupForm {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sort order argument for campaign listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Insertion order
    Newest,
    /// Urgent campaigns first
    Urgent,
    /// Highest target first
    Amount,
    /// Most funded first
    Progress,
}

impl From<SortArg> for CampaignSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::Urgent => Self::Urgent,
            SortArg::Amount => Self::Amount,
            SortArg::Progress => Self::Progress,
        }
    }
}

/// Payment method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaymentMethodArg {
    /// UPI transfer
    Upi,
    /// Credit or debit card
    Card,
    /// Net banking
    Netbanking,
}

impl From<PaymentMethodArg> for PaymentMethod {
    fn from(arg: PaymentMethodArg) -> Self {
        match arg {
            PaymentMethodArg::Upi => Self::Upi,
            PaymentMethodArg::Card => Self::Card,
            PaymentMethodArg::Netbanking => Self::Netbanking,
        }
    }
}

/// Donation status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DonationStatusArg {
    /// Payment not yet confirmed
    Pending,
    /// Payment confirmed
    Completed,
    /// Payment failed
    Failed,
}

impl From<DonationStatusArg> for DonationStatus {
    fn from(arg: DonationStatusArg) -> Self {
        match arg {
            DonationStatusArg::Pending => Self::Pending,
            DonationStatusArg::Completed => Self::Completed,
            DonationStatusArg::Failed => Self::Failed,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_arg_conversion() {
        assert_eq!(CampaignSort::from(SortArg::Newest), CampaignSort::Newest);
        assert_eq!(CampaignSort::from(SortArg::Urgent), CampaignSort::Urgent);
        assert_eq!(CampaignSort::from(SortArg::Amount), CampaignSort::Amount);
        assert_eq!(CampaignSort::from(SortArg::Progress), CampaignSort::Progress);
    }

    #[test]
    fn test_payment_method_arg_conversion() {
        assert_eq!(PaymentMethod::from(PaymentMethodArg::Upi), PaymentMethod::Upi);
        assert_eq!(PaymentMethod::from(PaymentMethodArg::Card), PaymentMethod::Card);
        assert_eq!(
            PaymentMethod::from(PaymentMethodArg::Netbanking),
            PaymentMethod::Netbanking
        );
    }

    #[test]
    fn test_status_arg_conversion() {
        assert_eq!(
            DonationStatus::from(DonationStatusArg::Completed),
            DonationStatus::Completed
        );
        assert_eq!(
            DonationStatus::from(DonationStatusArg::Failed),
            DonationStatus::Failed
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_list_query() {
        let cmd = CampaignListCommand {
            search: Some("water".to_string()),
            category: None,
            location: Some("Bihar".to_string()),
            sort: SortArg::Progress,
            format: OutputFormat::Table,
        };
        let query = cmd.query();
        assert_eq!(query.search.as_deref(), Some("water"));
        assert_eq!(query.location.as_deref(), Some("Bihar"));
        assert_eq!(query.sort, CampaignSort::Progress);
    }

    #[test]
    fn test_volunteer_list_query() {
        let cmd = VolunteerListCommand {
            search: None,
            category: Some("Education".to_string()),
            location: None,
            skill: Some("Teaching".to_string()),
            urgent: false,
            open: true,
            format: OutputFormat::Json,
        };
        let query = cmd.query();
        assert_eq!(query.category.as_deref(), Some("Education"));
        assert_eq!(query.skill.as_deref(), Some("Teaching"));
        assert!(query.open_only);
        assert!(!query.urgent_only);
    }

    fn empty_update(id: &str) -> CampaignUpdateCommand {
        CampaignUpdateCommand {
            id: id.to_string(),
            title: None,
            description: None,
            category: None,
            target: None,
            raised: None,
            donors: None,
            image_url: None,
            urgent: None,
            end_date: None,
            clear_end_date: false,
            location: None,
        }
    }

    #[test]
    fn test_update_without_fields_is_empty() {
        assert!(empty_update("1").update().is_empty());
    }

    #[test]
    fn test_update_end_date() {
        let mut cmd = empty_update("1");
        cmd.clear_end_date = true;
        assert_eq!(cmd.update().end_date, Some(None));

        let date = NaiveDate::from_ymd_opt(2025, 3, 31);
        let mut cmd = empty_update("1");
        cmd.end_date = date;
        assert_eq!(cmd.update().end_date, Some(date));
    }

    #[test]
    fn test_update_fields_map() {
        let mut cmd = empty_update("2");
        cmd.raised = Some(10);
        cmd.urgent = Some(false);
        let update = cmd.update();
        assert_eq!(update.raised_amount, Some(10));
        assert_eq!(update.is_urgent, Some(false));
        assert!(update.title.is_none());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
