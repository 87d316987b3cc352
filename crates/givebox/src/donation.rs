//! Donation records and donation form intake.
//!
//! A [`DonationForm`] is what a donor submits. It is validated against the
//! configured amount bounds before a [`Donation`] record is built from it.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::DonationConfig;
use crate::error::{Error, Result};

/// One-tap amounts offered on the donation form.
pub const PRESET_AMOUNTS: &[u64] = &[500, 1_000, 2_500, 5_000, 10_000];

/// Amount pre-selected on the donation form.
pub const DEFAULT_AMOUNT: u64 = 1_000;

/// Shortest accepted donor name, in characters.
pub(crate) const MIN_NAME_LEN: usize = 2;

/// Disambiguates ids generated within the same millisecond.
static ID_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Lifecycle status of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    /// Payment not yet confirmed.
    #[default]
    Pending,
    /// Payment confirmed.
    Completed,
    /// Payment failed.
    Failed,
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown donation status: {other}")),
        }
    }
}

/// How the donor paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Unified Payments Interface (`PhonePe`, Google Pay, ...).
    #[default]
    Upi,
    /// Credit or debit card.
    Card,
    /// Net banking.
    Netbanking,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upi => write!(f, "upi"),
            Self::Card => write!(f, "card"),
            Self::Netbanking => write!(f, "netbanking"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "netbanking" => Ok(Self::Netbanking),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// A single recorded donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Unique identifier, see [`generate_donation_id`].
    pub id: String,
    /// Donated amount.
    pub amount: u64,
    /// Campaign title or the default cause.
    pub cause: String,
    /// Donor's name.
    pub donor_name: String,
    /// Donor's email.
    pub donor_email: String,
    /// Optional message of support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Hide the donor's name publicly.
    pub is_anonymous: bool,
    /// When the donation was made.
    pub timestamp: DateTime<Utc>,
    /// Payment status.
    pub status: DonationStatus,
    /// Payment method used.
    pub payment_method: PaymentMethod,
    /// Transaction id issued by the payment processor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Estimated tax benefit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_benefit: Option<u64>,
}

impl Donation {
    /// Build a pending donation from a validated form.
    #[must_use]
    pub fn from_form(form: DonationForm, cause: impl Into<String>, tax_benefit: u64) -> Self {
        Self {
            id: generate_donation_id(),
            amount: form.amount,
            cause: cause.into(),
            donor_name: form.donor_name,
            donor_email: form.donor_email,
            message: form.message,
            is_anonymous: form.is_anonymous,
            timestamp: Utc::now(),
            status: DonationStatus::Pending,
            payment_method: form.payment_method,
            transaction_id: None,
            tax_benefit: Some(tax_benefit),
        }
    }

    /// Name to show publicly.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.is_anonymous {
            "Anonymous"
        } else {
            &self.donor_name
        }
    }
}

/// A donation as submitted by a donor, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DonationForm {
    /// Amount to donate.
    pub amount: u64,
    /// Donor's name.
    pub donor_name: String,
    /// Donor's email.
    pub donor_email: String,
    /// Optional message of support.
    pub message: Option<String>,
    /// Hide the donor's name publicly.
    pub is_anonymous: bool,
    /// Payment method.
    pub payment_method: PaymentMethod,
}

impl DonationForm {
    /// Validate the form, returning it with whitespace trimmed and an empty
    /// message dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDonation`] naming the first offending field.
    pub fn validate(mut self, limits: &DonationConfig) -> Result<Self> {
        validate_amount(self.amount, limits)?;

        self.donor_name = self.donor_name.trim().to_string();
        if self.donor_name.chars().count() < MIN_NAME_LEN {
            return Err(Error::invalid_donation(
                "donor_name",
                format!("Name must be at least {MIN_NAME_LEN} characters"),
            ));
        }

        self.donor_email = self.donor_email.trim().to_string();
        if !email_regex().is_match(&self.donor_email) {
            return Err(Error::invalid_donation(
                "donor_email",
                "Please enter a valid email",
            ));
        }

        self.message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(self)
    }
}

/// Check a donation amount against the configured bounds (inclusive).
///
/// # Errors
///
/// Returns [`Error::InvalidDonation`] when the amount is out of range.
pub fn validate_amount(amount: u64, limits: &DonationConfig) -> Result<()> {
    if amount < limits.min_amount {
        return Err(Error::invalid_donation(
            "amount",
            format!("Minimum donation amount is ₹{}", limits.min_amount),
        ));
    }
    if amount > limits.max_amount {
        return Err(Error::invalid_donation(
            "amount",
            format!("Maximum donation amount is ₹{}", limits.max_amount),
        ));
    }
    Ok(())
}

/// Generate a donation id of the form `DN<millis><seq>`.
#[must_use]
pub fn generate_donation_id() -> String {
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed) % 1_000;
    format!("DN{}{seq:03}", Utc::now().timestamp_millis())
}

pub(crate) fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern"))
}
