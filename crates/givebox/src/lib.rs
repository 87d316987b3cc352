//! `givebox` - Local-first campaign browsing and donation tracking
//!
//! This library provides the campaign and donation store, its `SQLite`
//! persistence, a simulated payment flow, and the read-only views (dashboard,
//! transparency ledger, tax and impact estimates) built on top of it, plus a
//! capacity-limited volunteer signup board.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod campaign;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod donation;
pub mod error;
pub mod fixtures;
pub mod format;
pub mod impact;
pub mod logging;
pub mod payment;
pub mod storage;
pub mod store;
pub mod tax;
pub mod transparency;
pub mod volunteer;

pub use campaign::{Campaign, CampaignQuery, CampaignSort, CampaignUpdate};
pub use config::Config;
pub use dashboard::DashboardSummary;
pub use donation::{Donation, DonationForm, DonationStatus, PaymentMethod};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use payment::{submit_donation, PaymentProcessor, Receipt, SimulatedProcessor};
pub use storage::{Storage, StorageStats};
pub use store::DonationStore;
pub use tax::TaxEstimate;
pub use volunteer::{Opportunity, Signup, SignupForm, VolunteerQuery};
