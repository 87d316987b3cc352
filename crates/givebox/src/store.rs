//! The campaign and donation store.
//!
//! [`DonationStore`] holds campaigns, donations, volunteer signups and running
//! totals in memory.
//! When opened with a [`Storage`] backend every mutation is written through to
//! it before the in-memory state changes. Mutations that touch several rows
//! commit them in one storage transaction, so a failed write leaves both
//! sides as they were.

use tracing::{debug, info};

use crate::campaign::{families_helped, Campaign, CampaignUpdate};
use crate::config::Config;
use crate::donation::{Donation, DonationStatus};
use crate::error::{Error, Result};
use crate::fixtures::seed_campaigns;
use crate::storage::{Storage, Totals};
use crate::volunteer::{self, Opportunity, Signup, SignupForm};

/// In-memory campaign and donation store with optional persistence.
#[derive(Debug)]
pub struct DonationStore {
    campaigns: Vec<Campaign>,
    donations: Vec<Donation>,
    signups: Vec<Signup>,
    totals: Totals,
    storage: Option<Storage>,
}

impl Default for DonationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DonationStore {
    /// Create an unpersisted store seeded with the built-in campaigns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            campaigns: seed_campaigns(),
            donations: Vec::new(),
            signups: Vec::new(),
            totals: Totals::default(),
            storage: None,
        }
    }

    /// Create an unpersisted store with no campaigns.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            campaigns: Vec::new(),
            donations: Vec::new(),
            signups: Vec::new(),
            totals: Totals::default(),
            storage: None,
        }
    }

    /// Open the store described by the configuration.
    ///
    /// With persistence enabled the store is loaded from the configured
    /// database; otherwise it lives in memory for this run only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    pub fn open(config: &Config) -> Result<Self> {
        if config.storage.persist {
            let storage = Storage::open(config.database_path())?;
            Self::with_storage(storage, config.storage.seed_fixtures)
        } else if config.storage.seed_fixtures {
            Ok(Self::new())
        } else {
            Ok(Self::empty())
        }
    }

    /// Load a store from the given storage backend.
    ///
    /// When `seed` is set and the backend holds no campaigns, the built-in
    /// campaigns are written to it first.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or seeding the backend fails.
    pub fn with_storage(storage: Storage, seed: bool) -> Result<Self> {
        if seed && storage.campaign_count()? == 0 {
            let campaigns = seed_campaigns();
            for campaign in &campaigns {
                storage.insert_campaign(campaign)?;
            }
            info!("Seeded {} campaigns", campaigns.len());
        }

        let campaigns = storage.load_campaigns()?;
        let donations = storage.load_donations()?;
        let signups = storage.load_signups()?;
        let totals = storage.load_totals()?;

        debug!(
            campaigns = campaigns.len(),
            donations = donations.len(),
            signups = signups.len(),
            total_donated = totals.total_donated,
            "Loaded store"
        );

        Ok(Self {
            campaigns,
            donations,
            signups,
            totals,
            storage: Some(storage),
        })
    }

    /// Whether mutations are written to disk.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// The storage backend, if any.
    #[must_use]
    pub fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }

    /// All campaigns in insertion order.
    #[must_use]
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// All donations in insertion order.
    #[must_use]
    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    /// Sum of all recorded donation amounts.
    #[must_use]
    pub fn total_donated(&self) -> u64 {
        self.totals.total_donated
    }

    /// Families helped by all recorded donations.
    #[must_use]
    pub fn total_impact(&self) -> u64 {
        self.totals.total_impact
    }

    /// Look up a campaign by id.
    #[must_use]
    pub fn campaign_by_id(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    fn campaign_index(&self, id: &str) -> Option<usize> {
        self.campaigns.iter().position(|c| c.id == id)
    }

    /// Look up a donation by id.
    #[must_use]
    pub fn donation_by_id(&self, id: &str) -> Option<&Donation> {
        self.donations.iter().find(|d| d.id == id)
    }

    /// Append a donation and add its amount to the running total.
    ///
    /// No validation happens here; callers go through
    /// [`DonationForm::validate`](crate::donation::DonationForm::validate).
    ///
    /// # Errors
    ///
    /// Returns an error if the write-through to storage fails.
    pub fn add_donation(&mut self, donation: Donation) -> Result<()> {
        self.record_donation(donation, None)
    }

    /// Append a donation and, when `campaign_id` is given, credit it to that
    /// campaign.
    ///
    /// The donation row, the running totals and the credited campaign are
    /// written in a single storage transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CampaignNotFound`] for an unknown campaign id, or an
    /// error if the write-through to storage fails. Nothing changes in either
    /// case.
    pub fn record_donation(&mut self, donation: Donation, campaign_id: Option<&str>) -> Result<()> {
        let credited = match campaign_id {
            Some(id) => {
                let index = self
                    .campaign_index(id)
                    .ok_or_else(|| Error::CampaignNotFound(id.to_string()))?;
                let mut campaign = self.campaigns[index].clone();
                campaign.raised_amount = campaign.raised_amount.saturating_add(donation.amount);
                campaign.donor_count = campaign.donor_count.saturating_add(1);
                Some((index, campaign))
            }
            None => None,
        };

        let totals = Totals {
            total_donated: self.totals.total_donated.saturating_add(donation.amount),
            total_impact: self
                .totals
                .total_impact
                .saturating_add(families_helped(donation.amount)),
        };

        if let Some(storage) = &self.storage {
            storage.record_donation(&donation, totals, credited.as_ref().map(|(_, c)| c))?;
        }

        debug!(
            id = %donation.id,
            amount = donation.amount,
            campaign = campaign_id.unwrap_or("-"),
            "Added donation"
        );
        if let Some((index, campaign)) = credited {
            self.campaigns[index] = campaign;
        }
        self.donations.push(donation);
        self.totals = totals;
        Ok(())
    }

    /// Set the status of the donation with the given id.
    ///
    /// Returns `false`, changing nothing, if no donation has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write-through to storage fails.
    pub fn update_donation_status(&mut self, id: &str, status: DonationStatus) -> Result<bool> {
        let Some(donation) = self.donations.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };

        if let Some(storage) = &self.storage {
            storage.update_donation_status(id, status)?;
        }

        debug!(id, %status, "Updated donation status");
        donation.status = status;
        Ok(true)
    }

    /// The next free numeric campaign id.
    #[must_use]
    pub fn next_campaign_id(&self) -> String {
        let max = self
            .campaigns
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Append a campaign.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCampaign`] if the id is taken, or an error if
    /// the write-through to storage fails.
    pub fn add_campaign(&mut self, campaign: Campaign) -> Result<()> {
        if self.campaign_by_id(&campaign.id).is_some() {
            return Err(Error::DuplicateCampaign(campaign.id));
        }

        if let Some(storage) = &self.storage {
            storage.insert_campaign(&campaign)?;
        }

        debug!(id = %campaign.id, "Added campaign");
        self.campaigns.push(campaign);
        Ok(())
    }

    /// Apply a partial update to the campaign with the given id.
    ///
    /// Returns `false`, changing nothing, if no campaign has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write-through to storage fails.
    pub fn update_campaign(&mut self, id: &str, update: CampaignUpdate) -> Result<bool> {
        let Some(campaign) = self.campaigns.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };

        let mut updated = campaign.clone();
        updated.apply(update);

        if let Some(storage) = &self.storage {
            storage.update_campaign(&updated)?;
        }

        debug!(id, "Updated campaign");
        *campaign = updated;
        Ok(true)
    }

    /// Recorded volunteer signups, oldest first.
    #[must_use]
    pub fn signups(&self) -> &[Signup] {
        &self.signups
    }

    /// The volunteer board with recorded signups counted in.
    #[must_use]
    pub fn volunteer_board(&self) -> Vec<Opportunity> {
        volunteer::board(&self.signups)
    }

    /// Validate a signup form and record it against an opportunity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignup`] for a bad form, the errors of
    /// [`volunteer::check_signup`] when the opportunity is unknown, full or
    /// already joined by this email, or an error if the write-through to
    /// storage fails. Nothing is recorded in any of these cases.
    pub fn sign_up(&mut self, opportunity_id: u32, form: SignupForm) -> Result<Signup> {
        let form = form.validate()?;
        volunteer::check_signup(&self.signups, opportunity_id, &form.email)?;

        let signup = Signup::new(opportunity_id, form);
        if let Some(storage) = &self.storage {
            storage.insert_signup(&signup)?;
        }

        info!(opportunity = opportunity_id, "Volunteer signed up");
        self.signups.push(signup.clone());
        Ok(signup)
    }

    /// Clear every campaign, donation, signup and total, then optionally
    /// reseed the built-in campaigns.
    ///
    /// # Errors
    ///
    /// Returns an error if clearing or reseeding the storage fails.
    pub fn reset(&mut self, seed: bool) -> Result<()> {
        let campaigns = if seed { seed_campaigns() } else { Vec::new() };

        if let Some(storage) = &self.storage {
            storage.reset()?;
            for campaign in &campaigns {
                storage.insert_campaign(campaign)?;
            }
        }

        info!("Store reset");
        self.campaigns = campaigns;
        self.donations.clear();
        self.signups.clear();
        self.totals = Totals::default();
        Ok(())
    }
}
