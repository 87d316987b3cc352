//! Storage layer for givebox.
//!
//! This module provides `SQLite`-based persistence for campaigns, donations
//! and the running totals kept by the store.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, trace, warn};

use crate::campaign::Campaign;
use crate::donation::{Donation, DonationStatus, PaymentMethod};
use crate::error::{Error, Result};
use crate::volunteer::Signup;

/// Metadata key for the running donation total.
const TOTAL_DONATED_KEY: &str = "total_donated";

/// Metadata key for the running impact total.
const TOTAL_IMPACT_KEY: &str = "total_impact";

const CAMPAIGN_COLUMNS: &str = "id, title, description, category, target_amount, raised_amount, \
     donor_count, image_url, is_urgent, end_date, location";

const DONATION_COLUMNS: &str = "id, amount, cause, donor_name, donor_email, message, is_anonymous, \
     timestamp, status, payment_method, transaction_id, tax_benefit";

/// Running totals persisted alongside the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of all recorded donation amounts.
    pub total_donated: u64,
    /// Aggregate impact figure.
    pub total_impact: u64,
}

/// Persistent storage for the donation store.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Campaigns ===

    /// Insert a campaign.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when a
    /// campaign with the same id already exists.
    pub fn insert_campaign(&self, campaign: &Campaign) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO campaigns ({CAMPAIGN_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                campaign.id,
                campaign.title,
                campaign.description,
                campaign.category,
                to_sql_amount("target_amount", campaign.target_amount)?,
                to_sql_amount("raised_amount", campaign.raised_amount)?,
                to_sql_amount("donor_count", campaign.donor_count)?,
                campaign.image_url,
                campaign.is_urgent,
                campaign.end_date.map(|d| d.to_string()),
                campaign.location,
            ],
        )?;
        trace!(id = %campaign.id, "Inserted campaign");
        Ok(())
    }

    /// Overwrite a stored campaign with the given values, matched by id.
    ///
    /// Returns `false` if no campaign has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_campaign(&self, campaign: &Campaign) -> Result<bool> {
        update_campaign_row(&self.conn, campaign)
    }

    /// Load all campaigns in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn load_campaigns(&self) -> Result<Vec<Campaign>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns ORDER BY seq ASC"
        ))?;
        let campaigns = stmt
            .query_map([], Self::row_to_campaign)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(campaigns)
    }

    /// Count stored campaigns.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn campaign_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM campaigns", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Donations ===

    /// Insert a donation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_donation(&self, donation: &Donation) -> Result<()> {
        insert_donation_row(&self.conn, donation)
    }

    /// Record a donation in one transaction: insert it, store the new
    /// totals, and overwrite the credited campaign if there is one.
    ///
    /// Either every write lands or none does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CampaignNotFound`] if the credited campaign is not
    /// stored, or an error if any write fails. The transaction is rolled back
    /// in both cases.
    pub fn record_donation(
        &self,
        donation: &Donation,
        totals: Totals,
        credited: Option<&Campaign>,
    ) -> Result<()> {
        // Storage never nests transactions
        let tx = self.conn.unchecked_transaction()?;

        insert_donation_row(&tx, donation)?;
        write_totals(&tx, totals)?;
        if let Some(campaign) = credited {
            if !update_campaign_row(&tx, campaign)? {
                return Err(Error::CampaignNotFound(campaign.id.clone()));
            }
        }

        tx.commit()?;
        debug!(id = %donation.id, "Recorded donation");
        Ok(())
    }

    /// Set the status of a stored donation.
    ///
    /// Returns `false` if no donation has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_donation_status(&self, id: &str, status: DonationStatus) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE donations SET status = ?2 WHERE id = ?1",
            params![id, status.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Get a donation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_donation(&self, id: &str) -> Result<Option<Donation>> {
        let donation = self
            .conn
            .query_row(
                &format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = ?1"),
                [id],
                Self::row_to_donation,
            )
            .optional()?;
        Ok(donation)
    }

    /// Load all donations in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn load_donations(&self) -> Result<Vec<Donation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations ORDER BY seq ASC"
        ))?;
        let donations = stmt
            .query_map([], Self::row_to_donation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(donations)
    }

    /// Count stored donations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn donation_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM donations", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Volunteer signups ===

    /// Insert a volunteer signup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when the
    /// email has already signed up for the same opportunity.
    pub fn insert_signup(&self, signup: &Signup) -> Result<()> {
        self.conn.execute(
            "INSERT INTO volunteer_signups (opportunity_id, name, email, signed_up_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                signup.opportunity_id,
                signup.name,
                signup.email,
                signup.signed_up_at.to_rfc3339(),
            ],
        )?;
        trace!(opportunity = signup.opportunity_id, "Inserted volunteer signup");
        Ok(())
    }

    /// Load all volunteer signups in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn load_signups(&self) -> Result<Vec<Signup>> {
        let mut stmt = self.conn.prepare(
            "SELECT opportunity_id, name, email, signed_up_at \
             FROM volunteer_signups ORDER BY seq ASC",
        )?;
        let signups = stmt
            .query_map([], |row| {
                let signed_up_at: String = row.get(3)?;
                Ok(Signup {
                    opportunity_id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    signed_up_at: parse_timestamp(&signed_up_at).unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(signups)
    }

    // === Totals ===

    /// Load the running totals. Missing values read as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn load_totals(&self) -> Result<Totals> {
        Ok(Totals {
            total_donated: self.get_counter(TOTAL_DONATED_KEY)?,
            total_impact: self.get_counter(TOTAL_IMPACT_KEY)?,
        })
    }

    /// Persist the running totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_totals(&self, totals: Totals) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_totals(&tx, totals)?;
        tx.commit()?;
        Ok(())
    }

    fn get_counter(&self, key: &str) -> Result<u64> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value.map_or(0, |v| {
            v.parse().unwrap_or_else(|_| {
                warn!("Invalid value for {}: {}, treating as 0", key, v);
                0
            })
        }))
    }

    // === Maintenance ===

    /// Delete every campaign, donation, volunteer signup and running total.
    ///
    /// The schema version is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute_batch(&format!(
            "BEGIN;
             DELETE FROM donations;
             DELETE FROM campaigns;
             DELETE FROM volunteer_signups;
             DELETE FROM metadata WHERE key IN ('{TOTAL_DONATED_KEY}', '{TOTAL_IMPACT_KEY}');
             COMMIT;"
        ))?;
        info!("Storage reset at {}", self.path.display());
        Ok(())
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_campaigns = self.campaign_count()?;
        let total_donations = self.donation_count()?;

        let oldest: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM donations ORDER BY timestamp ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM donations ORDER BY timestamp DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_campaigns,
            total_donations,
            oldest_donation: oldest.as_deref().and_then(parse_timestamp),
            newest_donation: newest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }

    fn row_to_campaign(row: &rusqlite::Row) -> rusqlite::Result<Campaign> {
        let end_date: Option<String> = row.get(9)?;
        Ok(Campaign {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            target_amount: from_sql_amount(row.get(4)?),
            raised_amount: from_sql_amount(row.get(5)?),
            donor_count: from_sql_amount(row.get(6)?),
            image_url: row.get(7)?,
            is_urgent: row.get(8)?,
            end_date: end_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            location: row.get(10)?,
        })
    }

    fn row_to_donation(row: &rusqlite::Row) -> rusqlite::Result<Donation> {
        let timestamp_str: String = row.get(7)?;
        let status_str: String = row.get(8)?;
        let method_str: String = row.get(9)?;
        let tax_benefit: Option<i64> = row.get(11)?;

        let timestamp = parse_timestamp(&timestamp_str).unwrap_or_else(Utc::now);

        let status = status_str.parse().unwrap_or_else(|_| {
            warn!("Unknown donation status: {}, defaulting to pending", status_str);
            DonationStatus::Pending
        });

        let payment_method = method_str.parse().unwrap_or_else(|_| {
            warn!("Unknown payment method: {}, defaulting to upi", method_str);
            PaymentMethod::Upi
        });

        Ok(Donation {
            id: row.get(0)?,
            amount: from_sql_amount(row.get(1)?),
            cause: row.get(2)?,
            donor_name: row.get(3)?,
            donor_email: row.get(4)?,
            message: row.get(5)?,
            is_anonymous: row.get(6)?,
            timestamp,
            status,
            payment_method,
            transaction_id: row.get(10)?,
            tax_benefit: tax_benefit.map(from_sql_amount),
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored campaigns.
    pub total_campaigns: i64,
    /// Number of stored donations.
    pub total_donations: i64,
    /// Timestamp of the oldest donation.
    pub oldest_donation: Option<DateTime<Utc>>,
    /// Timestamp of the newest donation.
    pub newest_donation: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

fn insert_donation_row(conn: &Connection, donation: &Donation) -> Result<()> {
    let tax_benefit = donation
        .tax_benefit
        .map(|b| to_sql_amount("tax_benefit", b))
        .transpose()?;

    conn.execute(
        &format!(
            "INSERT INTO donations ({DONATION_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            donation.id,
            to_sql_amount("amount", donation.amount)?,
            donation.cause,
            donation.donor_name,
            donation.donor_email,
            donation.message,
            donation.is_anonymous,
            donation.timestamp.to_rfc3339(),
            donation.status.to_string(),
            donation.payment_method.to_string(),
            donation.transaction_id,
            tax_benefit,
        ],
    )?;
    trace!(id = %donation.id, "Inserted donation");
    Ok(())
}

fn update_campaign_row(conn: &Connection, campaign: &Campaign) -> Result<bool> {
    let affected = conn.execute(
        r"
        UPDATE campaigns SET
            title = ?2, description = ?3, category = ?4, target_amount = ?5,
            raised_amount = ?6, donor_count = ?7, image_url = ?8, is_urgent = ?9,
            end_date = ?10, location = ?11
        WHERE id = ?1
        ",
        params![
            campaign.id,
            campaign.title,
            campaign.description,
            campaign.category,
            to_sql_amount("target_amount", campaign.target_amount)?,
            to_sql_amount("raised_amount", campaign.raised_amount)?,
            to_sql_amount("donor_count", campaign.donor_count)?,
            campaign.image_url,
            campaign.is_urgent,
            campaign.end_date.map(|d| d.to_string()),
            campaign.location,
        ],
    )?;
    Ok(affected > 0)
}

fn write_totals(conn: &Connection, totals: Totals) -> Result<()> {
    for (key, value) in [
        (TOTAL_DONATED_KEY, totals.total_donated),
        (TOTAL_IMPACT_KEY, totals.total_impact),
    ] {
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (key, value.to_string()),
        )?;
    }
    Ok(())
}

/// `SQLite` integers are signed; anything above `i64::MAX` is refused rather
/// than clamped.
fn to_sql_amount(field: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::AmountOutOfRange { field, value })
}

fn from_sql_amount(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
