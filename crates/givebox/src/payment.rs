//! Payment processing.
//!
//! There is no real gateway. [`SimulatedProcessor`] waits a fixed delay and
//! then succeeds, issuing a ledger-style transaction id. The delay has no
//! cancellation and no timeout.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::donation::{Donation, DonationForm, DonationStatus};
use crate::error::{Error, Result};
use crate::store::DonationStore;
use crate::tax::tax_benefit;

/// Hex digits kept from the hash when building a transaction id.
const TRANSACTION_ID_HEX_LEN: usize = 12;

/// Proof that a payment went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// Processor-issued transaction id.
    pub transaction_id: String,
    /// When the payment completed.
    pub processed_at: DateTime<Utc>,
}

/// Something that can take payment for a donation.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Name of this processor (for logging).
    fn name(&self) -> &'static str;

    /// Process the payment for a pending donation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PaymentFailed`] if the payment does not go through.
    async fn process(&self, donation: &Donation) -> Result<Receipt>;
}

/// A processor that always succeeds after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    delay: Duration,
}

impl SimulatedProcessor {
    /// Create a processor with the given delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Create a processor using the configured delay.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.processing_delay())
    }

    /// The fixed processing delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn process(&self, donation: &Donation) -> Result<Receipt> {
        tokio::time::sleep(self.delay).await;
        Ok(Receipt {
            transaction_id: transaction_id(donation),
            processed_at: Utc::now(),
        })
    }
}

/// Derive a `0x`-prefixed transaction id from a donation's identity.
#[must_use]
pub fn transaction_id(donation: &Donation) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(donation.id.as_bytes());
    hasher.update(&donation.amount.to_le_bytes());
    hasher.update(donation.timestamp.to_rfc3339().as_bytes());
    let hex = hasher.finalize().to_hex();
    format!("0x{}", &hex.as_str()[..TRANSACTION_ID_HEX_LEN])
}

/// Validate a donation form, take payment, and record the donation.
///
/// The cause is the title of `campaign_id` when given, else the configured
/// default cause. On success the donation is recorded as completed with the
/// processor's transaction id, and the campaign (if any) is credited. On
/// payment failure nothing is recorded.
///
/// # Errors
///
/// Returns a validation error for a bad form, [`Error::CampaignNotFound`] for
/// an unknown campaign, the processor's error if payment fails, or a storage
/// error if recording fails.
pub async fn submit_donation<P>(
    store: &mut DonationStore,
    processor: &P,
    form: DonationForm,
    campaign_id: Option<&str>,
    config: &Config,
) -> Result<Donation>
where
    P: PaymentProcessor + ?Sized,
{
    let form = form.validate(&config.donation)?;

    let cause = match campaign_id {
        Some(id) => store
            .campaign_by_id(id)
            .map(|c| c.title.clone())
            .ok_or_else(|| Error::CampaignNotFound(id.to_string()))?,
        None => config.donation.default_cause.clone(),
    };

    let benefit = tax_benefit(form.amount, config.tax.deduction_percent);
    let mut donation = Donation::from_form(form, cause, benefit);

    info!(
        id = %donation.id,
        amount = donation.amount,
        processor = processor.name(),
        "Processing payment"
    );

    let receipt = match processor.process(&donation).await {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(id = %donation.id, error = %e, "Payment failed");
            return Err(e);
        }
    };

    donation.status = DonationStatus::Completed;
    donation.transaction_id = Some(receipt.transaction_id);

    store.record_donation(donation.clone(), campaign_id)?;

    info!(id = %donation.id, "Donation recorded");
    Ok(donation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donation::PaymentMethod;
    use std::time::Instant;

    struct DecliningProcessor;

    #[async_trait]
    impl PaymentProcessor for DecliningProcessor {
        fn name(&self) -> &'static str {
            "declining"
        }

        async fn process(&self, _donation: &Donation) -> Result<Receipt> {
            Err(Error::payment_failed("card declined"))
        }
    }

    fn instant_config() -> Config {
        let mut config = Config::default();
        config.payment.processing_delay_ms = 0;
        config
    }

    fn form(amount: u64) -> DonationForm {
        DonationForm {
            amount,
            donor_name: "Kabir".to_string(),
            donor_email: "kabir@example.org".to_string(),
            message: Some("Stay strong".to_string()),
            is_anonymous: false,
            payment_method: PaymentMethod::Upi,
        }
    }

    #[tokio::test]
    async fn test_submit_general_donation() {
        let config = instant_config();
        let mut store = DonationStore::new();
        let processor = SimulatedProcessor::from_config(&config);

        let donation = submit_donation(&mut store, &processor, form(1_000), None, &config)
            .await
            .unwrap();

        assert_eq!(donation.cause, "General Donation");
        assert_eq!(donation.status, DonationStatus::Completed);
        assert_eq!(donation.tax_benefit, Some(500));
        assert!(donation
            .transaction_id
            .as_deref()
            .is_some_and(|t| t.starts_with("0x") && t.len() == 14));
        assert_eq!(store.total_donated(), 1_000);
        assert_eq!(store.donations().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_credits_campaign() {
        let config = instant_config();
        let mut store = DonationStore::new();
        let processor = SimulatedProcessor::from_config(&config);

        let donation = submit_donation(&mut store, &processor, form(5_000), Some("2"), &config)
            .await
            .unwrap();

        assert_eq!(donation.cause, "Emergency Food Relief");
        let campaign = store.campaign_by_id("2").unwrap();
        assert_eq!(campaign.raised_amount, 185_000);
        assert_eq!(campaign.donor_count, 157);
    }

    #[tokio::test]
    async fn test_submit_persists_donation_totals_and_campaign_together() {
        let config = instant_config();
        let storage = crate::storage::Storage::open_in_memory().unwrap();
        let mut store = DonationStore::with_storage(storage, true).unwrap();
        let processor = SimulatedProcessor::from_config(&config);

        let donation = submit_donation(&mut store, &processor, form(5_000), Some("2"), &config)
            .await
            .unwrap();

        let storage = store.storage().unwrap();
        assert!(storage.get_donation(&donation.id).unwrap().is_some());
        assert_eq!(storage.load_totals().unwrap().total_donated, 5_000);
        assert_eq!(storage.load_campaigns().unwrap()[1].raised_amount, 185_000);
    }

    #[tokio::test]
    async fn test_submit_unknown_campaign() {
        let config = instant_config();
        let mut store = DonationStore::new();
        let processor = SimulatedProcessor::from_config(&config);

        let err = submit_donation(&mut store, &processor, form(500), Some("404"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CampaignNotFound(_)));
        assert!(store.donations().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_amount() {
        let config = instant_config();
        let mut store = DonationStore::new();
        let processor = SimulatedProcessor::from_config(&config);

        for amount in [49, 500_001] {
            let err = submit_donation(&mut store, &processor, form(amount), None, &config)
                .await
                .unwrap_err();
            assert!(err.is_validation_error());
        }
        assert_eq!(store.total_donated(), 0);
    }

    #[tokio::test]
    async fn test_payment_failure_records_nothing() {
        crate::logging::init_test_logging();
        let config = instant_config();
        let mut store = DonationStore::new();

        let err = submit_donation(&mut store, &DecliningProcessor, form(1_000), Some("1"), &config)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PaymentFailed { .. }));
        assert!(store.donations().is_empty());
        assert_eq!(store.campaign_by_id("1").unwrap().donor_count, 234);
    }

    #[tokio::test]
    async fn test_simulated_processor_waits() {
        let processor = SimulatedProcessor::new(Duration::from_millis(20));
        let donation = Donation::from_form(form(500), "x", 0);

        let started = Instant::now();
        let receipt = processor.process(&donation).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(receipt.transaction_id, transaction_id(&donation));
    }

    #[test]
    fn test_transaction_id_is_deterministic() {
        let donation = Donation::from_form(form(500), "x", 0);
        assert_eq!(transaction_id(&donation), transaction_id(&donation));

        let other = Donation::from_form(form(500), "x", 0);
        assert_ne!(transaction_id(&donation), transaction_id(&other));
    }

    #[test]
    fn test_processor_from_config() {
        let processor = SimulatedProcessor::from_config(&Config::default());
        assert_eq!(processor.delay(), Duration::from_secs(2));
        assert_eq!(processor.name(), "simulated");
    }
}
