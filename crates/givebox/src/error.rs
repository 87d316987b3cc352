//! Error types for givebox.
//!
//! This module defines all error types used throughout the givebox crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for givebox operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// An explicitly named configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Donation Errors ===
    /// A donation form field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidDonation {
        /// Name of the offending form field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// An amount is too large to be stored.
    #[error("{field} of {value} exceeds the largest storable amount")]
    AmountOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// No campaign exists with the given id.
    #[error("campaign not found: {0}")]
    CampaignNotFound(String),

    /// No donation exists with the given id.
    #[error("donation not found: {0}")]
    DonationNotFound(String),

    /// A campaign with the given id already exists.
    #[error("campaign already exists: {0}")]
    DuplicateCampaign(String),

    // === Volunteer Errors ===
    /// A volunteer signup field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidSignup {
        /// Name of the offending form field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// No volunteer opportunity exists with the given id.
    #[error("volunteer opportunity not found: {0}")]
    OpportunityNotFound(String),

    /// The opportunity has no places left.
    #[error("volunteer opportunity {id} is full ({capacity} volunteers)")]
    OpportunityFull {
        /// The opportunity.
        id: u32,
        /// Its volunteer cap.
        capacity: u32,
    },

    /// The email has already signed up for the opportunity.
    #[error("{email} has already signed up for volunteer opportunity {id}")]
    AlreadySignedUp {
        /// The opportunity.
        id: u32,
        /// The volunteer's email.
        email: String,
    },

    /// The payment processor declined or failed the payment.
    #[error("payment failed: {reason}")]
    PaymentFailed {
        /// Why the payment did not go through.
        reason: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for givebox operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a donation validation error for the given form field.
    #[must_use]
    pub fn invalid_donation(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidDonation {
            field,
            message: message.into(),
        }
    }

    /// Create a payment failure error.
    #[must_use]
    pub fn payment_failed(reason: impl Into<String>) -> Self {
        Self::PaymentFailed {
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by user input rather than the system.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDonation { .. }
                | Self::AmountOutOfRange { .. }
                | Self::InvalidSignup { .. }
        )
    }

    /// Check if this error means a lookup by id found nothing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CampaignNotFound(_) | Self::DonationNotFound(_) | Self::OpportunityNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_donation_display() {
        let err = Error::invalid_donation("amount", "Minimum donation amount is ₹50");
        assert_eq!(
            err.to_string(),
            "invalid amount: Minimum donation amount is ₹50"
        );
        assert!(err.is_validation_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_amount_out_of_range_is_validation_error() {
        let err = Error::AmountOutOfRange {
            field: "target_amount",
            value: u64::MAX,
        };
        assert!(err.is_validation_error());
        assert!(err.to_string().starts_with("target_amount of 18446744073709551615"));
    }

    #[test]
    fn test_not_found_errors() {
        let err = Error::CampaignNotFound("42".to_string());
        assert_eq!(err.to_string(), "campaign not found: 42");
        assert!(err.is_not_found());

        let err = Error::DonationNotFound("DN1".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_volunteer_error_display() {
        let err = Error::OpportunityFull { id: 4, capacity: 10 };
        assert_eq!(err.to_string(), "volunteer opportunity 4 is full (10 volunteers)");
        assert!(!err.is_validation_error());

        let err = Error::OpportunityNotFound("9".to_string());
        assert!(err.is_not_found());
    }

    #[test]
    fn test_payment_failed_display() {
        let err = Error::payment_failed("card declined");
        assert_eq!(err.to_string(), "payment failed: card declined");
    }

    #[test]
    fn test_duplicate_campaign_display() {
        let err = Error::DuplicateCampaign("1".to_string());
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "min_amount too large".to_string(),
        };
        assert!(err.to_string().contains("min_amount"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
