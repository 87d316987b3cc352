//! `SQLite` schema definitions for givebox.

/// SQL statement to create the campaigns table.
///
/// `seq` preserves insertion order; `id` is the public identifier.
pub const CREATE_CAMPAIGNS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS campaigns (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    target_amount INTEGER NOT NULL,
    raised_amount INTEGER NOT NULL DEFAULT 0,
    donor_count INTEGER NOT NULL DEFAULT 0,
    image_url TEXT NOT NULL,
    is_urgent INTEGER NOT NULL DEFAULT 0,
    end_date TEXT,
    location TEXT NOT NULL
)
";

/// SQL statement to create the donations table.
pub const CREATE_DONATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS donations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    amount INTEGER NOT NULL,
    cause TEXT NOT NULL,
    donor_name TEXT NOT NULL,
    donor_email TEXT NOT NULL,
    message TEXT,
    is_anonymous INTEGER NOT NULL DEFAULT 0,
    timestamp TEXT NOT NULL,
    status TEXT NOT NULL,
    payment_method TEXT NOT NULL,
    transaction_id TEXT,
    tax_benefit INTEGER
)
";

/// SQL statement to create an index on donation timestamp.
pub const CREATE_DONATION_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_donations_timestamp ON donations(timestamp DESC)
";

/// SQL statement to create an index on donation status.
pub const CREATE_DONATION_STATUS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_donations_status ON donations(status)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// SQL statement to create the volunteer signups table (schema version 2).
pub const CREATE_VOLUNTEER_SIGNUPS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS volunteer_signups (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    opportunity_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL COLLATE NOCASE,
    signed_up_at TEXT NOT NULL,
    UNIQUE (opportunity_id, email)
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CAMPAIGNS_TABLE,
    CREATE_DONATIONS_TABLE,
    CREATE_DONATION_TIMESTAMP_INDEX,
    CREATE_DONATION_STATUS_INDEX,
    CREATE_METADATA_TABLE,
];
