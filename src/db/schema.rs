//! Database schema and migrations for Stayhub.

/// Database migrations, applied sequentially.
///
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts table for property-owner authentication
    r#"
CREATE TABLE accounts (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    property_name       TEXT NOT NULL,
    owner_name          TEXT NOT NULL,
    email               TEXT NOT NULL UNIQUE COLLATE NOCASE,
    phone               TEXT NOT NULL UNIQUE,
    password_hash       TEXT NOT NULL,           -- Argon2 PHC string
    city                TEXT,
    state               TEXT,
    country             TEXT,
    pincode             TEXT,
    is_active           INTEGER NOT NULL DEFAULT 1,
    email_verified      INTEGER NOT NULL DEFAULT 0,
    verification_status TEXT NOT NULL DEFAULT 'pending',  -- 'pending', 'verified', 'rejected'
    email_otp           TEXT,
    otp_expiry          TEXT,
    otp_attempts        INTEGER NOT NULL DEFAULT 0,
    last_otp_request    TEXT,
    login_attempts      INTEGER NOT NULL DEFAULT 0,
    locked_until        TEXT,
    reset_token         TEXT,
    reset_expiry        TEXT,
    last_login          TEXT,
    created_at          TEXT NOT NULL,
    version             INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_accounts_email ON accounts(email);
CREATE INDEX idx_accounts_phone ON accounts(phone);
CREATE INDEX idx_accounts_reset_token ON accounts(reset_token);
"#,
];
