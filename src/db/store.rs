//! Account persistence for Stayhub.
//!
//! [`AccountStore`] is the seam between the auth service and storage;
//! [`SqliteAccountStore`] is the production implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::account::{Account, NewAccount};
use crate::{AuthError, Result};

/// Column list shared by all SELECTs so rows always decode the same way.
const ACCOUNT_COLUMNS: &str = "id, property_name, owner_name, email, phone, password_hash, \
     city, state, country, pincode, is_active, email_verified, verification_status, \
     email_otp, otp_expiry, otp_attempts, last_otp_request, login_attempts, locked_until, \
     reset_token, reset_expiry, last_login, created_at, version";

/// Storage interface for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account and return it with its assigned ID.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Look up an account by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>>;

    /// Look up an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Look up an account by phone number.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>>;

    /// Look up an account by its outstanding password-reset token.
    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>>;

    /// Check whether an email is already registered.
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Check whether a phone number is already registered.
    async fn exists_by_phone(&self, phone: &str) -> Result<bool>;

    /// Persist a modified account.
    ///
    /// The update is guarded by the account's `version`; on success the
    /// in-memory version is bumped to match the row. Fails with
    /// [`AuthError::ConcurrencyConflict`] when the row changed underneath,
    /// or [`AuthError::NotFound`] when it no longer exists.
    async fn save(&self, account: &mut Account) -> Result<()>;
}

/// SQLite-backed account store.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    /// Create a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, turning UNIQUE violations into a conflict on `field`.
fn map_insert_error(e: sqlx::Error, field: &str) -> AuthError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AuthError::Conflict(field.to_string());
        }
    }
    e.into()
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO accounts (property_name, owner_name, email, phone, password_hash, \
             city, state, country, pincode, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_account.property_name)
        .bind(&new_account.owner_name)
        .bind(&new_account.email)
        .bind(&new_account.phone)
        .bind(&new_account.password_hash)
        .bind(&new_account.city)
        .bind(&new_account.state)
        .bind(&new_account.country)
        .bind(&new_account.pincode)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "email or phone"))?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::Database("inserted account not found".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone = ?"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE reset_token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE email = ? COLLATE NOCASE")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE phone = ?")
            .bind(phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn save(&self, account: &mut Account) -> Result<()> {
        let result = sqlx::query(
            "UPDATE accounts SET \
             property_name = ?, owner_name = ?, email = ?, phone = ?, password_hash = ?, \
             city = ?, state = ?, country = ?, pincode = ?, \
             is_active = ?, email_verified = ?, verification_status = ?, \
             email_otp = ?, otp_expiry = ?, otp_attempts = ?, last_otp_request = ?, \
             login_attempts = ?, locked_until = ?, reset_token = ?, reset_expiry = ?, \
             last_login = ?, version = version + 1 \
             WHERE id = ? AND version = ?",
        )
        .bind(&account.property_name)
        .bind(&account.owner_name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password_hash)
        .bind(&account.city)
        .bind(&account.state)
        .bind(&account.country)
        .bind(&account.pincode)
        .bind(account.is_active)
        .bind(account.email_verified)
        .bind(&account.verification_status)
        .bind(&account.email_otp)
        .bind(account.otp_expiry)
        .bind(account.otp_attempts)
        .bind(account.last_otp_request)
        .bind(account.login_attempts)
        .bind(account.locked_until)
        .bind(&account.reset_token)
        .bind(account.reset_expiry)
        .bind(account.last_login)
        .bind(account.id)
        .bind(account.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "email or phone"))?;

        if result.rows_affected() == 0 {
            // Distinguish a stale version from a deleted row.
            return if self.find_by_id(account.id).await?.is_some() {
                Err(AuthError::ConcurrencyConflict)
            } else {
                Err(AuthError::NotFound("account".to_string()))
            };
        }

        account.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn test_store() -> SqliteAccountStore {
        let db = Database::open_in_memory().await.unwrap();
        SqliteAccountStore::new(db.pool().clone())
    }

    fn sample_new_account() -> NewAccount {
        NewAccount::new(
            "Green Nest PG",
            "Asha",
            "asha@example.com",
            "9999999999",
            "$argon2id$fakehash",
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = test_store().await;
        let account = store.create(sample_new_account()).await.unwrap();
        assert!(account.id > 0);
        assert_eq!(account.version, 0);
        assert!(account.is_active);
        assert!(!account.email_verified);
        assert_eq!(account.verification_status, "pending");

        let by_email = store.find_by_email("asha@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, account.id);

        let by_phone = store.find_by_phone("9999999999").await.unwrap();
        assert_eq!(by_phone.unwrap().id, account.id);
    }

    #[tokio::test]
    async fn test_find_by_email_case_insensitive() {
        let store = test_store().await;
        store.create(sample_new_account()).await.unwrap();
        let found = store.find_by_email("ASHA@Example.COM").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = test_store().await;
        store.create(sample_new_account()).await.unwrap();

        let mut dup = sample_new_account();
        dup.phone = "8888888888".to_string();
        let result = store.create(dup).await;
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_duplicate_phone_conflicts() {
        let store = test_store().await;
        store.create(sample_new_account()).await.unwrap();

        let mut dup = sample_new_account();
        dup.email = "other@example.com".to_string();
        let result = store.create(dup).await;
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let store = test_store().await;
        assert!(!store.exists_by_email("asha@example.com").await.unwrap());
        store.create(sample_new_account()).await.unwrap();
        assert!(store.exists_by_email("asha@example.com").await.unwrap());
        assert!(store.exists_by_phone("9999999999").await.unwrap());
        assert!(!store.exists_by_phone("1111111111").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_bumps_version() {
        let store = test_store().await;
        let mut account = store.create(sample_new_account()).await.unwrap();

        account.email_verified = true;
        account.verification_status = "verified".to_string();
        store.save(&mut account).await.unwrap();
        assert_eq!(account.version, 1);

        let reloaded = store.find_by_id(account.id).await.unwrap().unwrap();
        assert!(reloaded.email_verified);
        assert_eq!(reloaded.version, 1);
    }

    #[tokio::test]
    async fn test_save_stale_version_conflicts() {
        let store = test_store().await;
        let account = store.create(sample_new_account()).await.unwrap();

        let mut first = account.clone();
        let mut second = account;
        store.save(&mut first).await.unwrap();

        second.login_attempts = 1;
        let result = store.save(&mut second).await;
        assert!(matches!(result, Err(AuthError::ConcurrencyConflict)));
    }

    #[tokio::test]
    async fn test_save_missing_row_not_found() {
        let store = test_store().await;
        let mut account = store.create(sample_new_account()).await.unwrap();
        account.id = 9999;
        let result = store.save(&mut account).await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_reset_token() {
        let store = test_store().await;
        let mut account = store.create(sample_new_account()).await.unwrap();
        account.reset_token = Some("token-abc".to_string());
        store.save(&mut account).await.unwrap();

        let found = store.find_by_reset_token("token-abc").await.unwrap();
        assert_eq!(found.unwrap().id, account.id);
        assert!(store
            .find_by_reset_token("missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_timestamps_round_trip() {
        let store = test_store().await;
        let mut account = store.create(sample_new_account()).await.unwrap();
        let expiry = Utc::now() + chrono::Duration::minutes(5);
        account.email_otp = Some("123456".to_string());
        account.otp_expiry = Some(expiry);
        store.save(&mut account).await.unwrap();

        let reloaded = store.find_by_id(account.id).await.unwrap().unwrap();
        let stored = reloaded.otp_expiry.unwrap();
        assert!((stored - expiry).num_milliseconds().abs() < 1000);
    }
}
