//! MySQL implementation of the OtpRepository trait.
//!
//! Codes live in `otp_codes`; `otp_current` maps each email to its newest
//! code and is maintained in the issuance transaction. Timestamps are UTC
//! values supplied by the application, never `NOW()`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySql, MySqlPool, Row, Transaction};
use tracing::{debug, error};

use vc_core::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use vc_core::domain::entities::user::{NewUser, User};
use vc_core::errors::DomainError;
use vc_core::repositories::{IssuedRecord, OtpOwner, OtpRepository};
use vc_shared::utils::email::mask_email;

use super::db_error;
use super::user_repository_impl::{MySqlUserRepository, USER_COLUMNS};

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL OTP repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to OtpRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<OtpRecord, DomainError> {
        let column = |name: &str, e: sqlx::Error| DomainError::Database {
            message: format!("Failed to get {}: {}", name, e),
        };

        Ok(OtpRecord {
            id: row.try_get("id").map_err(|e| column("id", e))?,
            user_id: row.try_get("user_id").map_err(|e| column("user_id", e))?,
            email: row.try_get("email").map_err(|e| column("email", e))?,
            code: row.try_get("code").map_err(|e| column("code", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column("expires_at", e))?,
            used: row.try_get("used").map_err(|e| column("used", e))?,
            attempts: row.try_get("attempts").map_err(|e| column("attempts", e))?,
        })
    }

    async fn user_by_id(
        tx: &mut Transaction<'_, MySql>,
        user_id: i64,
    ) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to load user", e))?;

        row.as_ref().map(MySqlUserRepository::row_to_user).transpose()
    }

    /// Insert the account, or return the id of the one already holding the
    /// email. `LAST_INSERT_ID(id)` makes the existing id visible without a
    /// second query.
    async fn upsert_user(
        tx: &mut Transaction<'_, MySql>,
        user: &NewUser,
    ) -> Result<i64, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, display_name, password_hash, role, is_verified, created_at)
            VALUES (?, ?, ?, ?, FALSE, ?)
            ON DUPLICATE KEY UPDATE id = LAST_INSERT_ID(id)
            "#,
        )
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to create user", e))?;

        Ok(result.last_insert_id() as i64)
    }

    async fn resolve_owner(
        tx: &mut Transaction<'_, MySql>,
        owner: &OtpOwner,
    ) -> Result<(User, bool), DomainError> {
        let user_id = match owner {
            OtpOwner::Existing(user_id) => *user_id,
            OtpOwner::Create(new_user) => Self::upsert_user(tx, new_user).await?,
        };

        let user = Self::user_by_id(tx, user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })?;

        // Placeholder hashes are salted and random, so only our own insert matches
        let created = matches!(
            owner,
            OtpOwner::Create(new_user) if new_user.password_hash == user.password_hash
        );
        Ok((user, created))
    }

    async fn insert_record(
        tx: &mut Transaction<'_, MySql>,
        user_id: i64,
        record: &NewOtpRecord,
    ) -> Result<i64, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO otp_codes (user_id, email, code, created_at, expires_at, used, attempts)
            VALUES (?, ?, ?, ?, ?, FALSE, 0)
            "#,
        )
        .bind(user_id)
        .bind(&record.email)
        .bind(&record.code)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to store OTP", e))?;

        let otp_id = result.last_insert_id() as i64;

        // Concurrent issuances may commit out of order; the highest id wins.
        sqlx::query(
            r#"
            INSERT INTO otp_current (email, otp_id) VALUES (?, ?)
            ON DUPLICATE KEY UPDATE otp_id = GREATEST(otp_id, VALUES(otp_id))
            "#,
        )
        .bind(&record.email)
        .bind(otp_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to update current OTP index", e))?;

        Ok(otp_id)
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn find_current(&self, email: &str) -> Result<Option<OtpRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.email, o.code, o.created_at, o.expires_at,
                   o.used, o.attempts
            FROM otp_current c
            JOIN otp_codes o ON o.id = c.otp_id
            WHERE c.email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load current OTP", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn create_for_owner(
        &self,
        owner: OtpOwner,
        record: NewOtpRecord,
    ) -> Result<IssuedRecord, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result = async {
            let (user, user_created) = Self::resolve_owner(&mut tx, &owner).await?;
            let otp_id = Self::insert_record(&mut tx, user.id, &record).await?;
            Ok::<_, DomainError>((user, user_created, otp_id))
        }
        .await;

        let (user, user_created, otp_id) = match result {
            Ok(values) => values,
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    error!(error = %rollback, "Failed to roll back OTP issuance");
                }
                return Err(e);
            }
        };

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit OTP issuance", e))?;

        debug!(
            email = %mask_email(&record.email),
            otp_id = otp_id,
            "Stored OTP record"
        );

        Ok(IssuedRecord {
            record: record.into_record(otp_id, user.id),
            user,
            user_created,
        })
    }

    async fn record_failed_attempt(&self, otp_id: i64) -> Result<i32, DomainError> {
        let result = sqlx::query("UPDATE otp_codes SET attempts = attempts + 1 WHERE id = ?")
            .bind(otp_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to increment attempt count", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "OTP record".to_string(),
            });
        }

        let row = sqlx::query("SELECT attempts FROM otp_codes WHERE id = ?")
            .bind(otp_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to read attempt count", e))?;

        row.try_get("attempts")
            .map_err(|e| db_error("Failed to get attempts", e))
    }

    async fn mark_verified(&self, otp_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let consumed = sqlx::query("UPDATE otp_codes SET used = TRUE WHERE id = ? AND used = FALSE")
            .bind(otp_id)
            .execute(&mut *tx)
            .await;

        let consumed = match consumed {
            Ok(result) => result.rows_affected() == 1,
            Err(e) => {
                let _ = tx.rollback().await;
                return Err(db_error("Failed to mark OTP used", e));
            }
        };

        if !consumed {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to roll back verification", e))?;
            return Ok(false);
        }

        if let Err(e) = sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
        {
            let _ = tx.rollback().await;
            return Err(db_error("Failed to mark user verified", e));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit verification", e))?;

        Ok(true)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Database unreachable", e))?;
        Ok(())
    }
}
