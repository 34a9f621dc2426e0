//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Tokens are stored by the SHA-256 digest of their secret; the digest is
//! computed by the token service, so this layer never sees a secret.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use h2h_core::domain::entities::principal::EntityType;
use h2h_core::domain::entities::token::RefreshToken;
use h2h_core::errors::DomainError;
use h2h_core::repositories::{RefreshTokenRepository, RefreshTokenStats, Redemption};

use super::{db_error, parse_uuid};

const TOKEN_COLUMNS: &str = "id, subject_id, entity_type, token_hash, ip_address, user_agent, \
     expires_at, is_revoked, revoked_at, revoked_reason, created_at, updated_at";

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(|e| db_error("get id", e))?;
        let subject_id: String = row
            .try_get("subject_id")
            .map_err(|e| db_error("get subject_id", e))?;
        let entity_type: String = row
            .try_get("entity_type")
            .map_err(|e| db_error("get entity_type", e))?;

        Ok(RefreshToken {
            id: parse_uuid(&id, "token")?,
            subject_id: parse_uuid(&subject_id, "subject")?,
            entity_type: entity_type
                .parse::<EntityType>()
                .map_err(|message| DomainError::Internal { message })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| db_error("get token_hash", e))?,
            ip_address: row
                .try_get("ip_address")
                .map_err(|e| db_error("get ip_address", e))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| db_error("get user_agent", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| db_error("get expires_at", e))?,
            is_revoked: row
                .try_get("is_revoked")
                .map_err(|e| db_error("get is_revoked", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| db_error("get revoked_at", e))?,
            revoked_reason: row
                .try_get("revoked_reason")
                .map_err(|e| db_error("get revoked_reason", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| db_error("get updated_at", e))?,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, subject_id, entity_type, token_hash, ip_address, user_agent,
                expires_at, is_revoked, revoked_at, revoked_reason, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.subject_id.to_string())
            .bind(token.entity_type.as_str())
            .bind(&token.token_hash)
            .bind(&token.ip_address)
            .bind(&token.user_agent)
            .bind(token.expires_at)
            .bind(token.is_revoked)
            .bind(token.revoked_at)
            .bind(&token.revoked_reason)
            .bind(token.created_at)
            .bind(token.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict {
                    message: "Refresh token already exists".to_string(),
                },
                _ => db_error("save refresh token", e),
            })?;

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? LIMIT 1",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find refresh token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn redeem(
        &self,
        token_hash: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin redeem transaction", e))?;

        // The row lock serializes concurrent redeems of the same token
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? LIMIT 1 FOR UPDATE",
            TOKEN_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("lock refresh token", e))?;

        let Some(row) = row else {
            return Ok(Redemption::NotFound);
        };
        let token = Self::row_to_token(&row)?;

        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?, updated_at = ?
            WHERE token_hash = ? AND is_revoked = FALSE AND expires_at > ?
            "#,
        )
        .bind(now)
        .bind(reason)
        .bind(now)
        .bind(token_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("redeem refresh token", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit redeem transaction", e))?;

        if result.rows_affected() == 1 {
            Ok(Redemption::Redeemed(token))
        } else {
            Ok(Redemption::Inactive)
        }
    }

    async fn revoke(
        &self,
        token_hash: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?, updated_at = ?
            WHERE token_hash = ? AND is_revoked = FALSE
            "#,
        )
        .bind(now)
        .bind(reason)
        .bind(now)
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("revoke refresh token", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Already revoked tokens still count as found
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM refresh_tokens WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("check refresh token", e))?;

        Ok(exists > 0)
    }

    async fn revoke_all_for_subject(
        &self,
        subject_id: Uuid,
        entity_type: EntityType,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoked_reason = ?, updated_at = ?
            WHERE subject_id = ? AND entity_type = ? AND is_revoked = FALSE AND expires_at > ?
            "#,
        )
        .bind(now)
        .bind(reason)
        .bind(now)
        .bind(subject_id.to_string())
        .bind(entity_type.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("revoke subject tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete expired tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<RefreshTokenStats, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(CASE WHEN is_revoked = FALSE AND expires_at > ? THEN 1 END) AS active,
                COUNT(CASE WHEN is_revoked = TRUE THEN 1 END) AS revoked,
                COUNT(CASE WHEN expires_at < ? THEN 1 END) AS expired
            FROM refresh_tokens
            "#,
        )
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count refresh tokens", e))?;

        let count = |column: &str| -> Result<u64, DomainError> {
            let value: i64 = row
                .try_get(column)
                .map_err(|e| db_error("read token count", e))?;
            Ok(value.max(0) as u64)
        };

        Ok(RefreshTokenStats {
            active: count("active")?,
            revoked: count("revoked")?,
            expired: count("expired")?,
        })
    }
}
