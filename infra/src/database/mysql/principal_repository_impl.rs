//! MySQL implementation of the PrincipalRepository trait over the `users`
//! and `ngos` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use h2h_core::domain::entities::principal::{EntityType, Principal, Role};
use h2h_core::errors::DomainError;
use h2h_core::repositories::PrincipalRepository;

use super::{db_error, parse_uuid};

const PRINCIPAL_COLUMNS: &str =
    "id, login_email, password, role, is_disabled, created_at, updated_at";

/// Account table backing an entity type
fn table(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::User => "users",
        EntityType::Ngo => "ngos",
    }
}

/// MySQL implementation of PrincipalRepository
pub struct MySqlPrincipalRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlPrincipalRepository {
    /// Create a new MySQL principal repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_principal(
        row: &sqlx::mysql::MySqlRow,
        entity_type: EntityType,
    ) -> Result<Principal, DomainError> {
        let id: String = row.try_get("id").map_err(|e| db_error("get id", e))?;
        let role: String = row.try_get("role").map_err(|e| db_error("get role", e))?;

        Ok(Principal {
            id: parse_uuid(&id, "principal")?,
            entity_type,
            role: role
                .parse::<Role>()
                .map_err(|message| DomainError::Internal { message })?,
            login_email: row
                .try_get("login_email")
                .map_err(|e| db_error("get login_email", e))?,
            password_hash: row
                .try_get("password")
                .map_err(|e| db_error("get password", e))?,
            is_disabled: row
                .try_get("is_disabled")
                .map_err(|e| db_error("get is_disabled", e))?,
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
impl PrincipalRepository for MySqlPrincipalRepository {
    async fn find_by_email(
        &self,
        entity_type: EntityType,
        email: &str,
    ) -> Result<Option<Principal>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE login_email = ? LIMIT 1",
            PRINCIPAL_COLUMNS,
            table(entity_type)
        );

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find principal by email", e))?;

        row.map(|row| Self::row_to_principal(&row, entity_type))
            .transpose()
    }

    async fn find_by_id(
        &self,
        entity_type: EntityType,
        id: Uuid,
    ) -> Result<Option<Principal>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = ? LIMIT 1",
            PRINCIPAL_COLUMNS,
            table(entity_type)
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find principal by id", e))?;

        row.map(|row| Self::row_to_principal(&row, entity_type))
            .transpose()
    }

    async fn create(&self, principal: Principal) -> Result<Principal, DomainError> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            table(principal.entity_type),
            PRINCIPAL_COLUMNS
        );

        sqlx::query(&query)
            .bind(principal.id.to_string())
            .bind(&principal.login_email)
            .bind(&principal.password_hash)
            .bind(principal.role.as_str())
            .bind(principal.is_disabled)
            .bind(principal.created_at)
            .bind(principal.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict {
                    message: "Email already registered".to_string(),
                },
                _ => db_error("create principal", e),
            })?;

        Ok(principal)
    }

    async fn set_disabled(
        &self,
        entity_type: EntityType,
        id: Uuid,
        disabled: bool,
    ) -> Result<bool, DomainError> {
        // Matched rather than changed rows, so re-banning is not a miss
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?",
            table(entity_type)
        );
        let exists: i64 = sqlx::query_scalar(&query)
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("check principal", e))?;
        if exists == 0 {
            return Ok(false);
        }

        let query = format!(
            "UPDATE {} SET is_disabled = ?, updated_at = ? WHERE id = ?",
            table(entity_type)
        );
        sqlx::query(&query)
            .bind(disabled)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update principal", e))?;

        Ok(true)
    }
}
