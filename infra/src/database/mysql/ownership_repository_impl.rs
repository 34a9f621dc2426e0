//! MySQL lookups of project and application owners.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use h2h_core::domain::value_objects::ownership::ApplicationOwners;
use h2h_core::errors::DomainError;
use h2h_core::repositories::OwnershipRepository;

use super::{db_error, parse_uuid};

/// MySQL implementation of OwnershipRepository
pub struct MySqlOwnershipRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOwnershipRepository {
    /// Create a new MySQL ownership repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipRepository for MySqlOwnershipRepository {
    async fn project_owner(&self, project_id: Uuid) -> Result<Option<Uuid>, DomainError> {
        let owner: Option<String> =
            sqlx::query_scalar("SELECT ngo_id FROM projects WHERE id = ? LIMIT 1")
                .bind(project_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find project owner", e))?;

        owner.map(|id| parse_uuid(&id, "ngo")).transpose()
    }

    async fn application_owners(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationOwners>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT a.user_id, p.ngo_id
            FROM applications a
            LEFT JOIN projects p ON p.id = a.project_id
            WHERE a.id = ?
            LIMIT 1
            "#,
        )
        .bind(application_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find application owners", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: String = row.try_get("user_id").map_err(|e| db_error("get user_id", e))?;
        let ngo_id: Option<String> = row.try_get("ngo_id").map_err(|e| db_error("get ngo_id", e))?;

        Ok(Some(ApplicationOwners {
            user_id: parse_uuid(&user_id, "user")?,
            ngo_id: ngo_id.map(|id| parse_uuid(&id, "ngo")).transpose()?,
        }))
    }
}
