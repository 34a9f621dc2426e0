//! Principal entity: an authenticated volunteer or NGO account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which account table a principal lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A volunteer
    User,
    /// An organization publishing projects
    Ngo,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Ngo => "ngo",
        }
    }

    /// Role assigned to freshly registered accounts of this type
    pub fn default_role(&self) -> Role {
        match self {
            EntityType::User => Role::User,
            EntityType::Ngo => Role::Ngo,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(EntityType::User),
            "ngo" => Ok(EntityType::Ngo),
            other => Err(format!("unknown entity type: {}", other)),
        }
    }
}

/// Authorization role carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ngo,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ngo => "ngo",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "ngo" => Ok(Role::Ngo),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A user or NGO account with login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Unique identifier, scoped to the entity type's table
    pub id: Uuid,

    pub entity_type: EntityType,

    pub role: Role,

    /// Lowercased login email
    pub login_email: String,

    /// bcrypt hash of the password; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Disabled accounts cannot log in or refresh
    pub is_disabled: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// Creates a new enabled principal with the entity type's default role
    pub fn new(entity_type: EntityType, login_email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            entity_type,
            role: entity_type.default_role(),
            login_email,
            password_hash,
            is_disabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Identity fields embedded into access tokens
    pub fn summary(&self) -> PrincipalSummary {
        PrincipalSummary {
            id: self.id,
            email: self.login_email.clone(),
            role: self.role,
            entity_type: self.entity_type,
        }
    }

    /// Marks the account disabled
    pub fn disable(&mut self) {
        self.is_disabled = true;
        self.updated_at = Utc::now();
    }
}

/// Identity carried by access tokens and handed to the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub entity_type: EntityType,
}
