//! Value objects used by ownership checks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::principal::{EntityType, Role};
use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

/// Kind of resource a protected route acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Bare identity check against the route parameter
    None,
    User,
    Ngo,
    Project,
    Application,
    /// Resource kinds registered outside this crate
    Custom(&'static str),
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::None => "none",
            ResourceType::User => "user",
            ResourceType::Ngo => "ngo",
            ResourceType::Project => "project",
            ResourceType::Application => "application",
            ResourceType::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified caller identity as seen by authorization checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: Uuid,
    pub entity_type: EntityType,
    pub role: Role,
}

impl Requester {
    pub fn new(id: Uuid, entity_type: EntityType, role: Role) -> Self {
        Self { id, entity_type, role }
    }

    /// Builds the requester from verified access token claims
    pub fn from_claims(claims: &Claims) -> Result<Self, DomainError> {
        let id = claims
            .subject_id()
            .map_err(|_| DomainError::Token(TokenError::Malformed))?;
        Ok(Self::new(id, claims.entity_type, claims.role))
    }

    /// Whether the requester is the principal `(entity_type, id)`
    pub fn is(&self, entity_type: EntityType, id: Uuid) -> bool {
        self.entity_type == entity_type && self.id == id
    }
}

/// Owners of an application: the applying user, and the NGO owning the
/// project applied to (absent when the project no longer exists)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationOwners {
    pub user_id: Uuid,
    pub ngo_id: Option<Uuid>,
}

/// Outcome of an authorization check that did not fail internally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn from_bool(allowed: bool) -> Self {
        if allowed {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}
