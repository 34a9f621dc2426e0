mod service_tests;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use h2h_shared::config::auth::JwtConfig;

use crate::domain::entities::principal::{EntityType, PrincipalSummary, Role};
use crate::repositories::{InMemoryRevokedTokenStore, MockRefreshTokenRepository};
use crate::services::clock::ManualClock;
use crate::services::token::{Signer, TokenService, TokenServiceConfig};

pub(super) const TEST_SECRET: &str = "test-signing-secret-that-is-long-enough-0123";

pub(super) fn principal(entity_type: EntityType) -> PrincipalSummary {
    PrincipalSummary {
        id: Uuid::new_v4(),
        email: "someone@example.org".to_string(),
        role: entity_type.default_role(),
        entity_type,
    }
}

pub(super) fn admin() -> PrincipalSummary {
    PrincipalSummary {
        role: Role::Admin,
        ..principal(EntityType::User)
    }
}

pub(super) fn signer(clock: &ManualClock) -> Signer {
    Signer::new(&JwtConfig::new(TEST_SECRET), Arc::new(InMemoryRevokedTokenStore::new()))
        .unwrap()
        .with_clock(Arc::new(clock.clone()))
}

pub(super) fn token_service(
    repo: &MockRefreshTokenRepository,
    clock: &ManualClock,
) -> TokenService<MockRefreshTokenRepository> {
    TokenService::new(
        Arc::new(repo.clone()),
        Arc::new(signer(clock)),
        TokenServiceConfig::default(),
    )
    .with_clock(Arc::new(clock.clone()))
}

pub(super) fn clock() -> ManualClock {
    ManualClock::new(Utc::now())
}
