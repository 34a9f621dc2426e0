//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::{http::header, test, web};
use serde_json::Value;

use h2h_api::routes::AppState;
use h2h_core::domain::entities::principal::{EntityType, Principal, Role};
use h2h_core::repositories::{
    InMemoryRevokedTokenStore, MockOwnershipRepository, MockPrincipalRepository,
    MockRefreshTokenRepository,
};
use h2h_core::services::auth::{hash_password, AuthService, AuthServiceConfig};
use h2h_core::services::authorization::OwnershipResolver;
use h2h_core::services::token::{Signer, TokenService, TokenServiceConfig};
use h2h_shared::config::{AuthConfig, JwtConfig};

pub const PASSWORD: &str = "a-sufficiently-long-password";
pub const SECRET: &str = "api-integration-test-secret-0123456789";
pub const TRUSTED_PROXY: &str = "10.0.0.2";

pub type State = AppState<MockPrincipalRepository, MockRefreshTokenRepository>;

pub struct TestContext {
    pub state: web::Data<State>,
    pub principals: MockPrincipalRepository,
    pub tokens: MockRefreshTokenRepository,
    pub ownership: MockOwnershipRepository,
}

pub fn context() -> TestContext {
    let principals = MockPrincipalRepository::new();
    let tokens = MockRefreshTokenRepository::new();
    let ownership = MockOwnershipRepository::new();

    let mut auth_config = AuthConfig::default();
    auth_config.jwt = JwtConfig::new(SECRET);
    auth_config.bcrypt_cost = 4;

    let signer = Signer::new(&auth_config.jwt, Arc::new(InMemoryRevokedTokenStore::new()))
        .expect("test secret is strong");
    let token_service = Arc::new(TokenService::new(
        Arc::new(tokens.clone()),
        Arc::new(signer),
        TokenServiceConfig::from_auth_config(&auth_config),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(principals.clone()),
        token_service,
        AuthServiceConfig::from_auth_config(&auth_config),
    ));
    let resolver = Arc::new(OwnershipResolver::new(
        Arc::new(ownership.clone()),
        Duration::from_millis(500),
    ));

    let state = web::Data::new(AppState {
        auth_service,
        principal_repository: Arc::new(principals.clone()),
        resolver,
        cleanup: None,
        auth_config,
        trusted_proxies: vec![TRUSTED_PROXY.to_string()],
    });

    TestContext {
        state,
        principals,
        tokens,
        ownership,
    }
}

impl TestContext {
    /// Store an enabled account with [`PASSWORD`]
    pub async fn seed(&self, entity_type: EntityType, email: &str) -> Principal {
        let hash = hash_password(PASSWORD, 4).await.unwrap();
        let principal = Principal::new(entity_type, email.to_string(), hash);
        self.principals.insert(principal.clone()).await;
        principal
    }

    pub async fn seed_admin(&self, email: &str) -> Principal {
        let mut admin = self.seed(EntityType::User, email).await;
        admin.role = Role::Admin;
        self.principals.insert(admin.clone()).await;
        admin
    }

    /// Access token for the principal, signed like a login would
    pub fn access_token(&self, principal: &Principal) -> String {
        self.state
            .auth_service
            .token_service()
            .issue_access_token(&principal.summary())
            .unwrap()
    }
}

pub fn post_json(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

pub fn bearer(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}
