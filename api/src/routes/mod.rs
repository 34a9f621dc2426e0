//! Route handlers and the state they share

pub mod auth;
pub mod health;
pub mod principals;

use std::sync::Arc;

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};
use h2h_core::services::auth::AuthService;
use h2h_core::services::authorization::OwnershipResolver;
use h2h_core::services::token::{Signer, TokenCleanupService};
use h2h_shared::config::AuthConfig;

/// Services shared by every handler and middleware
pub struct AppState<P, R>
where
    P: PrincipalRepository,
    R: RefreshTokenRepository + 'static,
{
    pub auth_service: Arc<AuthService<P, R>>,
    pub principal_repository: Arc<P>,
    pub resolver: Arc<OwnershipResolver>,
    /// Background sweep, absent when the process does not run one
    pub cleanup: Option<Arc<TokenCleanupService<R>>>,
    pub auth_config: AuthConfig,
    /// Proxies allowed to report the client address
    pub trusted_proxies: Vec<String>,
}

impl<P, R> AppState<P, R>
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    pub fn signer(&self) -> Arc<Signer> {
        Arc::clone(self.auth_service.token_service().signer())
    }

    pub fn cleanup_scheduled(&self) -> bool {
        self.cleanup
            .as_ref()
            .map_or(false, |cleanup| cleanup.is_running())
    }
}
