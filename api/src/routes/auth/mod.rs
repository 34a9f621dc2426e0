//! Authentication route handlers
//!
//! - Registration and login, per entity type
//! - Refresh token rotation
//! - Logout
//! - Admin ban/unban and the security report

pub mod ban;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod security_report;

pub use super::AppState;

use std::net::SocketAddr;

use h2h_core::domain::entities::principal::EntityType;

use crate::handlers::ApiError;

/// Entity type from the `{entity_type}` segment of `/auth/{entity_type}/...`
pub(crate) fn entity_type_param(raw: &str) -> Result<EntityType, ApiError> {
    raw.parse::<EntityType>()
        .map_err(|_| ApiError::not_found("The requested resource was not found"))
}

/// Client address of the request
///
/// Forwarding headers are only believed when the connecting peer is one of
/// `trusted_proxies`; otherwise the peer address itself is used.
pub(crate) fn client_ip(
    req: &actix_web::HttpRequest,
    trusted_proxies: &[String],
) -> Option<String> {
    let info = req.connection_info();
    let peer = info.peer_addr()?;
    if is_trusted_proxy(peer, trusted_proxies) {
        info.realip_remote_addr().map(str::to_owned)
    } else {
        Some(peer.to_owned())
    }
}

/// Peer may arrive as a bare IP or as `ip:port`
fn is_trusted_proxy(peer: &str, trusted_proxies: &[String]) -> bool {
    let ip = peer
        .parse::<SocketAddr>()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| peer.to_owned());

    trusted_proxies
        .iter()
        .any(|trusted| *trusted == ip || trusted == peer)
}

pub(crate) fn user_agent(req: &actix_web::HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
