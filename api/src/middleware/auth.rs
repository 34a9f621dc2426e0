//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the Bearer token from the Authorization header, verifies it with
//! the shared [`Signer`] (signature, issuer, audience, expiry and the revoked
//! id set) and injects the caller identity into the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use h2h_core::domain::entities::principal::{EntityType, Role};
use h2h_core::domain::entities::token::Claims;
use h2h_core::domain::value_objects::ownership::Requester;
use h2h_core::errors::{DomainError, ErrorKind, TokenError};
use h2h_core::services::token::Signer;

use super::reject;
use crate::handlers::ApiError;

const MISSING_TOKEN: &str = "Access token required";
const INVALID_TOKEN: &str = "Invalid or expired access token";

/// Caller identity injected into requests by [`JwtAuth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub entity_type: EntityType,
    /// JWT ID of the presented access token
    pub jti: String,
}

impl AuthContext {
    /// Creates a new authentication context from verified JWT claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let id = claims
            .subject_id()
            .map_err(|_| DomainError::Token(TokenError::Malformed))?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
            entity_type: claims.entity_type,
            jti: claims.jti,
        })
    }

    pub fn requester(&self) -> Requester {
        Requester::new(self.id, self.entity_type, self.role)
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    signer: Arc<Signer>,
}

impl JwtAuth {
    pub fn new(signer: Arc<Signer>) -> Self {
        Self { signer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            signer: Arc::clone(&self.signer),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    signer: Arc<Signer>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let signer = Arc::clone(&self.signer);

        Box::pin(async move {
            let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
                return Ok(reject(req, ApiError::unauthorized(MISSING_TOKEN)));
            };

            let context = match signer.verify(&token).await.and_then(AuthContext::from_claims) {
                Ok(context) => context,
                Err(e) if e.kind() == ErrorKind::Internal => {
                    tracing::error!(error = %e, "Access token verification failed internally");
                    return Ok(reject(req, ApiError::internal()));
                }
                Err(e) => {
                    tracing::debug!(error = %e, path = %req.path(), "Rejected access token");
                    return Ok(reject(req, ApiError::unauthorized(INVALID_TOKEN)));
                }
            };

            req.extensions_mut().insert(context);

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Token following `Bearer ` in the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required").into());

        ready(result)
    }
}
