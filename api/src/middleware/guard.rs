//! Shared plumbing for authorization guards.
//!
//! A guard only decides whether a request may proceed; the middleware service
//! around it forwards or rejects the request.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    rc::Rc,
    task::{Context, Poll},
};

use super::reject;
use crate::handlers::ApiError;

/// Decision logic of an authorization middleware
pub trait RequestGuard: Clone + 'static {
    /// Resolve to `Ok(())` to let the request through
    fn check(&self, req: &ServiceRequest) -> LocalBoxFuture<'static, Result<(), ApiError>>;
}

/// Middleware service running a [`RequestGuard`] before the inner service
pub struct GuardMiddleware<S, G> {
    service: Rc<S>,
    guard: G,
}

impl<S, G> GuardMiddleware<S, G> {
    pub fn new(service: S, guard: G) -> Self {
        Self {
            service: Rc::new(service),
            guard,
        }
    }
}

impl<S, B, G> Service<ServiceRequest> for GuardMiddleware<S, G>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    G: RequestGuard,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let check = self.guard.check(&req);

        Box::pin(async move {
            match check.await {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(error) => Ok(reject(req, error)),
            }
        })
    }
}

/// Implement `Transform` for a [`RequestGuard`] so it can be passed to `wrap`
macro_rules! guard_transform {
    ($guard:ty) => {
        impl<S, B> actix_web::dev::Transform<S, actix_web::dev::ServiceRequest> for $guard
        where
            S: actix_web::dev::Service<
                    actix_web::dev::ServiceRequest,
                    Response = actix_web::dev::ServiceResponse<B>,
                    Error = actix_web::Error,
                > + 'static,
            S::Future: 'static,
            B: 'static,
        {
            type Response = actix_web::dev::ServiceResponse<actix_web::body::EitherBody<B>>;
            type Error = actix_web::Error;
            type InitError = ();
            type Transform = $crate::middleware::guard::GuardMiddleware<S, $guard>;
            type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

            fn new_transform(&self, service: S) -> Self::Future {
                std::future::ready(Ok($crate::middleware::guard::GuardMiddleware::new(
                    service,
                    self.clone(),
                )))
            }
        }
    };
}

pub(crate) use guard_transform;
