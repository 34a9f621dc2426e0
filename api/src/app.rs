//! Application factory
//!
//! Builds the Actix-web application from a shared [`AppState`]. The binary
//! wraps the result in request tracing; tests use it as is.

use actix_web::{web, App, HttpResponse, ResponseError};

use h2h_core::domain::entities::principal::EntityType;
use h2h_core::domain::value_objects::ownership::ResourceType;
use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use crate::handlers::ApiError;
use crate::middleware::{JwtAuth, RequireOwnership, RequireRole};
use crate::routes::auth::{ban, login, logout, refresh, register, security_report};
use crate::routes::{health::health_check, principals::get_principal, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<P, R>(
    app_state: web::Data<AppState<P, R>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let jwt = JwtAuth::new(app_state.signer());
    let resolver = app_state.resolver.clone();

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::bad_request(format!("Invalid request body: {}", err)).into()
        }))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/refresh", web::post().to(refresh::refresh::<P, R>))
                        .route("/logout", web::post().to(logout::logout::<P, R>))
                        .service(
                            web::resource("/ban")
                                .route(web::post().to(ban::ban::<P, R>))
                                .wrap(RequireRole::admin())
                                .wrap(jwt.clone()),
                        )
                        .service(
                            web::resource("/unban")
                                .route(web::post().to(ban::unban::<P, R>))
                                .wrap(RequireRole::admin())
                                .wrap(jwt.clone()),
                        )
                        .service(
                            web::resource("/security/report")
                                .route(web::get().to(security_report::security_report::<P, R>))
                                .wrap(RequireRole::admin())
                                .wrap(jwt.clone()),
                        )
                        .route(
                            "/{entity_type}/register",
                            web::post().to(register::register::<P, R>),
                        )
                        .route("/{entity_type}/login", web::post().to(login::login::<P, R>)),
                )
                .service(
                    web::resource("/users/{id}")
                        .app_data(web::Data::new(EntityType::User))
                        .route(web::get().to(get_principal::<P, R>))
                        .wrap(RequireOwnership::new(resolver.clone(), ResourceType::User))
                        .wrap(jwt.clone()),
                )
                .service(
                    web::resource("/ngos/{id}")
                        .app_data(web::Data::new(EntityType::Ngo))
                        .route(web::get().to(get_principal::<P, R>))
                        .wrap(RequireOwnership::new(resolver, ResourceType::Ngo))
                        .wrap(jwt),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ApiError::not_found("The requested resource was not found").error_response()
}
