//! Integration tests for authentication and authorization guards

mod common;

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;

use h2h_api::app::create_app;
use h2h_api::middleware::{AuthContext, JwtAuth, RequireEntityType, RequireOwnership};
use h2h_core::domain::entities::principal::EntityType;
use h2h_core::domain::value_objects::ownership::ResourceType;

use common::{bearer, context, post_json, TestContext, PASSWORD};

async fn login(ctx: &TestContext, email: &str) -> Value {
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let req = post_json(
        "/api/v1/auth/user/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_protected_route_requires_token() {
    let ctx = context();
    let user = ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let uri = format!("/api/v1/users/{}", user.id);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Access token required");
    assert_eq!(body["error"], "UNAUTHORIZED");

    let req = bearer(test::TestRequest::get().uri(&uri), "not-a-jwt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired access token");

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("authorization", format!("Basic {}", ctx.access_token(&user))))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile_route_enforces_ownership() {
    let ctx = context();
    let alice = ctx.seed(EntityType::User, "alice@example.org").await;
    let bob = ctx.seed(EntityType::User, "bob@example.org").await;
    let admin = ctx.seed_admin("admin@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let alice_uri = format!("/api/v1/users/{}", alice.id);

    let req = bearer(test::TestRequest::get().uri(&alice_uri), &ctx.access_token(&alice)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], alice.id.to_string());
    assert!(body.get("passwordHash").is_none());

    let req = bearer(test::TestRequest::get().uri(&alice_uri), &ctx.access_token(&bob)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Access denied - must be owner or have required role");

    let req = bearer(test::TestRequest::get().uri(&alice_uri), &ctx.access_token(&admin)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Admin passes the guard for a missing account; the handler answers 404
    let missing = format!("/api/v1/users/{}", Uuid::new_v4());
    let req = bearer(test::TestRequest::get().uri(&missing), &ctx.access_token(&admin)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = bearer(
        test::TestRequest::get().uri("/api/v1/users/not-a-uuid"),
        &ctx.access_token(&alice),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_user_cannot_read_ngo_with_same_id() {
    let ctx = context();
    let ngo = ctx.seed(EntityType::Ngo, "ngo@example.org").await;
    let mut user = ctx.seed(EntityType::User, "vol@example.org").await;
    user.id = ngo.id;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let uri = format!("/api/v1/ngos/{}", ngo.id);
    let req = bearer(test::TestRequest::get().uri(&uri), &ctx.access_token(&user)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = bearer(test::TestRequest::get().uri(&uri), &ctx.access_token(&ngo)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_routes_reject_non_admins() {
    let ctx = context();
    let user = ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = bearer(
        post_json(
            "/api/v1/auth/ban",
            json!({ "userId": user.id, "entityType": "user" }),
        ),
        &ctx.access_token(&user),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Insufficient permissions");

    let req = bearer(
        test::TestRequest::get().uri("/api/v1/auth/security/report"),
        &ctx.access_token(&user),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/v1/auth/security/report").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_ban_revokes_sessions_and_blocks_login() {
    let ctx = context();
    let target = ctx.seed(EntityType::User, "vol@example.org").await;
    let admin = ctx.seed_admin("admin@example.org").await;

    let first = login(&ctx, "vol@example.org").await;
    login(&ctx, "vol@example.org").await;

    let app = test::init_service(create_app(ctx.state.clone())).await;
    let admin_token = ctx.access_token(&admin);

    let req = bearer(
        post_json(
            "/api/v1/auth/ban",
            json!({ "userId": target.id, "entityType": "user" }),
        ),
        &admin_token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["revokedTokens"], 2);

    let req = post_json(
        "/api/v1/auth/refresh",
        json!({ "refreshToken": first["refreshToken"] }),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = post_json(
        "/api/v1/auth/user/login",
        json!({ "email": "vol@example.org", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid email or password");

    let req = bearer(
        post_json(
            "/api/v1/auth/unban",
            json!({ "userId": target.id, "entityType": "user" }),
        ),
        &admin_token,
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    login(&ctx, "vol@example.org").await;
}

#[actix_web::test]
async fn test_ban_unknown_principal_is_not_found() {
    let ctx = context();
    let admin = ctx.seed_admin("admin@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = bearer(
        post_json(
            "/api/v1/auth/ban",
            json!({ "userId": Uuid::new_v4(), "entityType": "ngo" }),
        ),
        &ctx.access_token(&admin),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "NGO not found");
}

#[actix_web::test]
async fn test_security_report_for_admin() {
    let ctx = context();
    ctx.seed(EntityType::User, "vol@example.org").await;
    let admin = ctx.seed_admin("admin@example.org").await;
    login(&ctx, "vol@example.org").await;

    let app = test::init_service(create_app(ctx.state.clone())).await;
    let req = bearer(
        test::TestRequest::get().uri("/api/v1/auth/security/report"),
        &ctx.access_token(&admin),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tokenStats"]["activeRefreshTokens"], 1);
    assert_eq!(body["cleanupScheduled"], false);
    let recommendations = body["securityRecommendations"].as_array().unwrap();
    assert!(recommendations
        .iter()
        .any(|r| r == "Expired token cleanup is not running"));
}

async fn project_handler(context: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "viewer": context.id }))
}

#[actix_web::test]
async fn test_project_ownership_guard() {
    let ctx = context();
    let owner = ctx.seed(EntityType::Ngo, "owner@example.org").await;
    let other = ctx.seed(EntityType::Ngo, "other@example.org").await;
    let project_id = Uuid::new_v4();
    ctx.ownership.add_project(project_id, owner.id).await;

    let app = test::init_service(
        App::new().service(
            web::resource("/projects/{id}")
                .route(web::get().to(project_handler))
                .wrap(RequireOwnership::new(
                    ctx.state.resolver.clone(),
                    ResourceType::Project,
                ))
                .wrap(JwtAuth::new(ctx.state.signer())),
        ),
    )
    .await;

    let uri = format!("/projects/{}", project_id);

    let req = bearer(test::TestRequest::get().uri(&uri), &ctx.access_token(&owner)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["viewer"], owner.id.to_string());

    let req = bearer(test::TestRequest::get().uri(&uri), &ctx.access_token(&other)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let unknown = format!("/projects/{}", Uuid::new_v4());
    let req = bearer(test::TestRequest::get().uri(&unknown), &ctx.access_token(&owner)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    ctx.ownership.set_failing(true);
    let req = bearer(test::TestRequest::get().uri(&uri), &ctx.access_token(&owner)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INTERNAL_ERROR");
}

#[actix_web::test]
async fn test_entity_type_guard() {
    let ctx = context();
    let user = ctx.seed(EntityType::User, "vol@example.org").await;
    let ngo = ctx.seed(EntityType::Ngo, "ngo@example.org").await;

    let app = test::init_service(
        App::new().service(
            web::resource("/ngo-only")
                .route(web::get().to(|| async { HttpResponse::NoContent().finish() }))
                .wrap(RequireEntityType::new([EntityType::Ngo]))
                .wrap(JwtAuth::new(ctx.state.signer())),
        ),
    )
    .await;

    let req = bearer(test::TestRequest::get().uri("/ngo-only"), &ctx.access_token(&user)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Access denied for users");

    let req = bearer(test::TestRequest::get().uri("/ngo-only"), &ctx.access_token(&ngo)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}
