//! Integration tests for the authentication endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use h2h_api::app::create_app;
use h2h_core::domain::entities::principal::EntityType;
use h2h_core::domain::entities::token::{MAX_IP_ADDRESS_CHARS, MAX_USER_AGENT_CHARS};
use h2h_core::repositories::RefreshTokenRepository;
use h2h_core::services::token::hash_secret;

use common::{bearer, context, post_json, PASSWORD, TRUSTED_PROXY};

#[actix_web::test]
async fn test_register_creates_redacted_principal() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = post_json(
        "/api/v1/auth/ngo/register",
        json!({ "email": "Helpers@Example.org", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["loginEmail"], "helpers@example.org");
    assert_eq!(body["role"], "ngo");
    assert_eq!(body["entityType"], "ngo");
    assert!(body.get("passwordHash").is_none());

    let req = post_json(
        "/api/v1/auth/ngo/register",
        json!({ "email": "helpers@example.org", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "NGO with this email already exists");
}

#[actix_web::test]
async fn test_register_rejects_bad_input() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let cases = [
        (json!({ "password": PASSWORD }), "Required fields missing: email, password"),
        (json!({ "email": "nope", "password": PASSWORD }), "Please provide a valid email address"),
        (
            json!({ "email": "a@example.org", "password": "short" }),
            "Password must be at least 10 characters long",
        ),
    ];

    for (body, message) in cases {
        let req = post_json("/api/v1/auth/user/register", body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], message);
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/user/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = post_json(
        "/api/v1/auth/admin/register",
        json!({ "email": "a@example.org", "password": PASSWORD }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_login_returns_tokens() {
    let ctx = context();
    let user = ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = post_json(
        "/api/v1/auth/user/login",
        json!({ "email": "vol@example.org", "password": PASSWORD }),
    )
    .insert_header(("user-agent", "integration-test"))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["principal"]["id"], user.id.to_string());
    assert!(body["principal"].get("passwordHash").is_none());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], "15m");
    assert!(body["accessToken"].as_str().unwrap().starts_with("ey"));

    let secret = body["refreshToken"].as_str().unwrap();
    let stored = ctx.tokens.find_by_hash(&hash_secret(secret)).await.unwrap().unwrap();
    assert_eq!(stored.subject_id, user.id);
    assert_eq!(stored.user_agent.as_deref(), Some("integration-test"));
}

#[actix_web::test]
async fn test_login_failures_share_one_message() {
    let ctx = context();
    ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let attempts = [
        ("/api/v1/auth/user/login", "vol@example.org", "wrong-password-123"),
        ("/api/v1/auth/user/login", "ghost@example.org", PASSWORD),
        ("/api/v1/auth/ngo/login", "vol@example.org", PASSWORD),
    ];

    for (uri, email, password) in attempts {
        let req = post_json(uri, json!({ "email": email, "password": password })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[actix_web::test]
async fn test_refresh_rotation_is_single_use() {
    let ctx = context();
    ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = post_json(
        "/api/v1/auth/user/login",
        json!({ "email": "vol@example.org", "password": PASSWORD }),
    )
    .to_request();
    let login: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let first = login["refreshToken"].as_str().unwrap().to_string();

    let req = post_json("/api/v1/auth/refresh", json!({ "refreshToken": first })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pair: Value = test::read_body_json(resp).await;
    assert_ne!(pair["refreshToken"], login["refreshToken"]);
    assert_eq!(pair["tokenType"], "Bearer");

    let req = post_json("/api/v1/auth/refresh", json!({ "refreshToken": first })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired refresh token");

    let req = post_json("/api/v1/auth/refresh", json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_logout_is_idempotent_and_revokes_access_token() {
    let ctx = context();
    let user = ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = post_json(
        "/api/v1/auth/user/login",
        json!({ "email": "vol@example.org", "password": PASSWORD }),
    )
    .to_request();
    let login: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let access = login["accessToken"].as_str().unwrap().to_string();
    let refresh = login["refreshToken"].as_str().unwrap().to_string();

    let profile = format!("/api/v1/users/{}", user.id);
    let req = bearer(test::TestRequest::get().uri(&profile), &access).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for _ in 0..2 {
        let req = bearer(
            post_json("/api/v1/auth/logout", json!({ "refreshToken": refresh })),
            &access,
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Logged out successfully");
    }

    let req = bearer(test::TestRequest::get().uri(&profile), &access).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = post_json("/api/v1/auth/refresh", json!({ "refreshToken": refresh })).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = post_json("/api/v1/auth/logout", json!({})).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_oversized_client_metadata_is_clamped_through_rotation() {
    let ctx = context();
    let user = ctx.seed(EntityType::User, "vol@example.org").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let agent = "A".repeat(2000);
    let forged = "9".repeat(200);

    let req = post_json(
        "/api/v1/auth/user/login",
        json!({ "email": "vol@example.org", "password": PASSWORD }),
    )
    .peer_addr("198.51.100.4:5000".parse().unwrap())
    .insert_header(("user-agent", agent.as_str()))
    .insert_header(("x-forwarded-for", forged.as_str()))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: Value = test::read_body_json(resp).await;

    let req = post_json(
        "/api/v1/auth/refresh",
        json!({ "refreshToken": login["refreshToken"] }),
    )
    .peer_addr(format!("{}:443", TRUSTED_PROXY).parse().unwrap())
    .insert_header(("user-agent", agent.as_str()))
    .insert_header(("x-forwarded-for", forged.as_str()))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pair: Value = test::read_body_json(resp).await;

    let first = ctx
        .tokens
        .find_by_hash(&hash_secret(login["refreshToken"].as_str().unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.ip_address.as_deref(), Some("198.51.100.4"));
    assert_eq!(first.user_agent.unwrap().len(), MAX_USER_AGENT_CHARS);

    let second = ctx
        .tokens
        .find_by_hash(&hash_secret(pair["refreshToken"].as_str().unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.subject_id, user.id);
    assert_eq!(second.ip_address.unwrap().len(), MAX_IP_ADDRESS_CHARS);
    assert_eq!(second.user_agent.unwrap().len(), MAX_USER_AGENT_CHARS);
}

#[actix_web::test]
async fn test_health_and_unknown_route() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
