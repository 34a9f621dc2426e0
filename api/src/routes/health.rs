use actix_web::HttpResponse;

use h2h_shared::types::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        "happy2help-api",
        env!("CARGO_PKG_VERSION"),
    ))
}
