//! Health check endpoint

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use chrono::Utc;

/// Configure the health route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    let live = state.analytics.live_stats();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "service": "fintrack-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": state.analytics.uptime().as_secs(),
        "memory": live.memory_usage,
        "requests": {
            "total": live.total_requests,
            "activeUsers": live.active_users
        },
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
    }))
}
