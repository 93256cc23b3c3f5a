//! Request analytics endpoints
//!
//! These return the bare snapshot shapes rather than the `ApiResponse`
//! envelope, preserving the service's monitoring wire contract.

use crate::auth::AuthedUser;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::info;

/// Configure monitoring routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/monitoring")
            .route("/analytics", web::get().to(analytics))
            .route("/live", web::get().to(live))
            .route("/dashboard", web::get().to(dashboard))
            .route("/user-activity", web::get().to(user_activity))
            .route("/reset", web::post().to(reset)),
    );
}

/// Full analytics snapshot
async fn analytics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.analytics.analytics_report())
}

/// Real-time statistics
async fn live(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.analytics.live_stats())
}

/// Static description of the monitoring surface; no live data
async fn dashboard() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Finance Tracker - Monitoring Dashboard",
        "endpoints": {
            "analytics": "/api/monitoring/analytics",
            "liveStats": "/api/monitoring/live",
            "userActivity": "/api/monitoring/user-activity",
            "systemHealth": "/api/health"
        },
        "instructions": {
            "analytics": "Complete server analytics and user activity",
            "liveStats": "Real-time statistics updated every request",
            "userActivity": "Recent user activities per user",
            "systemHealth": "Server health and process status"
        }
    }))
}

/// Per-user activity rollup
async fn user_activity(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.analytics.user_activity_report())
}

/// Discard all accumulated analytics. Requires an authenticated caller.
async fn reset(user: AuthedUser, state: web::Data<AppState>) -> HttpResponse {
    state.analytics.reset();
    info!("Analytics reset by user: {}", user.id);

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Analytics reset successfully"
    }))
}
