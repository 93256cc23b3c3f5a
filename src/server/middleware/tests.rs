//! Middleware tests

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use actix_web::{test, web};

fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(Config::default()))
}

#[actix_web::test]
async fn test_monitor_records_every_request() {
    let state = state();
    let app = test::init_service(HttpServer::create_app(state.clone())).await;

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    assert_eq!(state.analytics.total_requests(), 3);
    let report = state.analytics.analytics_report();
    assert_eq!(report.top_endpoints[0].0, "GET /api/health");
    assert_eq!(report.top_endpoints[0].1, 3);
}

#[actix_web::test]
async fn test_monitor_records_failures() {
    let state = state();
    let app = test::init_service(HttpServer::create_app(state.clone())).await;

    let req = test::TestRequest::get().uri("/no/such/route").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let report = state.analytics.analytics_report();
    assert_eq!(report.recent_errors.len(), 1);
    assert_eq!(report.recent_errors[0].request.status_code, Some(404));
    assert_eq!(report.requests.error_rate, 1.0);
}

#[actix_web::test]
async fn test_auth_middleware_attaches_identity() {
    let state = state();
    let app = test::init_service(HttpServer::create_app(state.clone())).await;

    let (account, token) = state.auth.register("a@b.com", "password123").unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], account.id.as_str());

    // The recorded request carries the authenticated user id
    let report = state.analytics.analytics_report();
    assert_eq!(report.users.active_users_count, 1);
    assert_eq!(report.users.active_user_ids, vec![account.id]);
}

#[actix_web::test]
async fn test_invalid_token_stays_anonymous() {
    let state = state();
    let app = test::init_service(HttpServer::create_app(state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not-a-real-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    assert_eq!(state.analytics.active_user_count(), 0);
}

#[actix_web::test]
async fn test_missing_header_stays_anonymous() {
    let state = state();
    let app = test::init_service(HttpServer::create_app(state.clone())).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    test::call_service(&app, req).await;

    let report = state.analytics.analytics_report();
    assert_eq!(report.recent_requests[0].user_id, "anonymous");
}
