//! Registration and login endpoints

use crate::auth::AuthedUser;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me)),
    );
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserInfo,
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse> {
    let (account, token) = state.auth.register(&body.email, &body.password)?;
    info!("Registered user: {}", account.email);

    Ok(HttpResponse::Created().json(ApiResponse::success(TokenResponse {
        token,
        user: UserInfo {
            id: account.id,
            email: account.email,
        },
    })))
}

async fn login(state: web::Data<AppState>, body: web::Json<Credentials>) -> Result<HttpResponse> {
    let (account, token) = state.auth.login(&body.email, &body.password)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse {
        token,
        user: UserInfo {
            id: account.id,
            email: account.email,
        },
    })))
}

async fn me(user: AuthedUser, state: web::Data<AppState>) -> Result<HttpResponse> {
    let account = state
        .auth
        .find_user(&user.id)
        .ok_or_else(|| crate::utils::error::AppError::Unauthorized("Unknown user".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo {
        id: account.id,
        email: account.email,
    })))
}
