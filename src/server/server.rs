//! HTTP server core implementation

use crate::config::Config;
use crate::server::middleware::{AuthMiddleware, MonitorMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{AppError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer as ActixHttpServer, web};
use tracing::info;

/// HTTP server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server from configuration
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating HTTP server");
        config.validate_all()?;

        Ok(Self {
            state: AppState::new(config),
        })
    }

    /// Create the Actix-web application
    pub(crate) fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors_config = &state.config.server.cors;
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header();

        if cors_config.enabled {
            if cors_config.allows_all_origins() {
                cors = cors.allow_any_origin();
            } else {
                for origin in &cors_config.allowed_origins {
                    cors = cors.allowed_origin(origin);
                }
            }
        }

        // Wrapping order: CORS outermost, then identity resolution, then the
        // analytics recorder, so recorded requests carry their user id
        App::new()
            .app_data(state)
            .wrap(MonitorMiddleware)
            .wrap(AuthMiddleware)
            .wrap(cors)
            .configure(routes::auth::configure_routes)
            .configure(routes::transactions::configure_routes)
            .configure(routes::monitoring::configure_routes)
            .configure(routes::health::configure_routes)
            .default_service(web::route().to(not_found))
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let server_config = self.state.config.server.clone();
        let bind_addr = format!("{}:{}", server_config.host, server_config.port);

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(server_config.effective_workers())
            .bind(&bind_addr)
            .map_err(|e| {
                AppError::Internal(format!("Failed to bind {}: {}", bind_addr, e))
            })?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Route not found"
    }))
}
