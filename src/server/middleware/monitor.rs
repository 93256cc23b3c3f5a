//! Request analytics middleware
//!
//! Wraps every request in the recorder's lifecycle hooks: `on_start` before
//! the inner service runs, `on_complete` when its future resolves. The
//! completion hook fires once per request in the common case; a connection
//! dropped mid-flight leaves the record permanently incomplete, which the
//! recorder tolerates. Recording failures never affect the wrapped request.

use crate::auth::AuthedUser;
use crate::monitoring::{AnalyticsCollector, RequestMeta, ResponseMeta};
use crate::server::state::AppState;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Counter key used for unrouted requests when the raw-path fallback is off
const UNMATCHED_ROUTE: &str = "(unmatched)";

/// Analytics middleware for Actix-web
pub struct MonitorMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MonitorMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = MonitorMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MonitorMiddlewareService { service }))
    }
}

/// Service implementation for the analytics middleware
pub struct MonitorMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for MonitorMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();

        let state = req.app_data::<web::Data<AppState>>().cloned();
        let analytics: Option<Arc<AnalyticsCollector>> =
            state.as_ref().map(|s| Arc::clone(&s.analytics));

        let record = analytics.as_ref().map(|collector| {
            let raw_path_fallback = state
                .as_ref()
                .map(|s| s.config.monitoring.raw_path_fallback)
                .unwrap_or(true);

            // Prefer the resolved route template; raw paths carry unbounded
            // cardinality into the endpoint counters
            let path = match req.match_pattern() {
                Some(pattern) => pattern,
                None if raw_path_fallback => req.path().to_string(),
                None => UNMATCHED_ROUTE.to_string(),
            };

            let remote_addr = req
                .connection_info()
                .realip_remote_addr()
                .map(|addr| addr.to_string());
            let user_agent = req
                .headers()
                .get(header::USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string());
            let user_id = req
                .extensions()
                .get::<AuthedUser>()
                .map(|user| user.id.clone());

            collector.on_start(RequestMeta {
                method: req.method().to_string(),
                path,
                remote_addr,
                user_agent,
                user_id,
            })
        });

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            if let (Some(collector), Some(record)) = (analytics, record) {
                let duration_ms = start_time.elapsed().as_millis() as u64;
                match &result {
                    Ok(res) => {
                        let response_size_bytes = res
                            .response()
                            .headers()
                            .get(header::CONTENT_LENGTH)
                            .and_then(|value| value.to_str().ok())
                            .and_then(|value| value.parse().ok());
                        collector.on_complete(
                            &record,
                            ResponseMeta {
                                status_code: res.status().as_u16(),
                                duration_ms,
                                response_size_bytes,
                                error_detail: None,
                            },
                        );
                    }
                    Err(err) => {
                        collector.on_complete(
                            &record,
                            ResponseMeta {
                                status_code: err.as_response_error().status_code().as_u16(),
                                duration_ms,
                                response_size_bytes: None,
                                error_detail: Some(err.to_string()),
                            },
                        );
                    }
                }
            }

            result
        })
    }
}
