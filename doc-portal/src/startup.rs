use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use portal_core::error::AppError;
use portal_core::middleware::{request_id_middleware, security_headers_middleware};
use portal_core::observability::REQUEST_ID_HEADER;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::handlers::{
    admin::{
        admin_dashboard_handler, approve_request_handler, reject_request_handler,
        requests_fragment,
    },
    app::{health_check, readiness_check},
    metrics::metrics,
    request_form::{index, submit_request_handler},
};
use crate::middleware::metrics_middleware;
use crate::services::BackendClient;
use crate::AppState;

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/request-document", post(submit_request_handler))
        .route("/admin", get(admin_dashboard_handler))
        .route("/admin/requests", get(requests_fragment))
        .route("/admin/requests/:id/approve", post(approve_request_handler))
        .route("/admin/requests/:id/reject", post(reject_request_handler))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span already sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Bound listener plus router, ready to serve.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let backend = Arc::new(BackendClient::new(settings.backend.clone())?);
        tracing::info!(backend = %backend.base_url(), "Document backend configured");

        let router = build_router(AppState::new(backend));

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!(port = self.port, "Starting doc-portal");
        axum::serve(self.listener, self.router).await
    }
}
