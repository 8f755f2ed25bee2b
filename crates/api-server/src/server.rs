//! API server: REST routes, OpenAPI docs and the Prometheus exporter.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;

use axum::routing::{get, post};
use axum::Router;
use creative_core::config::AppConfig;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;

pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Full application router over `state`.
    pub fn router(state: AppState) -> Router {
        let creative = Router::new()
            .route("/validate", post(rest::validate_raw))
            .route("/validate/structured", post(rest::validate_structured))
            .route("/resize", post(rest::resize_creative))
            .route("/layout", post(rest::generate_layout))
            .route("/share", post(rest::share_creative))
            .route("/load/:id", get(rest::load_creative))
            .route("/generate-bg", post(rest::generate_background))
            .route("/remove-bg", post(rest::remove_background));

        Router::new()
            .nest("/api/creative", creative)
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP REST server. Readiness flips once the listener is bound.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = Self::router(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.state.ready.store(true, Ordering::Release);
        info!(addr = %addr, node_id = %self.config.node_id, "Starting HTTP server");

        axum::serve(listener, app).await?;
        Ok(())
    }

    /// Start the Prometheus exporter on a separate port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
