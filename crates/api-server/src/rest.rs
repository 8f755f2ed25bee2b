//! REST handlers for creative validation, retargeting, layout and sharing,
//! plus operational endpoints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use creative_core::collaborators::{
    BackgroundRemover, CreativeStore, ImageGenerator, LayoutGenerator,
    PassthroughBackgroundRemover, UnconfiguredImageGenerator,
};
use creative_core::config::StoreConfig;
use creative_core::error::CreativeError;
use creative_core::raw::RawCanvas;
use creative_core::types::{
    Asset, BrandKit, ComplianceReport, Creative, CreativeFormat, RawValidationResult,
};
use creative_guidelines::{
    AutoLayout, GuidelineEngine, LayoutPattern, ResizeEngine, TemplateLayoutGenerator,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::InMemoryCreativeStore;

/// Maximum accepted length of a background prompt, in bytes.
const MAX_PROMPT_LEN: usize = 1000;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: GuidelineEngine,
    pub resizer: ResizeEngine,
    pub layout: Arc<dyn LayoutGenerator>,
    pub images: Arc<dyn ImageGenerator>,
    pub remover: Arc<dyn BackgroundRemover>,
    pub store: Arc<dyn CreativeStore>,
    /// Applied to freeform validations that carry no brand kit.
    pub default_brand_kit: Option<BrandKit>,
    pub node_id: String,
    pub start_time: Instant,
    pub ready: Arc<AtomicBool>,
}

impl AppState {
    /// State wired with the in-process collaborators: template layouts, an
    /// unconfigured image generator, passthrough background removal and the
    /// in-memory share store.
    pub fn new(engine: GuidelineEngine, node_id: &str, store: &StoreConfig) -> Self {
        Self {
            engine,
            resizer: ResizeEngine::new(),
            layout: Arc::new(TemplateLayoutGenerator::new()),
            images: Arc::new(UnconfiguredImageGenerator),
            remover: Arc::new(PassthroughBackgroundRemover),
            store: Arc::new(InMemoryCreativeStore::new(store)),
            default_brand_kit: None,
            node_id: node_id.to_string(),
            start_time: Instant::now(),
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_image_generator(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = images;
        self
    }

    pub fn with_default_brand_kit(mut self, kit: Option<BrandKit>) -> Self {
        self.default_brand_kit = kit;
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Map a core error onto an HTTP status. Collaborator failures keep their
/// own statuses and are never reported as validation outcomes.
fn api_error(err: &CreativeError) -> ApiError {
    let (status, code) = match err {
        CreativeError::MalformedCreative(_) | CreativeError::UnknownFormat(_) => {
            (StatusCode::BAD_REQUEST, "invalid_creative")
        }
        CreativeError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        CreativeError::PayloadTooLarge { .. } => {
            (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
        }
        CreativeError::CollaboratorUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "collaborator_unavailable")
        }
        CreativeError::Collaborator(_) => (StatusCode::BAD_GATEWAY, "collaborator_failed"),
        _ => {
            error!(error = %err, "Request processing failed");
            metrics::counter!("api.errors").increment(1);
            return reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal processing error",
            );
        }
    };
    if status.is_client_error() {
        metrics::counter!("api.validation_errors").increment(1);
    } else {
        metrics::counter!("api.errors").increment(1);
    }
    reject(status, code, err.to_string())
}

/// Unwrap a JSON body, reporting undecodable payloads as 400 with the usual
/// error body instead of axum's plain-text rejection.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        warn!(error = %rejection, "Request body rejected");
        metrics::counter!("api.validation_errors").increment(1);
        reject(
            StatusCode::BAD_REQUEST,
            "invalid_creative",
            rejection.body_text(),
        )
    })
}

fn task_failed(err: tokio::task::JoinError) -> ApiError {
    error!(error = %err, "Collaborator task panicked");
    metrics::counter!("api.errors").increment(1);
    reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Internal processing error",
    )
}

fn png(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

// ─── Validation ─────────────────────────────────────────────────────────────

/// POST /api/creative/validate — Validate a freeform editor canvas.
#[utoipa::path(
    post,
    path = "/api/creative/validate",
    tag = "Validation",
    request_body = RawValidateRequest,
    responses(
        (status = 200, description = "Freeform validation result", body = RawValidationResult),
        (status = 400, description = "Body is not JSON", body = ErrorResponse),
    )
)]
pub async fn validate_raw(
    State(state): State<AppState>,
    payload: Result<Json<RawValidateRequest>, JsonRejection>,
) -> Result<Json<RawValidationResult>, ApiError> {
    let request = json_body(payload)?;
    let canvas = RawCanvas::from_json(request.creative);
    let kit = request
        .brand_kit
        .as_ref()
        .or(state.default_brand_kit.as_ref());
    Ok(Json(state.engine.validate_raw(&canvas, kit)))
}

/// POST /api/creative/validate/structured — Validate a typed creative.
#[utoipa::path(
    post,
    path = "/api/creative/validate/structured",
    tag = "Validation",
    request_body = StructuredValidateRequest,
    responses(
        (status = 200, description = "Compliance report", body = ComplianceReport),
        (status = 400, description = "Malformed creative", body = ErrorResponse),
    )
)]
pub async fn validate_structured(
    State(state): State<AppState>,
    payload: Result<Json<StructuredValidateRequest>, JsonRejection>,
) -> Result<Json<ComplianceReport>, ApiError> {
    let request = json_body(payload)?;
    state
        .engine
        .validate(&request.creative, request.brand_kit.as_ref())
        .map(Json)
        .map_err(|e| {
            warn!(creative_id = %request.creative.id, error = %e, "Creative validation rejected");
            api_error(&e)
        })
}

// ─── Retargeting and layout ─────────────────────────────────────────────────

/// POST /api/creative/resize — Retarget a creative to another format.
#[utoipa::path(
    post,
    path = "/api/creative/resize",
    tag = "Layout",
    request_body = ResizeRequest,
    responses(
        (status = 200, description = "Resized creative", body = Creative),
        (status = 400, description = "Malformed creative or unknown format", body = ErrorResponse),
    )
)]
pub async fn resize_creative(
    State(state): State<AppState>,
    payload: Result<Json<ResizeRequest>, JsonRejection>,
) -> Result<Json<Creative>, ApiError> {
    let request = json_body(payload)?;
    Ok(Json(state.resizer.resize(&request.creative, request.format)))
}

/// POST /api/creative/layout — Generate a starting layout for a set of assets.
#[utoipa::path(
    post,
    path = "/api/creative/layout",
    tag = "Layout",
    request_body = LayoutRequest,
    responses(
        (status = 200, description = "Generated creative", body = Creative),
        (status = 400, description = "Unknown format or pattern", body = ErrorResponse),
    )
)]
pub async fn generate_layout(
    State(state): State<AppState>,
    payload: Result<Json<LayoutRequest>, JsonRejection>,
) -> Result<Json<Creative>, ApiError> {
    let request = json_body(payload)?;
    let mut creative = state.layout.generate_layout(request.assets, request.format);
    if let Some(pattern) = request.pattern {
        creative = AutoLayout::apply(&creative, pattern);
    }
    Ok(Json(creative))
}

// ─── Sharing ────────────────────────────────────────────────────────────────

/// POST /api/creative/share — Store a creative blob and return its share link.
#[utoipa::path(
    post,
    path = "/api/creative/share",
    tag = "Sharing",
    request_body(content = RawCanvas, description = "Creative JSON, typically an editor canvas"),
    responses(
        (status = 200, description = "Creative stored", body = ShareResponse),
        (status = 400, description = "Body is not JSON", body = ErrorResponse),
        (status = 413, description = "Creative too large", body = ErrorResponse),
    )
)]
pub async fn share_creative(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ShareResponse>, ApiError> {
    let blob = json_body(payload)?;
    let id = state.store.persist(blob).map_err(|e| {
        warn!(error = %e, "Share rejected");
        api_error(&e)
    })?;
    metrics::counter!("creatives.shared").increment(1);
    info!(%id, "Shared creative");
    Ok(Json(ShareResponse {
        id,
        url: format!("/share/{id}"),
    }))
}

/// GET /api/creative/load/:id — Load a shared creative blob.
#[utoipa::path(
    get,
    path = "/api/creative/load/{id}",
    tag = "Sharing",
    params(("id" = String, Path, description = "Share id returned by /share")),
    responses(
        (status = 200, description = "Stored creative JSON", body = RawCanvas),
        (status = 404, description = "Unknown share id", body = ErrorResponse),
    )
)]
pub async fn load_creative(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let blob = Uuid::parse_str(&id)
        .map_err(|_| CreativeError::NotFound(format!("shared creative {id}")))
        .and_then(|id| state.store.load(&id))
        .map_err(|e| api_error(&e))?;
    metrics::counter!("creatives.loaded").increment(1);
    Ok(Json(blob))
}

// ─── Image collaborators ────────────────────────────────────────────────────

/// POST /api/creative/generate-bg — Generate a background image from a prompt.
#[utoipa::path(
    post,
    path = "/api/creative/generate-bg",
    tag = "Assets",
    request_body = GenerateBackgroundRequest,
    responses(
        (status = 200, description = "PNG image", body = Vec<u8>, content_type = "image/png"),
        (status = 400, description = "Empty or oversized prompt", body = ErrorResponse),
        (status = 502, description = "Image backend failed", body = ErrorResponse),
        (status = 503, description = "No image backend configured", body = ErrorResponse),
    )
)]
pub async fn generate_background(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBackgroundRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;
    let prompt = request.prompt.trim().to_string();
    if prompt.is_empty() || prompt.len() > MAX_PROMPT_LEN {
        metrics::counter!("api.validation_errors").increment(1);
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "invalid_prompt",
            format!("prompt must be 1..={MAX_PROMPT_LEN} bytes"),
        ));
    }

    let images = state.images.clone();
    let provider = images.provider_name().to_string();
    let image = tokio::task::spawn_blocking(move || images.generate_background(&prompt))
        .await
        .map_err(task_failed)?
        .map_err(|e| {
            warn!(provider = %provider, error = %e, "Background generation failed");
            api_error(&e)
        })?;
    Ok(png(image))
}

/// POST /api/creative/remove-bg — Cut the subject out of an uploaded image.
#[utoipa::path(
    post,
    path = "/api/creative/remove-bg",
    tag = "Assets",
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Encoded product image"),
    responses(
        (status = 200, description = "Image without background", body = Vec<u8>, content_type = "image/png"),
        (status = 400, description = "Empty upload", body = ErrorResponse),
        (status = 502, description = "Background removal failed", body = ErrorResponse),
    )
)]
pub async fn remove_background(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    if body.is_empty() {
        metrics::counter!("api.validation_errors").increment(1);
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "empty_image",
            "request body must contain an image",
        ));
    }

    let remover = state.remover.clone();
    let image = tokio::task::spawn_blocking(move || remover.remove_background(&body))
        .await
        .map_err(task_failed)?
        .map_err(|e| {
            warn!(error = %e, "Background removal failed");
            api_error(&e)
        })?;
    Ok(png(image))
}

// ─── Operations ─────────────────────────────────────────────────────────────

/// GET /health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        rules_version: state.engine.catalog().catalog().version.clone(),
    })
}

/// GET /ready — Readiness probe. 200 once the HTTP listener is bound.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "Still starting"),
    )
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.ready.load(Ordering::Acquire) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses(
        (status = 200, description = "Process is alive"),
    )
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

// ─── Request/response bodies ────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawValidateRequest {
    /// Editor canvas JSON. Anything unreadable is evaluated as an empty canvas.
    #[serde(default)]
    #[schema(value_type = RawCanvas)]
    pub creative: serde_json::Value,
    #[serde(default)]
    pub brand_kit: Option<BrandKit>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredValidateRequest {
    pub creative: Creative,
    #[serde(default)]
    pub brand_kit: Option<BrandKit>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResizeRequest {
    pub creative: Creative,
    pub format: CreativeFormat,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LayoutRequest {
    #[serde(default)]
    pub assets: Vec<Asset>,
    pub format: CreativeFormat,
    /// `z_pattern` or `rule_of_thirds`; omitted keeps the template positions.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "z_pattern")]
    pub pattern: Option<LayoutPattern>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateBackgroundRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    pub id: Uuid,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub rules_version: String,
}
