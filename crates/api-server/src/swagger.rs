//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Creative Pilot API",
        version = "0.1.0",
        description = "Validates ad creatives against retailer brand and legal guidelines.\n\nSupports structured and freeform editor payloads, format retargeting, template layouts and creative sharing.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Validation", description = "Guideline compliance for structured creatives and freeform canvases"),
        (name = "Layout", description = "Format retargeting and starting layouts"),
        (name = "Sharing", description = "Share and load creatives by id"),
        (name = "Assets", description = "Background generation and removal"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Validation
        crate::rest::validate_raw,
        crate::rest::validate_structured,
        // Layout
        crate::rest::resize_creative,
        crate::rest::generate_layout,
        // Sharing
        crate::rest::share_creative,
        crate::rest::load_creative,
        // Assets
        crate::rest::generate_background,
        crate::rest::remove_background,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Creative model
        creative_core::types::Creative,
        creative_core::types::CreativeFormat,
        creative_core::types::Asset,
        creative_core::types::AssetType,
        creative_core::types::AssetRole,
        creative_core::types::TextLayer,
        creative_core::types::BrandKit,
        creative_core::raw::RawCanvas,
        // Reports
        creative_core::types::Severity,
        creative_core::types::GuidelineViolation,
        creative_core::types::ComplianceReport,
        creative_core::types::RawValidationResult,
        // Request/response bodies
        crate::rest::RawValidateRequest,
        crate::rest::StructuredValidateRequest,
        crate::rest::ResizeRequest,
        crate::rest::LayoutRequest,
        crate::rest::GenerateBackgroundRequest,
        crate::rest::ShareResponse,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
