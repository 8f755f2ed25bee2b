//! External collaborators the compliance core consumes but does not implement.
//!
//! Image generation and background removal are blocking calls into third-party
//! inference services; async callers run them on a blocking thread. Their
//! failures surface as [`CreativeError`]s and are never turned into violations.

use uuid::Uuid;

use crate::error::{CreativeError, CreativeResult};
use crate::types::{Asset, Creative, CreativeFormat};

/// Produces a starting layout for a set of assets.
pub trait LayoutGenerator: Send + Sync {
    fn generate_layout(&self, assets: Vec<Asset>, format: CreativeFormat) -> Creative;
}

/// Text-to-image backend for creative backgrounds.
pub trait ImageGenerator: Send + Sync {
    /// Returns encoded image bytes (PNG).
    fn generate_background(&self, prompt: &str) -> CreativeResult<Vec<u8>>;

    /// Backend name for metrics/logging.
    fn provider_name(&self) -> &str;
}

/// Cuts the subject out of a product photo.
pub trait BackgroundRemover: Send + Sync {
    fn remove_background(&self, image: &[u8]) -> CreativeResult<Vec<u8>>;
}

/// Opaque key/value store for shared creatives.
pub trait CreativeStore: Send + Sync {
    fn persist(&self, blob: serde_json::Value) -> CreativeResult<Uuid>;
    fn load(&self, id: &Uuid) -> CreativeResult<serde_json::Value>;
}

/// Stand-in used when no image generation backend is configured.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredImageGenerator;

impl ImageGenerator for UnconfiguredImageGenerator {
    fn generate_background(&self, _prompt: &str) -> CreativeResult<Vec<u8>> {
        Err(CreativeError::CollaboratorUnavailable(
            "no image generation backend configured".to_string(),
        ))
    }

    fn provider_name(&self) -> &str {
        "unconfigured"
    }
}

/// Returns the input image untouched.
#[derive(Debug, Clone, Default)]
pub struct PassthroughBackgroundRemover;

impl BackgroundRemover for PassthroughBackgroundRemover {
    fn remove_background(&self, image: &[u8]) -> CreativeResult<Vec<u8>> {
        if image.is_empty() {
            return Err(CreativeError::Collaborator("empty image payload".to_string()));
        }
        Ok(image.to_vec())
    }
}
