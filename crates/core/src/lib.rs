pub mod collaborators;
pub mod config;
pub mod error;
pub mod raw;
pub mod types;

pub use config::AppConfig;
pub use error::{CreativeError, CreativeResult};
pub use raw::{RawCanvas, RawObject};
pub use types::{
    Asset, AssetRole, AssetType, BrandKit, ComplianceReport, Creative, CreativeFormat,
    GuidelineViolation, RawValidationResult, Severity, TextLayer,
};
