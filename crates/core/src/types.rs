//! Creative model evaluated by the guideline engine.
//!
//! A [`Creative`] is a complete ad layout for one [`CreativeFormat`]: an ordered
//! list of [`Asset`]s plus an ordered list of [`TextLayer`]s whose positions are
//! expressed in the pixel space of that format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::{CreativeError, CreativeResult};

// ─── Formats ────────────────────────────────────────────────────────────────

/// Closed set of output presets, serialized as their pixel dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(try_from = "String")]
pub enum CreativeFormat {
    #[serde(rename = "1080x1080")]
    Square,
    #[serde(rename = "1080x1920")]
    Story,
    #[serde(rename = "1200x628")]
    Landscape,
}

impl CreativeFormat {
    pub const ALL: [CreativeFormat; 3] = [
        CreativeFormat::Square,
        CreativeFormat::Story,
        CreativeFormat::Landscape,
    ];

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            CreativeFormat::Square => (1080, 1080),
            CreativeFormat::Story => (1080, 1920),
            CreativeFormat::Landscape => (1200, 628),
        }
    }

    pub fn width(&self) -> f64 {
        f64::from(self.dimensions().0)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.dimensions().1)
    }

    /// Vertical/story preset, the only one carrying platform safe zones.
    pub fn is_story(&self) -> bool {
        matches!(self, CreativeFormat::Story)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreativeFormat::Square => "1080x1080",
            CreativeFormat::Story => "1080x1920",
            CreativeFormat::Landscape => "1200x628",
        }
    }

    /// Recognise a preset from a canvas size, e.g. one reported by a freeform editor.
    pub fn from_dimensions(width: f64, height: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|format| {
            (format.width() - width).abs() < 0.5 && (format.height() - height).abs() < 0.5
        })
    }
}

impl fmt::Display for CreativeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreativeFormat {
    type Err = CreativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s.trim())
            .ok_or_else(|| CreativeError::UnknownFormat(s.to_string()))
    }
}

impl TryFrom<String> for CreativeFormat {
    type Error = CreativeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ─── Assets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Image,
    Video,
    Font,
}

/// What an asset is for inside the layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    Packshot,
    Background,
    Logo,
    ValueTile,
    Cta,
    Other,
}

impl FromStr for AssetRole {
    type Err = CreativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "packshot" => Ok(AssetRole::Packshot),
            "background" => Ok(AssetRole::Background),
            "logo" => Ok(AssetRole::Logo),
            "value_tile" => Ok(AssetRole::ValueTile),
            "cta" => Ok(AssetRole::Cta),
            "other" => Ok(AssetRole::Other),
            other => Err(CreativeError::MalformedCreative(format!(
                "unknown asset role '{other}'"
            ))),
        }
    }
}

/// A visual asset attached to a creative. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Asset {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub role: AssetRole,
    /// Display or file name. Category heuristics match against it.
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Asset {
    pub fn new(id: &str, name: &str, role: AssetRole) -> Self {
        Self {
            id: id.to_string(),
            url: format!("/static/{name}"),
            asset_type: AssetType::Image,
            role,
            name: name.to_string(),
            metadata: HashMap::new(),
        }
    }
}

// ─── Text layers ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextLayer {
    pub id: String,
    pub text: String,
    /// Free-form semantic role: headline, subhead, cta, tag, ...
    pub role: String,
    pub font_family: String,
    pub font_size: f64,
    /// Hex color, e.g. `#1A1A1A`.
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub z_index: i32,
}

impl TextLayer {
    /// A layer with neutral styling; callers adjust geometry as needed.
    pub fn new(id: &str, role: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            role: role.to_string(),
            font_family: "Inter".to_string(),
            font_size: 32.0,
            color: "#000000".to_string(),
            x: 100.0,
            y: 400.0,
            width: 600.0,
            height: 60.0,
            z_index: 10,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Bottom edge in canvas pixels.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

// ─── Creative ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Creative {
    pub id: String,
    pub name: String,
    pub format: CreativeFormat,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub text_layers: Vec<TextLayer>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Creative {
    pub fn new(id: &str, name: &str, format: CreativeFormat) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            format,
            assets: Vec::new(),
            text_layers: Vec::new(),
            background_color: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn with_text_layer(mut self, layer: TextLayer) -> Self {
        self.text_layers.push(layer);
        self
    }

    /// Reject geometry the structured path cannot evaluate meaningfully.
    pub fn check_geometry(&self) -> CreativeResult<()> {
        if self.id.trim().is_empty() {
            return Err(CreativeError::MalformedCreative(
                "creative 'id' must not be empty".to_string(),
            ));
        }
        for layer in &self.text_layers {
            if layer.id.trim().is_empty() {
                return Err(CreativeError::MalformedCreative(format!(
                    "creative '{}' has a text layer without an id",
                    self.id
                )));
            }
            let coords = [layer.x, layer.y, layer.width, layer.height, layer.font_size];
            if coords.iter().any(|v| !v.is_finite()) {
                return Err(CreativeError::MalformedCreative(format!(
                    "text layer '{}' has non-finite geometry",
                    layer.id
                )));
            }
            if layer.width < 0.0 || layer.height < 0.0 {
                return Err(CreativeError::MalformedCreative(format!(
                    "text layer '{}' has a negative size ({}x{})",
                    layer.id, layer.width, layer.height
                )));
            }
            if layer.font_size < 0.0 {
                return Err(CreativeError::MalformedCreative(format!(
                    "text layer '{}' has a negative font size",
                    layer.id
                )));
            }
        }
        Ok(())
    }
}

// ─── Brand kit ──────────────────────────────────────────────────────────────

/// Approved palette and typography of a brand. Comparisons ignore case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BrandKit {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<String>,
}

impl BrandKit {
    pub fn has_color(&self, hex: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(hex))
    }

    pub fn has_font(&self, family: &str) -> bool {
        self.fonts.iter().any(|f| f.eq_ignore_ascii_case(family))
    }
}

// ─── Violations and reports ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One detected infraction of a guideline rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct GuidelineViolation {
    /// Stable identifier, e.g. `ALCOHOL_DRINKAWARE`.
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub element_id: Option<String>,
    pub suggestion: Option<String>,
}

impl GuidelineViolation {
    pub fn new(rule_id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            message: message.into(),
            severity,
            element_id: None,
            suggestion: None,
        }
    }

    pub fn error(rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Error, message)
    }

    pub fn warning(rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Warning, message)
    }

    pub fn on_element(mut self, element_id: &str) -> Self {
        self.element_id = Some(element_id.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of the structured validation path. Regenerated on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceReport {
    /// 0..=100
    pub score: u32,
    pub violations: Vec<GuidelineViolation>,
    pub is_compliant: bool,
}

impl ComplianceReport {
    pub fn errors(&self) -> impl Iterator<Item = &GuidelineViolation> {
        self.violations.iter().filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &GuidelineViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a GuidelineViolation> {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }
}

/// Outcome of the freeform (raw editor payload) validation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RawValidationResult {
    pub score: u32,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub passed: bool,
}
