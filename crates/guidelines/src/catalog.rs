//! Declarative rule catalog.
//!
//! Guideline rules are data: pattern records, allow-lists, keyword lists and
//! geometric thresholds. A [`RuleCatalog`] can be shipped as JSON and is
//! compiled once into a [`CompiledCatalog`] whose regexes the evaluators share.

use std::path::Path;

use creative_core::error::{CreativeError, CreativeResult};
use creative_core::types::{GuidelineViolation, Severity};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Stable rule identifiers reported in violations.
pub mod rule_ids {
    pub const COPY_RESTRICTION: &str = "COPY_RESTRICTION";
    pub const PRICE_CALLOUT: &str = "PRICE_CALLOUT";
    pub const TAG_TEXT: &str = "TAG_TEXT";
    pub const SAFE_ZONE_TOP: &str = "SAFE_ZONE_TOP";
    pub const SAFE_ZONE_BOTTOM: &str = "SAFE_ZONE_BOTTOM";
    pub const ALCOHOL_DRINKAWARE: &str = "ALCOHOL_DRINKAWARE";
    pub const BRAND_COLOR: &str = "BRAND_COLOR";
    pub const BRAND_FONT: &str = "BRAND_FONT";
    pub const SAFE_MARGIN: &str = "SAFE_MARGIN";
    pub const MIN_TEXT_SIZE: &str = "MIN_TEXT_SIZE";
}

pub const STANDARD_VERSION: &str = "2024.1";

// ---------------------------------------------------------------------------
// Rule records
// ---------------------------------------------------------------------------

/// A text pattern that emits one violation per matching element.
///
/// `message` and `suggestion` may reference the rule's label as `{label}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub rule_id: String,
    pub label: String,
    pub pattern: String,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl PatternRule {
    fn new(rule_id: &str, label: &str, pattern: &str, message: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            label: label.to_string(),
            pattern: pattern.to_string(),
            case_insensitive: true,
            severity: Severity::Error,
            message: message.to_string(),
            suggestion: None,
        }
    }

    fn suggesting(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }
}

/// Platform UI bands of the story preset, in pixels from each edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZoneSpec {
    pub top_px: f64,
    pub bottom_px: f64,
}

impl Default for SafeZoneSpec {
    fn default() -> Self {
        Self {
            top_px: 200.0,
            bottom_px: 250.0,
        }
    }
}

/// Brand-kit conformance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandThresholds {
    /// Margin on every side as a fraction of the canvas dimension.
    pub margin_ratio: f64,
    /// Floor for declared size times vertical scale.
    pub min_text_px: f64,
    /// Colors every brand may use.
    pub neutral_colors: Vec<String>,
    /// How many offenders a palette/typography message lists.
    pub max_listed: usize,
}

impl Default for BrandThresholds {
    fn default() -> Self {
        Self {
            margin_ratio: 0.05,
            min_text_px: 12.0,
            neutral_colors: vec![
                "#ffffff".to_string(),
                "#000000".to_string(),
                "#fff".to_string(),
                "#000".to_string(),
            ],
            max_listed: 3,
        }
    }
}

/// Score penalties for both validation paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSpec {
    /// Structured path: flat penalty per violation of any severity.
    pub penalty_per_violation: u32,
    pub color_penalty: u32,
    pub font_penalty: u32,
    pub margin_penalty: u32,
    pub text_size_penalty: u32,
    /// Raw path: minimum score to pass.
    pub pass_score: u32,
}

impl Default for ScoringSpec {
    fn default() -> Self {
        Self {
            penalty_per_violation: 20,
            color_penalty: 10,
            font_penalty: 10,
            margin_penalty: 5,
            text_size_penalty: 5,
            pass_score: 80,
        }
    }
}

/// The full, versioned set of guideline rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCatalog {
    pub version: String,
    pub copy_rules: Vec<PatternRule>,
    pub price_rules: Vec<PatternRule>,
    /// Approved legal disclaimers for `tag` layers, compared exactly.
    pub allowed_tags: Vec<String>,
    pub alcohol_keywords: Vec<String>,
    pub drinkaware_marker: String,
    pub safe_zone: SafeZoneSpec,
    pub brand: BrandThresholds,
    pub scoring: ScoringSpec,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleCatalog {
    /// The retailer rule set the engine ships with.
    pub fn standard() -> Self {
        let claim = |label: &str, pattern: &str| {
            PatternRule::new(
                rule_ids::COPY_RESTRICTION,
                label,
                pattern,
                "Forbidden claim detected: '{label}'",
            )
            .suggesting("Remove restricted claims (sustainability, guarantees, surveys).")
        };

        let copy_rules = vec![
            claim("survey", "survey"),
            claim("*", r"\*"),
            claim("guarantee", "guarantee"),
            claim("green", "green"),
            claim("sustainable", "sustainable"),
            claim("eco-friendly", "eco-friendly"),
            claim("charity", "charity"),
        ];

        let price_rules = vec![PatternRule::new(
            rule_ids::PRICE_CALLOUT,
            "price",
            r"£|\$|€|\b\d+p\b|%",
            "Price callouts are not allowed in this format.",
        )
        .case_sensitive()
        .suggesting("Remove prices, pence values and percentages from the copy.")];

        Self {
            version: STANDARD_VERSION.to_string(),
            copy_rules,
            price_rules,
            allowed_tags: vec![
                "Only at Tesco".to_string(),
                "Available at Tesco".to_string(),
                "Selected stores. While stocks last.".to_string(),
            ],
            alcohol_keywords: ["wine", "beer", "spirit", "vodka", "whisky", "gin", "alcohol"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            drinkaware_marker: "drinkaware".to_string(),
            safe_zone: SafeZoneSpec::default(),
            brand: BrandThresholds::default(),
            scoring: ScoringSpec::default(),
        }
    }

    /// Read a JSON catalog. Missing sections take their standard values.
    pub fn load(path: impl AsRef<Path>) -> CreativeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog: RuleCatalog = serde_json::from_str(&raw)?;
        info!(
            path = %path.as_ref().display(),
            version = %catalog.version,
            copy_rules = catalog.copy_rules.len(),
            "loaded rule catalog"
        );
        Ok(catalog)
    }

    /// Compile every pattern record. Fails on the first invalid pattern.
    pub fn compile(&self) -> CreativeResult<CompiledCatalog> {
        let copy = compile_rules(&self.copy_rules)?;
        let price = compile_rules(&self.price_rules)?;
        Ok(CompiledCatalog {
            catalog: self.clone(),
            copy,
            price,
        })
    }
}

// ---------------------------------------------------------------------------
// Compiled catalog and match-and-emit executor
// ---------------------------------------------------------------------------

/// A pattern record with its compiled regex.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: PatternRule,
    regex: Regex,
}

impl CompiledRule {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Build the violation this rule reports for `element_id`.
    pub fn emit(&self, element_id: &str) -> GuidelineViolation {
        let fill = |template: &str| template.replace("{label}", &self.rule.label);
        let mut violation = GuidelineViolation::new(
            &self.rule.rule_id,
            self.rule.severity,
            fill(&self.rule.message),
        )
        .on_element(element_id);
        if let Some(suggestion) = &self.rule.suggestion {
            violation = violation.with_suggestion(fill(suggestion));
        }
        violation
    }
}

/// Run every rule against `text`, emitting one violation per matching rule.
pub fn match_and_emit(
    rules: &[CompiledRule],
    text: &str,
    element_id: &str,
) -> Vec<GuidelineViolation> {
    rules
        .iter()
        .filter(|rule| rule.is_match(text))
        .map(|rule| rule.emit(element_id))
        .collect()
}

/// A catalog ready for evaluation. Immutable and shareable across threads.
#[derive(Debug, Clone)]
pub struct CompiledCatalog {
    catalog: RuleCatalog,
    copy: Vec<CompiledRule>,
    price: Vec<CompiledRule>,
}

impl CompiledCatalog {
    pub fn standard() -> CreativeResult<Self> {
        RuleCatalog::standard().compile()
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn copy_rules(&self) -> &[CompiledRule] {
        &self.copy
    }

    pub fn price_rules(&self) -> &[CompiledRule] {
        &self.price
    }
}

fn compile_rules(rules: &[PatternRule]) -> CreativeResult<Vec<CompiledRule>> {
    rules
        .iter()
        .map(|rule| {
            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(rule.case_insensitive)
                .build()
                .map_err(|e| CreativeError::InvalidRule {
                    rule_id: rule.rule_id.clone(),
                    reason: e.to_string(),
                })?;
            Ok(CompiledRule {
                rule: rule.clone(),
                regex,
            })
        })
        .collect()
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
