use std::sync::Arc;

use creative_core::error::CreativeResult;
use creative_core::raw::RawCanvas;
use creative_core::types::{
    BrandKit, ComplianceReport, Creative, GuidelineViolation, RawValidationResult, Severity,
};
use tracing::{debug, info};

use crate::catalog::{rule_ids, CompiledCatalog, RuleCatalog, ScoringSpec};
use crate::evaluators::{EvaluatorEntry, BRAND_PALETTE, HARD_RULES, LAYOUT_RULES};
use crate::normalize::CreativeView;

const MAX_SCORE: u32 = 100;

/// Guideline engine: normalizes a creative, runs the applicable evaluators
/// and aggregates their violations into a report.
///
/// Holds only the compiled catalog, so cloning is cheap and concurrent calls
/// need no coordination.
#[derive(Debug, Clone)]
pub struct GuidelineEngine {
    catalog: Arc<CompiledCatalog>,
}

impl GuidelineEngine {
    /// Engine over the built-in rule catalog.
    pub fn new() -> CreativeResult<Self> {
        Self::with_catalog(&RuleCatalog::standard())
    }

    pub fn with_catalog(catalog: &RuleCatalog) -> CreativeResult<Self> {
        Ok(Self {
            catalog: Arc::new(catalog.compile()?),
        })
    }

    pub fn catalog(&self) -> &CompiledCatalog {
        &self.catalog
    }

    /// Structured path.
    ///
    /// 1. Rejects malformed geometry.
    /// 2. Runs the hard rules, then palette and layout checks if a kit is given.
    /// 3. Scores 100 minus a flat penalty per violation, floored at 0.
    ///
    /// The report is compliant iff no violation has error severity.
    pub fn validate(
        &self,
        creative: &Creative,
        brand_kit: Option<&BrandKit>,
    ) -> CreativeResult<ComplianceReport> {
        creative.check_geometry()?;
        let view = CreativeView::from_creative(creative);

        let mut evaluators: Vec<EvaluatorEntry> = HARD_RULES.to_vec();
        if brand_kit.is_some() {
            evaluators.push(BRAND_PALETTE);
            evaluators.push(LAYOUT_RULES);
        } else {
            debug!(creative_id = %creative.id, "no brand kit, skipping brand checks");
        }
        let violations = self.run(&view, &evaluators, brand_kit);

        let penalty = self.scoring().penalty_per_violation;
        let total_penalty = u32::try_from(violations.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(penalty);
        let score = MAX_SCORE.saturating_sub(total_penalty);
        let is_compliant = !violations.iter().any(GuidelineViolation::is_error);

        metrics::counter!("guidelines.validations", "path" => "structured").increment(1);
        metrics::histogram!("guidelines.score", "path" => "structured").record(f64::from(score));
        info!(
            creative_id = %creative.id,
            format = %creative.format,
            violations = violations.len(),
            score,
            is_compliant,
            "validated creative"
        );

        Ok(ComplianceReport {
            score,
            violations,
            is_compliant,
        })
    }

    /// Freeform path. Never fails: non-object entries were already dropped by
    /// the normalizer, and every unreadable field has a default.
    ///
    /// Warnings carry the fine-grained penalties; hard-rule errors fail the
    /// result without lowering the score. Both message lists are deduplicated
    /// by exact text, first occurrence wins.
    pub fn validate_raw(
        &self,
        canvas: &RawCanvas,
        brand_kit: Option<&BrandKit>,
    ) -> RawValidationResult {
        let view = CreativeView::from_raw(canvas);

        let mut evaluators: Vec<EvaluatorEntry> = HARD_RULES.to_vec();
        if brand_kit.is_some() {
            evaluators.push(BRAND_PALETTE);
        }
        evaluators.push(LAYOUT_RULES);
        let violations = self.run(&view, &evaluators, brand_kit);

        let scoring = self.scoring();
        let mut score = i64::from(MAX_SCORE);
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        for violation in violations {
            match violation.severity {
                Severity::Warning => {
                    score -= i64::from(raw_penalty(scoring, &violation.rule_id));
                    push_unique(&mut warnings, violation.message);
                }
                Severity::Error => push_unique(&mut errors, violation.message),
                Severity::Info => {}
            }
        }
        let score = u32::try_from(score.clamp(0, i64::from(MAX_SCORE))).unwrap_or(0);
        let passed = score >= scoring.pass_score && errors.is_empty();

        metrics::counter!("guidelines.validations", "path" => "raw").increment(1);
        metrics::histogram!("guidelines.score", "path" => "raw").record(f64::from(score));
        info!(
            objects = view.elements.len(),
            warnings = warnings.len(),
            errors = errors.len(),
            score,
            passed,
            "validated raw canvas"
        );

        RawValidationResult {
            score,
            warnings,
            errors,
            passed,
        }
    }

    /// Independent structured reports, in input order.
    pub fn validate_many(
        &self,
        creatives: &[Creative],
        brand_kit: Option<&BrandKit>,
    ) -> Vec<CreativeResult<ComplianceReport>> {
        creatives
            .iter()
            .map(|creative| self.validate(creative, brand_kit))
            .collect()
    }

    fn scoring(&self) -> &ScoringSpec {
        &self.catalog.catalog().scoring
    }

    fn run(
        &self,
        view: &CreativeView,
        evaluators: &[EvaluatorEntry],
        brand_kit: Option<&BrandKit>,
    ) -> Vec<GuidelineViolation> {
        let mut violations = Vec::new();
        for entry in evaluators {
            let found = (entry.run)(view, &self.catalog, brand_kit);
            debug!(evaluator = entry.name, violations = found.len(), "evaluator finished");
            for violation in &found {
                metrics::counter!("guidelines.violations", "rule_id" => violation.rule_id.clone())
                    .increment(1);
            }
            violations.extend(found);
        }
        violations
    }
}

fn raw_penalty(scoring: &ScoringSpec, rule_id: &str) -> u32 {
    match rule_id {
        rule_ids::BRAND_COLOR => scoring.color_penalty,
        rule_ids::BRAND_FONT => scoring.font_penalty,
        rule_ids::SAFE_MARGIN => scoring.margin_penalty,
        rule_ids::MIN_TEXT_SIZE => scoring.text_size_penalty,
        _ => 0,
    }
}

fn push_unique(messages: &mut Vec<String>, message: String) {
    if !messages.contains(&message) {
        messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creative_core::error::CreativeError;
    use creative_core::types::{Asset, AssetRole, CreativeFormat, TextLayer};
    use serde_json::json;

    fn engine() -> GuidelineEngine {
        GuidelineEngine::new().unwrap()
    }

    fn kit() -> BrandKit {
        BrandKit {
            colors: vec!["#00539F".to_string()],
            fonts: vec!["Inter".to_string()],
        }
    }

    #[test]
    fn test_empty_creative_is_perfect() {
        let creative = Creative::new("c1", "Empty", CreativeFormat::Story);
        let report = engine().validate(&creative, None).unwrap();
        assert_eq!(report.score, 100);
        assert!(report.is_compliant);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_flat_penalty_and_no_dedup() {
        let creative = Creative::new("c1", "Claims", CreativeFormat::Square)
            .with_text_layer(TextLayer::new("t1", "body", "Guaranteed green"))
            .with_text_layer(TextLayer::new("t2", "body", "Guaranteed green"));
        let report = engine().validate(&creative, None).unwrap();
        // guarantee + green on each layer
        assert_eq!(report.violations.len(), 4);
        assert_eq!(report.score, 20);
        assert!(!report.is_compliant);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut creative = Creative::new("c1", "Many", CreativeFormat::Square);
        for i in 0..6 {
            creative = creative.with_text_layer(TextLayer::new(&format!("t{i}"), "body", "survey"));
        }
        let report = engine().validate(&creative, None).unwrap();
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_warnings_alone_stay_compliant() {
        let creative = Creative::new("c1", "Off brand", CreativeFormat::Square)
            .with_text_layer(TextLayer::new("t1", "headline", "Hello").at(200.0, 200.0))
            .with_text_layer({
                let mut layer = TextLayer::new("t2", "body", "World").at(200.0, 400.0);
                layer.color = "#FF00FF".to_string();
                layer
            });
        let report = engine().validate(&creative, Some(&kit())).unwrap();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, rule_ids::BRAND_COLOR);
        assert_eq!(report.score, 80);
        assert!(report.is_compliant);
    }

    #[test]
    fn test_layout_rules_need_kit_on_structured_path() {
        let creative = Creative::new("c1", "Edge", CreativeFormat::Square)
            .with_text_layer(TextLayer::new("t1", "headline", "Hello").at(0.0, 0.0));
        assert!(engine().validate(&creative, None).unwrap().violations.is_empty());

        let report = engine().validate(&creative, Some(&kit())).unwrap();
        assert_eq!(report.by_rule(rule_ids::SAFE_MARGIN).count(), 1);
    }

    #[test]
    fn test_malformed_creative_fails_fast() {
        let creative = Creative::new("c1", "Bad", CreativeFormat::Square)
            .with_text_layer(TextLayer::new("t1", "headline", "survey").sized(10.0, -5.0));
        assert!(matches!(
            engine().validate(&creative, None),
            Err(CreativeError::MalformedCreative(_))
        ));
    }

    #[test]
    fn test_validate_many_keeps_order() {
        let ok = Creative::new("ok", "ok", CreativeFormat::Square);
        let bad = Creative::new("", "bad", CreativeFormat::Square);
        let results = engine().validate_many(&[ok, bad], None);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_raw_penalties_and_dedup() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                {"type": "text", "text": "A", "left": 100, "top": 100,
                 "fill": "#123456", "fontFamily": "Inter"},
                {"type": "text", "text": "B", "left": 100, "top": 200,
                 "fill": "#654321", "fontFamily": "Inter"},
                {"type": "text", "text": "small", "left": 100, "top": 300, "fontSize": 8},
                {"type": "text", "text": "tiny", "left": 100, "top": 400, "fontSize": 8}
            ]
        }));
        let result = engine().validate_raw(&canvas, Some(&kit()));
        assert_eq!(
            result.warnings,
            vec![
                "Non-brand colors used: #123456, #654321...".to_string(),
                "Text size is too small (below 12px)".to_string(),
            ]
        );
        // 10 for colors + 5 per undersized element
        assert_eq!(result.score, 80);
        assert!(result.errors.is_empty());
        assert!(result.passed);
    }

    #[test]
    fn test_raw_errors_fail_without_penalty() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                {"type": "text", "text": "Now only £2", "left": 100, "top": 100, "fontSize": 30},
                {"type": "text", "text": "£3 off", "left": 100, "top": 200, "fontSize": 30}
            ]
        }));
        let result = engine().validate_raw(&canvas, None);
        assert_eq!(result.score, 100);
        assert_eq!(
            result.errors,
            vec!["Price callouts are not allowed in this format.".to_string()]
        );
        assert!(!result.passed);
    }

    #[test]
    fn test_raw_margins_checked_without_kit() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                {"type": "textbox", "text": "Hello world", "left": 0, "top": 0, "fontSize": 20}
            ]
        }));
        let result = engine().validate_raw(&canvas, None);
        assert_eq!(result.score, 95);
        assert_eq!(
            result.warnings,
            vec!["Text element 'Hello worl...' is outside safe margins".to_string()]
        );
    }

    #[test]
    fn test_raw_numeric_id_still_checks_copy() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [{
                "type": "text",
                "id": 7,
                "text": "Guaranteed 50% off",
                "left": "0",
                "top": 0,
                "fontSize": 8
            }]
        }));
        let result = engine().validate_raw(&canvas, None);
        assert_eq!(
            result.errors,
            vec![
                "Forbidden claim detected: 'guarantee'".to_string(),
                "Price callouts are not allowed in this format.".to_string(),
            ]
        );
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.score, 90);
        assert!(!result.passed);
    }

    #[test]
    fn test_raw_garbage_is_tolerated() {
        let canvas = RawCanvas::from_json(json!({"width": null, "objects": [null, 7, "x"]}));
        let result = engine().validate_raw(&canvas, None);
        assert_eq!(result.score, 100);
        assert!(result.passed);
    }

    #[test]
    fn test_raw_alcohol_uses_object_names() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [{"type": "image", "name": "Craft Beer Pack", "role": "packshot"}]
        }));
        let result = engine().validate_raw(&canvas, None);
        assert_eq!(result.errors.len(), 1);
        assert!(!result.passed);

        let with_lockup = Creative::new("c1", "Beer", CreativeFormat::Square)
            .with_asset(Asset::new("a1", "Craft Beer Pack", AssetRole::Packshot))
            .with_asset(Asset::new("a2", "Drinkaware Lockup", AssetRole::Logo));
        assert!(engine().validate(&with_lockup, None).unwrap().is_compliant);
    }

    #[test]
    fn test_custom_catalog() {
        let mut catalog = RuleCatalog::standard();
        catalog.scoring.penalty_per_violation = 50;
        let engine = GuidelineEngine::with_catalog(&catalog).unwrap();
        let creative = Creative::new("c1", "Survey", CreativeFormat::Square)
            .with_text_layer(TextLayer::new("t1", "body", "Take our survey"));
        assert_eq!(engine.validate(&creative, None).unwrap().score, 50);
    }
}
