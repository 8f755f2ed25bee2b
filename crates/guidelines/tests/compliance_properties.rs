//! End-to-end properties of the guideline engine over both validation paths.

#[cfg(test)]
mod tests {
    use creative_core::raw::RawCanvas;
    use creative_core::types::{
        Asset, AssetRole, BrandKit, Creative, CreativeFormat, Severity, TextLayer,
    };
    use creative_guidelines::{rule_ids, GuidelineEngine, ResizeEngine};
    use serde_json::json;

    fn engine() -> GuidelineEngine {
        GuidelineEngine::new().expect("standard catalog compiles")
    }

    fn layer(id: &str, role: &str, text: &str) -> TextLayer {
        TextLayer::new(id, role, text).at(300.0, 600.0)
    }

    #[test]
    fn test_no_text_and_no_packshot_scores_100() {
        for format in CreativeFormat::ALL {
            let creative = Creative::new("c1", "Blank", format)
                .with_asset(Asset::new("bg", "Beach background", AssetRole::Background))
                .with_asset(Asset::new("logo", "Wine bar logo", AssetRole::Logo));
            let report = engine().validate(&creative, None).unwrap();
            assert_eq!(report.score, 100, "format {format}");
            assert!(report.is_compliant);
        }
    }

    #[test]
    fn test_guarantee_in_any_case_is_flagged_on_its_layer() {
        for text in ["guarantee", "GUARANTEED fresh", "Our GuArAnTeE to you"] {
            let creative = Creative::new("c1", "Claims", CreativeFormat::Square)
                .with_text_layer(layer("ok", "body", "Fresh bread"))
                .with_text_layer(layer("claim", "body", text));
            let report = engine().validate(&creative, None).unwrap();
            let hits: Vec<_> = report.by_rule(rule_ids::COPY_RESTRICTION).collect();
            assert_eq!(hits.len(), 1, "text {text:?}");
            assert_eq!(hits[0].element_id.as_deref(), Some("claim"));
            assert_eq!(hits[0].severity, Severity::Error);
        }
    }

    #[test]
    fn test_top_safe_zone_applies_to_story_only() {
        let top = TextLayer::new("t1", "body", "Hello").at(300.0, 0.0).sized(400.0, 50.0);

        let story = Creative::new("s", "Story", CreativeFormat::Story).with_text_layer(top.clone());
        let report = engine().validate(&story, None).unwrap();
        assert_eq!(report.by_rule(rule_ids::SAFE_ZONE_TOP).count(), 1);
        assert!(!report.is_compliant);

        let square = Creative::new("q", "Square", CreativeFormat::Square).with_text_layer(top);
        let report = engine().validate(&square, None).unwrap();
        assert_eq!(report.by_rule(rule_ids::SAFE_ZONE_TOP).count(), 0);
        assert_eq!(report.by_rule(rule_ids::SAFE_ZONE_BOTTOM).count(), 0);
    }

    #[test]
    fn test_bottom_safe_zone_uses_bottom_edge() {
        let creative = Creative::new("s", "Story", CreativeFormat::Story)
            .with_text_layer(
                TextLayer::new("fits", "body", "a")
                    .at(300.0, 1600.0)
                    .sized(300.0, 70.0),
            )
            .with_text_layer(
                TextLayer::new("over", "body", "b")
                    .at(300.0, 1600.0)
                    .sized(300.0, 71.0),
            );
        let report = engine().validate(&creative, None).unwrap();
        let hits: Vec<_> = report.by_rule(rule_ids::SAFE_ZONE_BOTTOM).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].element_id.as_deref(), Some("over"));
    }

    #[test]
    fn test_alcohol_packshot_needs_drinkaware() {
        let creative = Creative::new("c1", "Vodka", CreativeFormat::Square)
            .with_asset(Asset::new("p1", "Premium Vodka Bottle", AssetRole::Packshot));
        let report = engine().validate(&creative, None).unwrap();
        assert_eq!(report.by_rule(rule_ids::ALCOHOL_DRINKAWARE).count(), 1);
        assert_eq!(report.violations.len(), 1);

        let with_lockup =
            creative.with_asset(Asset::new("d1", "drinkaware_lockup", AssetRole::Logo));
        let report = engine().validate(&with_lockup, None).unwrap();
        assert_eq!(report.by_rule(rule_ids::ALCOHOL_DRINKAWARE).count(), 0);
        assert!(report.is_compliant);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let creative = Creative::new("c1", "Resize", CreativeFormat::Square)
            .with_text_layer(layer("h", "headline", "Big"))
            .with_text_layer(layer("c", "cta", "Go"))
            .with_text_layer(layer("b", "body", "Small print"));
        let resizer = ResizeEngine::new();
        for format in CreativeFormat::ALL {
            let once = resizer.resize(&creative, format);
            assert_eq!(resizer.resize(&once, format), once, "format {format}");
        }
    }

    #[test]
    fn test_score_never_increases_with_more_violations() {
        let offending = [
            "Take our survey",
            "Guaranteed results",
            "Only 99p",
            "Sustainable and green",
            "Charity partner*",
        ];
        let kit = BrandKit {
            colors: vec!["#00539F".to_string()],
            fonts: vec!["Inter".to_string()],
        };
        let mut creative = Creative::new("c1", "Grow", CreativeFormat::Story);
        let mut previous = engine().validate(&creative, Some(&kit)).unwrap().score;
        for (i, text) in offending.iter().enumerate() {
            creative = creative.with_text_layer(layer(&format!("t{i}"), "body", text));
            let score = engine().validate(&creative, Some(&kit)).unwrap().score;
            assert!(score <= previous, "{score} > {previous} after adding {text:?}");
            previous = score;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_tag_text_allow_list() {
        let approved = Creative::new("c1", "Tag", CreativeFormat::Square)
            .with_text_layer(layer("tag", "tag", "Only at Tesco"));
        let report = engine().validate(&approved, None).unwrap();
        assert_eq!(report.by_rule(rule_ids::TAG_TEXT).count(), 0);

        let rejected = Creative::new("c2", "Tag", CreativeFormat::Square)
            .with_text_layer(layer("tag", "tag", "Limited time only"));
        let report = engine().validate(&rejected, None).unwrap();
        let hits: Vec<_> = report.by_rule(rule_ids::TAG_TEXT).collect();
        assert_eq!(hits.len(), 1);
        let suggestion = hits[0].suggestion.as_deref().unwrap();
        for allowed in [
            "Only at Tesco",
            "Available at Tesco",
            "Selected stores. While stocks last.",
        ] {
            assert!(suggestion.contains(allowed), "{suggestion}");
        }
    }

    #[test]
    fn test_raw_non_brand_colors_reported_once() {
        let canvas = RawCanvas::from_json(json!({
            "width": 1080,
            "height": 1080,
            "objects": [
                {"type": "text", "text": "One", "left": 200, "top": 200,
                 "fontSize": 24, "fill": "#FF0000"},
                {"type": "text", "text": "Two", "left": 200, "top": 400,
                 "fontSize": 24, "fill": "#FF0000"}
            ]
        }));
        let kit = BrandKit {
            colors: vec!["#00539F".to_string()],
            fonts: Vec::new(),
        };
        let result = engine().validate_raw(&canvas, Some(&kit));
        let color_messages: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.starts_with("Non-brand colors used"))
            .collect();
        assert_eq!(color_messages.len(), 1);
        assert_eq!(result.score, 90);
        assert!(result.passed);
    }

    #[test]
    fn test_concurrent_validations_agree() {
        let engine = engine();
        let creative = Creative::new("c1", "Shared", CreativeFormat::Story)
            .with_text_layer(TextLayer::new("t1", "body", "survey").at(300.0, 0.0));
        let expected = engine.validate(&creative, None).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                let creative = creative.clone();
                std::thread::spawn(move || engine.validate(&creative, None).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
