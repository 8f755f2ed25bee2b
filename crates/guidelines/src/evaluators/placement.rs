//! Story safe zones.

use creative_core::types::{BrandKit, GuidelineViolation};

use crate::catalog::{rule_ids, CompiledCatalog};
use crate::normalize::CreativeView;

/// Text must stay out of the platform UI bands of the story preset.
///
/// The top band spans `0..top_px`, the bottom band `height - bottom_px..height`.
/// A layer can hit both bands. Other formats carry no safe zones.
pub fn safe_zones(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    _kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    if !view.is_story() {
        return Vec::new();
    }

    let zone = &catalog.catalog().safe_zone;
    let bottom_limit = view.height - zone.bottom_px;
    let mut violations = Vec::new();

    for (element, _) in view.texts() {
        if element.geometry.top < zone.top_px {
            violations.push(
                GuidelineViolation::error(
                    rule_ids::SAFE_ZONE_TOP,
                    format!("Element overlaps with top safe zone ({}px).", zone.top_px),
                )
                .on_element(&element.id),
            );
        }
        if element.geometry.bottom() > bottom_limit {
            violations.push(
                GuidelineViolation::error(
                    rule_ids::SAFE_ZONE_BOTTOM,
                    format!("Element overlaps with bottom safe zone ({}px).", zone.bottom_px),
                )
                .on_element(&element.id),
            );
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use creative_core::types::{Creative, CreativeFormat, TextLayer};

    fn check(format: CreativeFormat, layer: TextLayer) -> Vec<GuidelineViolation> {
        let catalog = CompiledCatalog::standard().unwrap();
        let creative = Creative::new("c1", "Zones", format).with_text_layer(layer);
        safe_zones(&CreativeView::from_creative(&creative), &catalog, None)
    }

    #[test]
    fn test_top_band_on_story() {
        let violations = check(
            CreativeFormat::Story,
            TextLayer::new("t1", "headline", "Hi").at(100.0, 0.0).sized(400.0, 50.0),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, rule_ids::SAFE_ZONE_TOP);
        assert_eq!(violations[0].message, "Element overlaps with top safe zone (200px).");
    }

    #[test]
    fn test_no_zones_outside_story() {
        let layer = TextLayer::new("t1", "headline", "Hi").at(100.0, 0.0).sized(400.0, 50.0);
        assert!(check(CreativeFormat::Square, layer.clone()).is_empty());
        assert!(check(CreativeFormat::Landscape, layer).is_empty());
    }

    #[test]
    fn test_bottom_band_uses_bottom_edge() {
        // 1920 - 250 = 1670
        let inside = check(
            CreativeFormat::Story,
            TextLayer::new("t1", "cta", "Shop").at(100.0, 1600.0).sized(200.0, 70.0),
        );
        assert!(inside.is_empty());

        let over = check(
            CreativeFormat::Story,
            TextLayer::new("t1", "cta", "Shop").at(100.0, 1600.0).sized(200.0, 71.0),
        );
        assert_eq!(over.len(), 1);
        assert_eq!(over[0].rule_id, rule_ids::SAFE_ZONE_BOTTOM);
    }

    #[test]
    fn test_layer_spanning_both_bands() {
        let violations = check(
            CreativeFormat::Story,
            TextLayer::new("t1", "body", "Tall").at(0.0, 100.0).sized(1080.0, 1800.0),
        );
        let ids: Vec<_> = violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec![rule_ids::SAFE_ZONE_TOP, rule_ids::SAFE_ZONE_BOTTOM]);
    }
}
