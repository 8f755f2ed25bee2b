//! Brand-kit conformance: palette, typography, margins and type size.

use creative_core::types::{BrandKit, GuidelineViolation};

use crate::catalog::{rule_ids, CompiledCatalog};
use crate::normalize::CreativeView;

/// Colors and fonts used by the creative that the kit does not approve.
///
/// Emits at most one `BRAND_COLOR` and one `BRAND_FONT` warning, each listing
/// up to `max_listed` offenders. Neutral black/white never counts. Without a
/// kit there is nothing to conform to and nothing is reported.
pub fn brand_palette(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    let Some(kit) = kit else {
        return Vec::new();
    };
    let thresholds = &catalog.catalog().brand;
    let mut violations = Vec::new();

    let off_palette: Vec<String> = view
        .distinct_fills()
        .into_iter()
        .filter(|color| !kit.has_color(color))
        .filter(|color| {
            !thresholds
                .neutral_colors
                .iter()
                .any(|n| n.eq_ignore_ascii_case(color))
        })
        .collect();
    if !off_palette.is_empty() {
        violations.push(
            GuidelineViolation::warning(
                rule_ids::BRAND_COLOR,
                format!(
                    "Non-brand colors used: {}...",
                    listed(&off_palette, thresholds.max_listed)
                ),
            )
            .with_suggestion(format!("Use approved colors: {}", kit.colors.join(", "))),
        );
    }

    let off_typography: Vec<String> = view
        .distinct_fonts()
        .into_iter()
        .filter(|font| !kit.has_font(font))
        .collect();
    if !off_typography.is_empty() {
        violations.push(
            GuidelineViolation::warning(
                rule_ids::BRAND_FONT,
                format!(
                    "Non-brand fonts used: {}...",
                    listed(&off_typography, thresholds.max_listed)
                ),
            )
            .with_suggestion(format!("Use approved fonts: {}", kit.fonts.join(", "))),
        );
    }

    violations
}

/// Margin and minimum type size checks for every text element.
///
/// The anchor point (left, top) must sit inside a margin of `margin_ratio` of
/// the canvas on all four sides; rendered size must reach `min_text_px`.
pub fn layout_rules(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    _kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    let thresholds = &catalog.catalog().brand;
    let margin_x = view.width * thresholds.margin_ratio;
    let margin_y = view.height * thresholds.margin_ratio;
    let mut violations = Vec::new();

    for (element, text) in view.texts() {
        let (left, top) = (element.geometry.left, element.geometry.top);
        if left < margin_x
            || left > view.width - margin_x
            || top < margin_y
            || top > view.height - margin_y
        {
            let preview: String = text.text.chars().take(10).collect();
            violations.push(
                GuidelineViolation::warning(
                    rule_ids::SAFE_MARGIN,
                    format!("Text element '{preview}...' is outside safe margins"),
                )
                .on_element(&element.id),
            );
        }

        if text.effective_font_size() < thresholds.min_text_px {
            violations.push(
                GuidelineViolation::warning(
                    rule_ids::MIN_TEXT_SIZE,
                    format!(
                        "Text size is too small (below {}px)",
                        thresholds.min_text_px
                    ),
                )
                .on_element(&element.id),
            );
        }
    }

    violations
}

fn listed(values: &[String], max: usize) -> String {
    values
        .iter()
        .take(max)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
