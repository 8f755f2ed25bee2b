//! Copy rules: forbidden claims, price callouts and legal tag text.

use creative_core::types::{BrandKit, GuidelineViolation};

use crate::catalog::{match_and_emit, rule_ids, CompiledCatalog};
use crate::normalize::CreativeView;

/// One `COPY_RESTRICTION` per forbidden-claim rule a text element matches.
/// Distinct matches on the same element are all reported.
pub fn copy_claims(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    _kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    view.texts()
        .flat_map(|(element, text)| match_and_emit(catalog.copy_rules(), &text.text, &element.id))
        .collect()
}

/// At most one `PRICE_CALLOUT` per text element, from the first price rule it matches.
pub fn price_callouts(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    _kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    view.texts()
        .filter_map(|(element, text)| {
            catalog
                .price_rules()
                .iter()
                .find(|rule| rule.is_match(&text.text))
                .map(|rule| rule.emit(&element.id))
        })
        .collect()
}

/// Text elements with role `tag` must carry one of the approved disclaimers verbatim.
pub fn tag_text(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    _kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    let allowed = &catalog.catalog().allowed_tags;
    view.texts()
        .filter(|(_, text)| text.role.as_deref() == Some("tag"))
        .filter(|(_, text)| !allowed.iter().any(|tag| *tag == text.text))
        .map(|(element, text)| {
            GuidelineViolation::error(
                rule_ids::TAG_TEXT,
                format!("Invalid tag text: '{}'", text.text),
            )
            .on_element(&element.id)
            .with_suggestion(format!("Use one of: {}", allowed.join(", ")))
        })
        .collect()
}
