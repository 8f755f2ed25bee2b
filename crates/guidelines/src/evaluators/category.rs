//! Category-specific mandatory elements.
//!
//! Category detection is a substring heuristic over packshot names. Assets whose
//! names do not encode the product category are not detected; that is a known
//! limitation of name-based classification, not something to patch around here.

use creative_core::types::{AssetRole, BrandKit, GuidelineViolation};

use crate::catalog::{rule_ids, CompiledCatalog};
use crate::normalize::CreativeView;

/// Alcohol packshots require the Drinkaware lock-up somewhere in the asset list.
pub fn alcohol_category(
    view: &CreativeView,
    catalog: &CompiledCatalog,
    _kit: Option<&BrandKit>,
) -> Vec<GuidelineViolation> {
    if !is_alcohol_product(view, &catalog.catalog().alcohol_keywords) {
        return Vec::new();
    }

    let marker = catalog.catalog().drinkaware_marker.to_lowercase();
    let has_drinkaware = view
        .images()
        .any(|(_, image)| image.name.to_lowercase().contains(&marker));
    if has_drinkaware {
        return Vec::new();
    }

    vec![GuidelineViolation::error(
        rule_ids::ALCOHOL_DRINKAWARE,
        "Alcohol products must include the Drinkaware lock-up.",
    )
    .with_suggestion("Add the Drinkaware asset to the creative.")]
}

fn is_alcohol_product(view: &CreativeView, keywords: &[String]) -> bool {
    view.images()
        .filter(|(_, image)| image.role == Some(AssetRole::Packshot))
        .any(|(_, image)| {
            let name = image.name.to_lowercase();
            keywords.iter().any(|k| name.contains(&k.to_lowercase()))
        })
}
