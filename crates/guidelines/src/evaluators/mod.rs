//! Rule evaluators.
//!
//! Each evaluator is a pure function of the normalized view, the compiled
//! catalog and an optional brand kit. None depends on another's output, so
//! they can run in any order; the engine fixes the order only to keep report
//! output stable.

pub mod brand;
pub mod category;
pub mod copy;
pub mod placement;

use creative_core::types::{BrandKit, GuidelineViolation};

use crate::catalog::CompiledCatalog;
use crate::normalize::CreativeView;

pub type Evaluator =
    fn(&CreativeView, &CompiledCatalog, Option<&BrandKit>) -> Vec<GuidelineViolation>;

/// A named evaluator, for logging.
#[derive(Clone, Copy)]
pub struct EvaluatorEntry {
    pub name: &'static str,
    pub run: Evaluator,
}

/// Retailer and legal rules that apply regardless of brand kit.
pub const HARD_RULES: [EvaluatorEntry; 5] = [
    EvaluatorEntry {
        name: "alcohol_category",
        run: category::alcohol_category,
    },
    EvaluatorEntry {
        name: "copy_claims",
        run: copy::copy_claims,
    },
    EvaluatorEntry {
        name: "price_callouts",
        run: copy::price_callouts,
    },
    EvaluatorEntry {
        name: "tag_text",
        run: copy::tag_text,
    },
    EvaluatorEntry {
        name: "safe_zones",
        run: placement::safe_zones,
    },
];

pub const BRAND_PALETTE: EvaluatorEntry = EvaluatorEntry {
    name: "brand_palette",
    run: brand::brand_palette,
};

pub const LAYOUT_RULES: EvaluatorEntry = EvaluatorEntry {
    name: "layout_rules",
    run: brand::layout_rules,
};
