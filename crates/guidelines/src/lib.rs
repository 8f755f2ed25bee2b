//! Creative compliance engine: evaluates ad creatives against a retailer's
//! declarative guideline rules and reports a score with explainable violations.
//!
//! The crate performs no I/O beyond optionally reading a rule catalog file and
//! holds no shared mutable state; every validation is a pure computation.

pub mod catalog;
pub mod engine;
pub mod evaluators;
pub mod layout;
pub mod normalize;
pub mod resize;

pub use catalog::{rule_ids, CompiledCatalog, PatternRule, RuleCatalog};
pub use engine::GuidelineEngine;
pub use layout::{AutoLayout, LayoutPattern, TemplateLayoutGenerator};
pub use normalize::CreativeView;
pub use resize::ResizeEngine;
