//! Layout helpers: auto-arrangement of text layers and the template layout
//! generator used when no generative backend is wired in.

use creative_core::collaborators::LayoutGenerator;
use creative_core::types::{Asset, Creative, CreativeFormat, TextLayer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::SafeZoneSpec;

/// Margin on every side, as a fraction of the canvas dimension.
const LAYOUT_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPattern {
    /// Headline, subhead and CTA stacked down the left column.
    #[default]
    ZPattern,
    /// Headline centred on the left third line, resting on the upper third line.
    RuleOfThirds,
}

/// Rearranges the text layers of a creative by type size.
///
/// The largest layer is treated as the headline, the next as the subhead and
/// the third as the CTA. Remaining layers keep their position.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoLayout;

impl AutoLayout {
    pub fn apply(creative: &Creative, pattern: LayoutPattern) -> Creative {
        let mut arranged = creative.clone();
        let (width, height) = (creative.format.width(), creative.format.height());
        let (margin_x, margin_y) = (width * LAYOUT_MARGIN, height * LAYOUT_MARGIN);
        let max_text_width = (width - margin_x * 2.0) * 0.5;

        let mut by_size: Vec<usize> = (0..arranged.text_layers.len()).collect();
        by_size.sort_by(|&a, &b| {
            arranged.text_layers[b]
                .font_size
                .total_cmp(&arranged.text_layers[a].font_size)
        });

        match pattern {
            LayoutPattern::ZPattern => {
                let mut top = margin_y + height * 0.2;
                for (rank, &index) in by_size.iter().take(3).enumerate() {
                    let layer = &mut arranged.text_layers[index];
                    layer.x = margin_x;
                    layer.y = top;
                    if rank < 2 {
                        fit_width(layer, max_text_width);
                        top += layer.height + if rank == 0 { 20.0 } else { 40.0 };
                    }
                }
            }
            LayoutPattern::RuleOfThirds => {
                if let Some(&index) = by_size.first() {
                    let layer = &mut arranged.text_layers[index];
                    layer.x = width / 3.0 - layer.width / 2.0;
                    layer.y = height / 3.0 - layer.height;
                }
            }
        }

        debug!(creative_id = %creative.id, ?pattern, layers = by_size.len(), "applied auto layout");
        arranged
    }
}

/// Shrinks a layer uniformly so it is at most `max_width` wide.
fn fit_width(layer: &mut TextLayer, max_width: f64) {
    if layer.width > max_width && layer.width > 0.0 {
        let factor = max_width / layer.width;
        layer.width = max_width;
        layer.height *= factor;
        layer.font_size *= factor;
    }
}

/// Deterministic starting layout: a headline and a CTA at their role anchors.
#[derive(Debug, Clone)]
pub struct TemplateLayoutGenerator {
    safe_zone: SafeZoneSpec,
}

impl Default for TemplateLayoutGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateLayoutGenerator {
    pub fn new() -> Self {
        Self::with_safe_zone(SafeZoneSpec::default())
    }

    pub fn with_safe_zone(safe_zone: SafeZoneSpec) -> Self {
        Self { safe_zone }
    }
}

impl LayoutGenerator for TemplateLayoutGenerator {
    fn generate_layout(&self, assets: Vec<Asset>, format: CreativeFormat) -> Creative {
        let (width, height) = (format.width(), format.height());
        let id = Uuid::new_v4().to_string();

        let mut headline_y = height * 0.1;
        if format.is_story() {
            headline_y = headline_y.max(self.safe_zone.top_px);
        }

        let mut headline =
            TextLayer::new(&format!("{id}-headline"), "headline", "Headline Goes Here")
                .at(width * 0.1, headline_y)
                .sized((width * 0.8).min(800.0), 60.0);
        headline.font_size = 48.0;

        let mut cta = TextLayer::new(&format!("{id}-cta"), "cta", "Shop Now")
            .at(width * 0.1, height * 0.8)
            .sized(200.0, 50.0);
        cta.font_size = 24.0;
        cta.color = "#FFFFFF".to_string();

        debug!(creative_id = %id, %format, assets = assets.len(), "generated template layout");

        let mut creative = Creative::new(&id, "Generated Layout", format)
            .with_text_layer(headline)
            .with_text_layer(cta);
        creative.assets = assets;
        creative
    }
}
