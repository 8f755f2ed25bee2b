//! Retargets a creative to another output format.

use creative_core::types::{Creative, CreativeFormat};
use tracing::debug;

/// Side of the square frame non-anchored layers are assumed to be laid out in.
const REFERENCE_SIDE: f64 = 1080.0;

/// Role-anchored retargeting.
///
/// `headline` layers are pinned 10% in from the top-left corner, `cta` layers
/// 10% in from the left and 80% down. Everything else scales proportionally
/// from a 1080x1080 reference frame. Nothing here checks safe zones, so the
/// result should be validated again.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeEngine;

impl ResizeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Return a copy of `creative` laid out for `target`. The input is never
    /// modified; a creative already in `target` comes back unchanged.
    pub fn resize(&self, creative: &Creative, target: CreativeFormat) -> Creative {
        let mut resized = creative.clone();
        if creative.format == target {
            debug!(creative_id = %creative.id, format = %target, "already in target format");
            return resized;
        }

        let (width, height) = (target.width(), target.height());
        let (scale_x, scale_y) = (width / REFERENCE_SIDE, height / REFERENCE_SIDE);
        for layer in &mut resized.text_layers {
            match layer.role.as_str() {
                "headline" => {
                    layer.x = width * 0.1;
                    layer.y = height * 0.1;
                }
                "cta" => {
                    layer.x = width * 0.1;
                    layer.y = height * 0.8;
                }
                _ => {
                    layer.x *= scale_x;
                    layer.y *= scale_y;
                }
            }
        }
        resized.format = target;

        debug!(
            creative_id = %creative.id,
            from = %creative.format,
            to = %target,
            layers = resized.text_layers.len(),
            "resized creative"
        );
        resized
    }
}
