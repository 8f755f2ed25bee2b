//! Normalized view of a creative.
//!
//! Both inputs, a typed [`Creative`] and a freeform [`RawCanvas`], are lowered
//! into a [`CreativeView`]: canvas size, recognised preset (if any), and a flat
//! list of elements with role-agnostic geometry plus kind-specific fields.
//! Evaluators only ever see this view.

use creative_core::raw::{RawCanvas, RawObject, DEFAULT_FONT_SIZE, DEFAULT_SCALE};
use creative_core::types::{AssetRole, Creative, CreativeFormat};
use tracing::warn;

/// Axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub text: String,
    pub role: Option<String>,
    pub font_family: Option<String>,
    pub font_size: f64,
    pub scale_y: f64,
    pub fill: Option<String>,
}

impl TextElement {
    /// Rendered type size: declared size times vertical scale.
    pub fn effective_font_size(&self) -> f64 {
        self.font_size * self.scale_y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub name: String,
    pub src: Option<String>,
    pub role: Option<AssetRole>,
    pub font_family: Option<String>,
}

/// Anything that is neither text nor an image. Carried for its fill and font.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeElement {
    pub kind: String,
    pub fill: Option<String>,
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasElement {
    pub id: String,
    pub geometry: Geometry,
    pub kind: ElementKind,
}

impl CanvasElement {
    pub fn fill(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(text) => text.fill.as_deref(),
            ElementKind::Shape(shape) => shape.fill.as_deref(),
            ElementKind::Image(_) => None,
        }
    }

    pub fn font_family(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(text) => text.font_family.as_deref(),
            ElementKind::Shape(shape) => shape.font_family.as_deref(),
            ElementKind::Image(image) => image.font_family.as_deref(),
        }
    }
}

/// What every evaluator operates on.
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeView {
    pub width: f64,
    pub height: f64,
    /// Preset the coordinates belong to, if the canvas matches one.
    pub format: Option<CreativeFormat>,
    pub elements: Vec<CanvasElement>,
}

impl CreativeView {
    pub fn from_creative(creative: &Creative) -> Self {
        let mut elements =
            Vec::with_capacity(creative.text_layers.len() + creative.assets.len() + 1);

        if let Some(color) = creative.background_color.as_deref().and_then(hex_color) {
            elements.push(CanvasElement {
                id: format!("{}-background", creative.id),
                geometry: Geometry {
                    left: 0.0,
                    top: 0.0,
                    width: creative.format.width(),
                    height: creative.format.height(),
                },
                kind: ElementKind::Shape(ShapeElement {
                    kind: "background".to_string(),
                    fill: Some(color),
                    font_family: None,
                }),
            });
        }

        elements.extend(creative.assets.iter().map(|asset| CanvasElement {
            id: asset.id.clone(),
            geometry: Geometry::default(),
            kind: ElementKind::Image(ImageElement {
                name: asset.name.clone(),
                src: Some(asset.url.clone()),
                role: Some(asset.role),
                font_family: None,
            }),
        }));

        elements.extend(creative.text_layers.iter().map(|layer| CanvasElement {
            id: layer.id.clone(),
            geometry: Geometry {
                left: layer.x,
                top: layer.y,
                width: layer.width,
                height: layer.height,
            },
            kind: ElementKind::Text(TextElement {
                text: layer.text.clone(),
                role: Some(layer.role.clone()),
                font_family: Some(layer.font_family.clone()).filter(|f| !f.is_empty()),
                font_size: layer.font_size,
                scale_y: DEFAULT_SCALE,
                fill: hex_color(&layer.color),
            }),
        }));

        Self {
            width: creative.format.width(),
            height: creative.format.height(),
            format: Some(creative.format),
            elements,
        }
    }

    /// Lower a freeform canvas. Entries that are not JSON objects are skipped;
    /// wrong-typed fields inside an object fall back to their defaults.
    pub fn from_raw(canvas: &RawCanvas) -> Self {
        let elements = canvas
            .objects
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<RawObject>(value.clone()) {
                    Ok(object) => Some(raw_element(index, object)),
                    Err(e) => {
                        warn!(index, error = %e, "skipping canvas entry that is not an object");
                        None
                    }
                }
            })
            .collect();

        Self {
            width: canvas.width,
            height: canvas.height,
            format: CreativeFormat::from_dimensions(canvas.width, canvas.height),
            elements,
        }
    }

    pub fn is_story(&self) -> bool {
        self.format.is_some_and(|f| f.is_story())
    }

    pub fn texts(&self) -> impl Iterator<Item = (&CanvasElement, &TextElement)> {
        self.elements.iter().filter_map(|element| match &element.kind {
            ElementKind::Text(text) => Some((element, text)),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = (&CanvasElement, &ImageElement)> {
        self.elements.iter().filter_map(|element| match &element.kind {
            ElementKind::Image(image) => Some((element, image)),
            _ => None,
        })
    }

    /// Distinct hex fills in first-seen order, compared case-insensitively.
    pub fn distinct_fills(&self) -> Vec<String> {
        distinct_ignore_case(self.elements.iter().filter_map(CanvasElement::fill))
    }

    /// Distinct font families declared by any element, in first-seen order.
    pub fn distinct_fonts(&self) -> Vec<String> {
        distinct_ignore_case(self.elements.iter().filter_map(CanvasElement::font_family))
    }
}

fn raw_element(index: usize, object: RawObject) -> CanvasElement {
    let id = object
        .id
        .clone()
        .or_else(|| object.name.clone())
        .unwrap_or_else(|| format!("object-{index}"));
    let scale_x = object.scale_x.unwrap_or(DEFAULT_SCALE);
    let scale_y = object.scale_y.unwrap_or(DEFAULT_SCALE);
    let geometry = Geometry {
        left: object.left.unwrap_or(0.0),
        top: object.top.unwrap_or(0.0),
        width: object.width.unwrap_or(0.0) * scale_x,
        height: object.height.unwrap_or(0.0) * scale_y,
    };
    let fill = object.hex_fill();
    let object_type = object.object_type.unwrap_or_default();

    let kind = match object_type.as_str() {
        "text" | "i-text" | "textbox" => ElementKind::Text(TextElement {
            text: object.text.unwrap_or_default(),
            role: object.role,
            font_family: object.font_family,
            font_size: object.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            scale_y,
            fill,
        }),
        "image" => ElementKind::Image(ImageElement {
            name: object
                .name
                .or_else(|| object.src.clone())
                .unwrap_or_default(),
            src: object.src,
            role: object.role.and_then(|r| r.parse().ok()),
            font_family: object.font_family,
        }),
        _ => ElementKind::Shape(ShapeElement {
            kind: object_type,
            fill,
            font_family: object.font_family,
        }),
    };

    CanvasElement { id, geometry, kind }
}

fn hex_color(value: &str) -> Option<String> {
    let trimmed = value.trim();
    trimmed.starts_with('#').then(|| trimmed.to_string())
}

fn distinct_ignore_case<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s.eq_ignore_ascii_case(value)) {
            seen.push(value.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use creative_core::types::{Asset, TextLayer};
    use serde_json::json;

    #[test]
    fn test_from_creative_lowers_layers_and_assets() {
        let creative = Creative::new("c1", "Demo", CreativeFormat::Story)
            .with_asset(Asset::new("a1", "Premium Vodka Bottle", AssetRole::Packshot))
            .with_text_layer(TextLayer::new("t1", "headline", "Hello").at(10.0, 20.0));

        let view = CreativeView::from_creative(&creative);
        assert_eq!(view.width, 1080.0);
        assert_eq!(view.height, 1920.0);
        assert!(view.is_story());

        let (element, text) = view.texts().next().unwrap();
        assert_eq!(element.id, "t1");
        assert_eq!(element.geometry.top, 20.0);
        assert_eq!(text.role.as_deref(), Some("headline"));

        let (_, image) = view.images().next().unwrap();
        assert_eq!(image.role, Some(AssetRole::Packshot));
    }

    #[test]
    fn test_background_color_counts_as_fill() {
        let mut creative = Creative::new("c1", "Demo", CreativeFormat::Square);
        creative.background_color = Some("#00539F".to_string());
        let view = CreativeView::from_creative(&creative);
        assert_eq!(view.distinct_fills(), vec!["#00539F".to_string()]);
    }

    #[test]
    fn test_from_raw_applies_defaults() {
        let canvas = RawCanvas::from_json(json!({
            "width": 1080,
            "height": 1920,
            "objects": [
                {"type": "i-text", "text": "Hi"},
                {"type": "rect", "fill": "#123456", "width": 10, "height": 10, "scaleX": 2},
                {"type": "image", "src": "/static/logo.png"}
            ]
        }));
        let view = CreativeView::from_raw(&canvas);
        assert_eq!(view.format, Some(CreativeFormat::Story));
        assert_eq!(view.elements.len(), 3);

        let (element, text) = view.texts().next().unwrap();
        assert_eq!(element.id, "object-0");
        assert_eq!(text.font_size, 16.0);
        assert_eq!(text.scale_y, 1.0);
        assert_eq!(element.geometry.left, 0.0);

        assert_eq!(view.elements[1].geometry.width, 20.0);
        assert_eq!(view.elements[1].fill(), Some("#123456"));

        let (_, image) = view.images().next().unwrap();
        assert_eq!(image.name, "/static/logo.png");
        assert_eq!(image.role, None);
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                42,
                null,
                {"type": "text", "text": "Kept", "id": "keep-me"}
            ]
        }));
        let view = CreativeView::from_raw(&canvas);
        assert_eq!(view.elements.len(), 1);
        assert_eq!(view.elements[0].id, "keep-me");
        assert_eq!(view.format, Some(CreativeFormat::Square));
    }

    #[test]
    fn test_bad_fields_keep_the_element() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                {"type": "text", "id": 7, "text": "Good", "fontSize": "huge", "left": "10"}
            ]
        }));
        let view = CreativeView::from_raw(&canvas);
        let (element, text) = view.texts().next().unwrap();
        assert_eq!(element.id, "7");
        assert_eq!(element.geometry.left, 10.0);
        assert_eq!(text.text, "Good");
        assert_eq!(text.font_size, 16.0);
    }

    #[test]
    fn test_unknown_type_is_passed_through_as_shape() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [{"type": "sparkle", "fill": "#abcdef", "text": "not text"}]
        }));
        let view = CreativeView::from_raw(&canvas);
        assert_eq!(view.texts().count(), 0);
        assert!(matches!(&view.elements[0].kind, ElementKind::Shape(s) if s.kind == "sparkle"));
    }

    #[test]
    fn test_distinct_fills_and_fonts_ignore_case() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                {"type": "text", "fill": "#FF0000", "fontFamily": "Comic Sans"},
                {"type": "text", "fill": "#ff0000", "fontFamily": "comic sans"},
                {"type": "text", "fill": "#00FF00", "fontFamily": "Arial"}
            ]
        }));
        let view = CreativeView::from_raw(&canvas);
        assert_eq!(view.distinct_fills(), vec!["#FF0000", "#00FF00"]);
        assert_eq!(view.distinct_fonts(), vec!["Comic Sans", "Arial"]);
    }

    #[test]
    fn test_fonts_on_non_text_objects_are_counted() {
        let canvas = RawCanvas::from_json(json!({
            "objects": [
                {"type": "text", "fontFamily": "Arial"},
                {"type": "group", "fontFamily": "Papyrus"},
                {"type": "image", "fontFamily": "Courier"},
                {"type": "rect"}
            ]
        }));
        let view = CreativeView::from_raw(&canvas);
        assert_eq!(view.distinct_fonts(), vec!["Arial", "Papyrus", "Courier"]);
    }
}
