//! Freeform canvas payloads as emitted by a generic editor.
//!
//! Freeform input is inherently unreliable, so nothing here fails on content:
//! canvas dimensions fall back to 1080, a non-array `objects` becomes empty,
//! and individual objects are decoded one at a time by the normalizer. Within
//! an object a field of the wrong type is dropped on its own; only entries that
//! are not JSON objects at all fail to decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use utoipa::ToSchema;

pub const DEFAULT_CANVAS_SIDE: f64 = 1080.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_SCALE: f64 = 1.0;

/// A canvas snapshot: its size plus a heterogeneous object list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RawCanvas {
    #[serde(default = "default_side", deserialize_with = "lenient_side")]
    pub width: f64,
    #[serde(default = "default_side", deserialize_with = "lenient_side")]
    pub height: f64,
    #[serde(default, deserialize_with = "lenient_objects")]
    #[schema(value_type = Vec<Object>)]
    pub objects: Vec<serde_json::Value>,
}

impl Default for RawCanvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIDE,
            height: DEFAULT_CANVAS_SIDE,
            objects: Vec::new(),
        }
    }
}

impl RawCanvas {
    /// Accept any JSON value. A scalar yields an empty canvas.
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "raw canvas is not an object, evaluating an empty canvas");
            RawCanvas::default()
        })
    }
}

/// One editor object. Every field is optional; the normalizer supplies defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawObject {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub object_type: Option<String>,
    #[serde(deserialize_with = "lenient_label")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_label")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub left: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub top: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub scale_x: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub scale_y: Option<f64>,
    #[serde(deserialize_with = "lenient_label")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub font_family: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub font_size: Option<f64>,
    /// Editors put plain colors, gradients or patterns here.
    pub fill: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient")]
    pub src: Option<String>,
}

impl RawObject {
    /// The fill as a hex color, if it is one.
    pub fn hex_fill(&self) -> Option<String> {
        self.fill
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| s.starts_with('#'))
            .map(str::to_string)
    }
}

fn default_side() -> f64 {
    DEFAULT_CANVAS_SIDE
}

fn lenient_side<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(DEFAULT_CANVAS_SIDE))
}

/// Any value that does not decode as `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Strings as-is, numbers in their JSON spelling.
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Finite numbers, including numeric strings such as `"10"`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

fn lenient_objects<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items,
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canvas_defaults() {
        let canvas = RawCanvas::from_json(json!({}));
        assert_eq!(canvas.width, 1080.0);
        assert_eq!(canvas.height, 1080.0);
        assert!(canvas.objects.is_empty());
    }

    #[test]
    fn test_canvas_tolerates_garbage_fields() {
        let canvas = RawCanvas::from_json(json!({
            "width": "wide",
            "height": 1920,
            "objects": {"not": "a list"}
        }));
        assert_eq!(canvas.width, 1080.0);
        assert_eq!(canvas.height, 1920.0);
        assert!(canvas.objects.is_empty());

        let canvas = RawCanvas::from_json(json!("canvas"));
        assert_eq!(canvas, RawCanvas::default());
    }

    #[test]
    fn test_raw_object_camel_case_fields() {
        let obj: RawObject = serde_json::from_value(json!({
            "type": "i-text",
            "text": "Hello",
            "fontFamily": "Inter",
            "fontSize": 10,
            "scaleY": 2.0,
            "fill": "#FF0000"
        }))
        .unwrap();
        assert_eq!(obj.object_type.as_deref(), Some("i-text"));
        assert_eq!(obj.font_size, Some(10.0));
        assert_eq!(obj.scale_y, Some(2.0));
        assert_eq!(obj.hex_fill().as_deref(), Some("#FF0000"));
    }

    #[test]
    fn test_non_hex_fill_is_ignored() {
        let obj: RawObject = serde_json::from_value(json!({
            "type": "rect",
            "fill": {"type": "linear", "colorStops": []}
        }))
        .unwrap();
        assert!(obj.hex_fill().is_none());

        let obj: RawObject = serde_json::from_value(json!({"fill": "red"})).unwrap();
        assert!(obj.hex_fill().is_none());
    }

    #[test]
    fn test_wrong_typed_fields_are_dropped_individually() {
        let obj: RawObject = serde_json::from_value(json!({
            "type": "text",
            "id": 7,
            "name": ["layer"],
            "text": "Guaranteed 50% off",
            "left": "10",
            "top": "near the top",
            "fontSize": {"px": 8},
            "fontFamily": 3
        }))
        .unwrap();
        assert_eq!(obj.object_type.as_deref(), Some("text"));
        assert_eq!(obj.id.as_deref(), Some("7"));
        assert_eq!(obj.name, None);
        assert_eq!(obj.text.as_deref(), Some("Guaranteed 50% off"));
        assert_eq!(obj.left, Some(10.0));
        assert_eq!(obj.top, None);
        assert_eq!(obj.font_size, None);
        assert_eq!(obj.font_family, None);
    }

    #[test]
    fn test_non_object_entries_still_fail() {
        assert!(serde_json::from_value::<RawObject>(json!(42)).is_err());
        assert!(serde_json::from_value::<RawObject>(json!("text")).is_err());
    }
}
