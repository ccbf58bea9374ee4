//! Ambilight power, mode, topology and colors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbilightPowerValue {
    On,
    Off,
}

/// Body of `GET`/`POST ambilight/power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbilightPower {
    pub power: AmbilightPowerValue,
}

/// Number of layers and of pixels along each edge of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbilightTopology {
    pub layers: u32,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbilightModeValue {
    Internal,
    Manual,
    Expert,
}

/// Body of `GET`/`POST ambilight/mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbilightMode {
    pub current: AmbilightModeValue,
}

/// An RGB color; each component is limited to 0..=255 by its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmbilightColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AmbilightColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for AmbilightColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Per-pixel colors of one layer, keyed by pixel index ("0", "1", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbilightLayer {
    pub left: BTreeMap<String, AmbilightColor>,
    pub top: BTreeMap<String, AmbilightColor>,
    pub right: BTreeMap<String, AmbilightColor>,
    pub bottom: BTreeMap<String, AmbilightColor>,
}

/// Per-pixel colors of every layer, keyed by layer name ("layer1", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmbilightColors(pub BTreeMap<String, AmbilightLayer>);

impl AmbilightColors {
    pub fn layer(&self, name: &str) -> Option<&AmbilightLayer> {
        self.0.get(name)
    }
}

/// Body of `POST ambilight/cached`.
///
/// Either one color for every pixel, or colors for individual pixels. Pixels
/// left out keep their current color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmbilightColorSettings {
    Single(AmbilightColor),
    Pixels(AmbilightColors),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApiModel;
    use serde_json::json;

    #[test]
    fn test_color_component_out_of_range_is_rejected() {
        assert!(AmbilightColor::from_wire(&json!({"r": 256, "g": 0, "b": 0})).is_err());
        assert!(AmbilightColor::from_wire(&json!({"r": -1, "g": 0, "b": 0})).is_err());
    }

    #[test]
    fn test_single_color_settings_wire_shape() {
        let settings = AmbilightColorSettings::Single(AmbilightColor::new(0, 69, 255));
        assert_eq!(
            settings.to_wire().unwrap(),
            json!({"r": 0, "g": 69, "b": 255})
        );
    }

    #[test]
    fn test_pixel_settings_wire_shape() {
        let red = AmbilightColor::new(255, 0, 0);
        let mut layer = AmbilightLayer::default();
        layer.left.insert("0".to_string(), red);
        let colors = AmbilightColors(BTreeMap::from([("layer1".to_string(), layer)]));

        assert_eq!(
            AmbilightColorSettings::Pixels(colors).to_wire().unwrap(),
            json!({"layer1": {
                "left": {"0": {"r": 255, "g": 0, "b": 0}},
                "top": {},
                "right": {},
                "bottom": {},
            }})
        );
    }

    #[test]
    fn test_colors_from_wire_with_missing_sides() {
        let colors = AmbilightColors::from_wire(&json!({
            "layer1": {"top": {"0": {"r": 1, "g": 2, "b": 3}}}
        }))
        .unwrap();
        let layer = colors.layer("layer1").unwrap();
        assert!(layer.left.is_empty());
        assert_eq!(layer.top["0"], AmbilightColor::new(1, 2, 3));
    }

    #[test]
    fn test_mode_values_are_lowercase() {
        let mode = AmbilightMode::from_wire(&json!({"current": "manual"})).unwrap();
        assert_eq!(mode.current, AmbilightModeValue::Manual);
    }
}
