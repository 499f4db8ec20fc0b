use serde::{Deserialize, Serialize};

/// Tunables for the canvas. Defaults match the desktop editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Initial visible viewport size, in view pixels.
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Multiplier applied to a node's local extent when the scene rect grows.
    pub growth_factor: f64,
    /// Scale step for one Ctrl+wheel notch.
    pub zoom_step: f64,
    /// Width of the clickable band around an edge line.
    pub edge_hit_width: f64,
    /// Gap between the label box and the node outline.
    pub label_padding: f64,
    /// Approximate glyph advance and line height used to size labels.
    pub char_width: f64,
    pub line_height: f64,
    /// Flattening tolerance when walking curved outlines.
    pub tolerance: f64,
    /// Rubber bands smaller than this (in either direction) select nothing.
    pub min_rubber_band: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            growth_factor: 2.0,
            zoom_step: 1.25,
            edge_hit_width: 12.0,
            label_padding: 10.0,
            char_width: 7.0,
            line_height: 16.0,
            tolerance: 0.1,
            min_rubber_band: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: CanvasConfig =
            serde_json::from_str(r#"{ "viewportWidth": 1280, "zoomStep": 1.5 }"#).unwrap();
        assert_eq!(
            config,
            CanvasConfig {
                viewport_width: 1280.0,
                zoom_step: 1.5,
                ..CanvasConfig::default()
            }
        );
    }
}
