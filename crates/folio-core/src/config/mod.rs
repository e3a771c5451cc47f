//! Tunable constants for the whole pipeline.
//!
//! Every section deserializes with `#[serde(default)]`, so a partial JSON document only
//! overrides the keys it names:
//!
//! ```
//! use folio_core::FolioConfig;
//!
//! let cfg = FolioConfig::from_json(r#"{ "layout": { "levelSpacingX": 300 } }"#).unwrap();
//! assert_eq!(cfg.layout.level_spacing_x, 300.0);
//! assert_eq!(cfg.layout.node_height, 44.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FolioConfig {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub view: ViewConfig,
    pub editor: EditorConfig,
    pub generate: GenerateConfig,
}

impl FolioConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }
}

/// Tidy-tree layout constants (all in drawing units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Horizontal distance between two depth ranks.
    pub level_spacing_x: f64,
    pub node_height: f64,
    /// Gap between two stacked sibling subtrees.
    pub vertical_spacing: f64,
    pub min_node_width: f64,
    pub max_node_width: f64,
    /// Horizontal padding added to the measured label width.
    pub label_padding: f64,
    /// Width of one display column of label text.
    pub char_width: f64,
    pub palette_size: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_spacing_x: 220.0,
            node_height: 44.0,
            vertical_spacing: 16.0,
            min_node_width: 100.0,
            max_node_width: 200.0,
            label_padding: 30.0,
            char_width: 8.0,
            palette_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub padding: f64,
    pub corner_radius: f64,
    pub label_max_chars: usize,
    pub ellipsis: String,
    pub root_font_size: f64,
    pub root_font_weight: u16,
    pub font_size: f64,
    pub font_weight: u16,
    pub font_family: String,
    pub label_color: String,
    pub node_opacity: f64,
    pub connector_width: f64,
    pub connector_opacity: f64,
    pub palette: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 60.0,
            corner_radius: 10.0,
            label_max_chars: 24,
            ellipsis: "...".to_string(),
            root_font_size: 15.0,
            root_font_weight: 700,
            font_size: 13.0,
            font_weight: 600,
            font_family: "'Nunito', sans-serif".to_string(),
            label_color: "#fff".to_string(),
            node_opacity: 0.9,
            connector_width: 2.5,
            connector_opacity: 0.6,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#FF8C42", "#98D8C8",
    "#A8E6CF", "#FFD93D",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_in_step: f64,
    pub zoom_out_step: f64,
    pub wheel_in_step: f64,
    pub wheel_out_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.2,
            max_zoom: 3.0,
            zoom_in_step: 1.2,
            zoom_out_step: 0.8,
            wheel_in_step: 1.1,
            wheel_out_step: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateConfig {
    /// Highlights longer than this (in characters) are cut when written into an outline.
    pub highlight_max_chars: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            highlight_max_chars: 80,
        }
    }
}
