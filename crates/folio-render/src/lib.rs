#![forbid(unsafe_code)]

//! Layout, scene building and SVG output for folio mind maps.
//!
//! Pipeline: [`layout::layout_outline`] positions a parsed outline, [`scene::build_scene`]
//! turns the positioned tree into drawing instructions, and [`svg::render_svg`] serializes
//! them. [`view::ViewController`] owns the per-view zoom/pan state.

pub mod layout;
pub mod model;
pub mod palette;
pub mod scene;
pub mod svg;
pub mod text;
pub mod view;

use std::sync::Arc;

use folio_core::config::LayoutConfig;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};

pub use layout::layout_outline;
pub use model::{Bounds, MindMapLayout, Point};
pub use palette::Palette;
pub use scene::{Scene, build_scene};
pub use svg::{SvgRenderOptions, render_svg};
pub use view::{ViewController, ViewState, ViewTransform};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("invalid palette color: {color}")]
    InvalidColor { color: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl LayoutOptions {
    /// Deterministic measurement with the configured per-column advance.
    pub fn for_config(config: &LayoutConfig) -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::with_char_width(
                config.char_width,
            )),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions").finish_non_exhaustive()
    }
}
