//! Zoom and pan state for one open map view.
//!
//! The controller never touches layout or outline data; it only produces a [`ViewTransform`]
//! that is applied on top of the rendered scene.

use folio_core::config::ViewConfig;
use serde::{Deserialize, Serialize};

use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Point,
    pub dragging: bool,
    /// Pointer position minus pan at drag start.
    pub drag_anchor: Point,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
            dragging: false,
            drag_anchor: Point::default(),
        }
    }
}

/// `screen = scale * scene + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.scale * p.x + self.translate_x,
            self.scale * p.y + self.translate_y,
        )
    }

    pub fn invert(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translate_x == 0.0 && self.translate_y == 0.0
    }

    /// SVG `transform` attribute value with the same meaning.
    pub fn to_svg_transform(&self) -> String {
        let mut out = String::from("translate(");
        crate::svg::fmt_into(&mut out, self.translate_x);
        out.push(' ');
        crate::svg::fmt_into(&mut out, self.translate_y);
        out.push_str(") scale(");
        crate::svg::fmt_into(&mut out, self.scale);
        out.push(')');
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    state: ViewState,
    config: ViewConfig,
}

impl ViewController {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            state: ViewState::default(),
            config,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn zoom_in(&mut self) {
        self.scale_by(self.config.zoom_in_step);
    }

    pub fn zoom_out(&mut self) {
        self.scale_by(self.config.zoom_out_step);
    }

    /// One wheel tick: positive `delta_y` (scrolling down) zooms out, negative zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.scale_by(self.config.wheel_out_step);
        } else if delta_y < 0.0 {
            self.scale_by(self.config.wheel_in_step);
        }
    }

    pub fn reset_view(&mut self) {
        self.state = ViewState::default();
    }

    pub fn begin_pan(&mut self, pointer: Point) {
        self.state.dragging = true;
        self.state.drag_anchor = pointer - self.state.pan;
    }

    /// Moves the view with the pointer. Ignored unless a pan is in progress.
    pub fn update_pan(&mut self, pointer: Point) {
        if !self.state.dragging {
            return;
        }
        self.state.pan = pointer - self.state.drag_anchor;
    }

    pub fn end_pan(&mut self) {
        self.state.dragging = false;
    }

    pub fn current_transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.state.zoom,
            translate_x: self.state.pan.x,
            translate_y: self.state.pan.y,
        }
    }

    fn scale_by(&mut self, factor: f64) {
        let zoom = (self.state.zoom * factor)
            .max(self.config.min_zoom)
            .min(self.config.max_zoom);
        tracing::trace!(from = self.state.zoom, to = zoom, "zoom");
        self.state.zoom = zoom;
    }
}
