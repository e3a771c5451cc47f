//! Drawing instructions for a laid-out map.
//!
//! A [`Scene`] is renderer-neutral: absolute viewport coordinates (padding already applied),
//! connectors in draw order, then node boxes in draw order. Colors stay as palette indices.

use std::borrow::Cow;

use folio_core::LayoutNode;
use folio_core::config::RenderConfig;
use serde::Serialize;

use crate::model::{MindMapLayout, Point};

/// Labels sit one pixel below the geometric center to look optically centered.
const LABEL_BASELINE_NUDGE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Added to every layout coordinate to get a viewport coordinate.
    pub offset: Point,
}

/// Cubic curve from a parent's right-center to a child's left-center. Both control points sit
/// at `control_x`, each at the y of its own endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub from: Point,
    pub to: Point,
    pub control_x: f64,
    pub color_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub font_size: f64,
    pub font_weight: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub color_index: usize,
    pub depth: usize,
    /// Text drawn inside the box, possibly truncated.
    pub label: String,
    /// Set when `label` was truncated.
    pub full_label: Option<String>,
    pub label_anchor: Point,
    pub label_style: LabelStyle,
}

/// Scene-wide paint settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStyle {
    pub font_family: String,
    pub label_color: String,
    pub node_opacity: f64,
    pub connector_width: f64,
    pub connector_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub viewport: Viewport,
    pub connectors: Vec<Connector>,
    pub nodes: Vec<NodeShape>,
    pub style: SceneStyle,
}

/// Builds the scene for `layout`, or `None` when there is nothing to draw.
pub fn build_scene(layout: Option<&MindMapLayout>, config: &RenderConfig) -> Option<Scene> {
    let layout = layout?;
    let b = &layout.bounds;
    let pad = config.padding;

    let viewport = Viewport {
        width: b.width() + 2.0 * pad,
        height: b.height() + 2.0 * pad,
        offset: Point::new(pad - b.min_x, pad - b.min_y),
    };

    let count = layout.node_count();
    let mut scene = Scene {
        viewport,
        connectors: Vec::with_capacity(count.saturating_sub(1)),
        nodes: Vec::with_capacity(count),
        style: SceneStyle {
            font_family: config.font_family.clone(),
            label_color: config.label_color.clone(),
            node_opacity: config.node_opacity,
            connector_width: config.connector_width,
            connector_opacity: config.connector_opacity,
        },
    };

    push_connectors(&layout.root, viewport.offset, &mut scene.connectors);
    let offset = viewport.offset;
    layout
        .root
        .walk(&mut |n| scene.nodes.push(node_shape(n, offset, config)));

    tracing::debug!(
        nodes = scene.nodes.len(),
        connectors = scene.connectors.len(),
        width = viewport.width,
        height = viewport.height,
        "built scene"
    );
    Some(scene)
}

fn push_connectors(node: &LayoutNode, offset: Point, out: &mut Vec<Connector>) {
    for child in &node.children {
        let from = Point::new(node.right(), node.y) + offset;
        let to = Point::new(child.x, child.y) + offset;
        out.push(Connector {
            from,
            to,
            control_x: (from.x + to.x) / 2.0,
            color_index: child.color_index,
        });
        push_connectors(child, offset, out);
    }
}

fn node_shape(n: &LayoutNode, offset: Point, config: &RenderConfig) -> NodeShape {
    let label = truncate_label(&n.label, config.label_max_chars, &config.ellipsis);
    let full_label = match &label {
        Cow::Owned(_) => Some(n.label.clone()),
        Cow::Borrowed(_) => None,
    };
    let label_style = if n.is_root() {
        LabelStyle {
            font_size: config.root_font_size,
            font_weight: config.root_font_weight,
        }
    } else {
        LabelStyle {
            font_size: config.font_size,
            font_weight: config.font_weight,
        }
    };
    NodeShape {
        x: n.x + offset.x,
        y: n.top() + offset.y,
        width: n.width,
        height: n.height,
        corner_radius: config.corner_radius,
        color_index: n.color_index,
        depth: n.depth,
        label: label.into_owned(),
        full_label,
        label_anchor: Point::new(
            n.x + n.width / 2.0 + offset.x,
            n.y + offset.y + LABEL_BASELINE_NUDGE,
        ),
        label_style,
    }
}

/// Cuts labels longer than `max_chars` characters to `max_chars - 2` characters plus
/// `ellipsis`.
pub fn truncate_label<'a>(label: &'a str, max_chars: usize, ellipsis: &str) -> Cow<'a, str> {
    if label.chars().count() <= max_chars {
        return Cow::Borrowed(label);
    }
    let keep = max_chars.saturating_sub(2);
    let mut out: String = label.chars().take(keep).collect();
    out.push_str(ellipsis);
    Cow::Owned(out)
}

impl Connector {
    /// SVG path data: `M x1,y1 C cx,y1 cx,y2 x2,y2`.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        d.push('M');
        push_pair(&mut d, self.from.x, self.from.y);
        d.push_str(" C");
        push_pair(&mut d, self.control_x, self.from.y);
        push_pair(&mut d, self.control_x, self.to.y);
        push_pair(&mut d, self.to.x, self.to.y);
        d
    }
}

fn push_pair(out: &mut String, x: f64, y: f64) {
    out.push(' ');
    crate::svg::fmt_into(out, x);
    out.push(',');
    crate::svg::fmt_into(out, y);
}
