//! Horizontal tidy-tree layout.
//!
//! Depth maps to a fixed column. Each node reserves a vertical band as tall as its whole
//! subtree; sibling bands are stacked with a fixed gap and centered on the parent, so sibling
//! subtrees never overlap. Runs in two linear passes: extents bottom-up, centers top-down.

use folio_core::config::LayoutConfig;
use folio_core::{LayoutNode, OutlineNode};

use crate::model::MindMapLayout;
use crate::text::TextMeasurer;

pub fn layout_outline(
    root: &OutlineNode,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> MindMapLayout {
    let mut visit = 0usize;
    let mut tree = size_node(root, 0, config, measurer, &mut visit);
    let extent = subtree_extent(&tree, config);
    place(&mut tree, &extent, 0.0, config.vertical_spacing);

    let layout = MindMapLayout::from_root(tree);
    tracing::debug!(
        nodes = visit,
        width = layout.bounds.width(),
        height = layout.bounds.height(),
        "laid out mind map"
    );
    layout
}

/// Node width for `label`: measured width plus padding, clamped to the configured range.
pub fn node_width(label: &str, config: &LayoutConfig, measurer: &dyn TextMeasurer) -> f64 {
    let w = measurer.measure(label).width + config.label_padding;
    // `f64::clamp` panics on an inverted range; a bad config should not.
    w.max(config.min_node_width).min(config.max_node_width)
}

fn size_node(
    node: &OutlineNode,
    depth: usize,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
    visit: &mut usize,
) -> LayoutNode {
    let color_index = *visit % config.palette_size.max(1);
    *visit += 1;

    let children = node
        .children
        .iter()
        .map(|c| size_node(c, depth + 1, config, measurer, visit))
        .collect();

    LayoutNode {
        label: node.label.clone(),
        depth,
        x: depth as f64 * config.level_spacing_x,
        y: 0.0,
        width: node_width(&node.label, config, measurer),
        height: config.node_height,
        color_index,
        children,
    }
}

// Mirrors the layout tree; `height` is the band reserved for the subtree.
struct Extent {
    height: f64,
    children: Vec<Extent>,
}

impl Extent {
    fn children_block(&self, spacing: f64) -> f64 {
        let sum: f64 = self.children.iter().map(|c| c.height).sum();
        let gaps = self.children.len().saturating_sub(1) as f64 * spacing;
        sum + gaps
    }
}

fn subtree_extent(node: &LayoutNode, config: &LayoutConfig) -> Extent {
    let children: Vec<Extent> = node
        .children
        .iter()
        .map(|c| subtree_extent(c, config))
        .collect();
    let mut extent = Extent {
        height: node.height,
        children,
    };
    if !extent.children.is_empty() {
        extent.height = node
            .height
            .max(extent.children_block(config.vertical_spacing));
    }
    extent
}

// Every descendant is positioned relative to its parent's final center, which is the same as
// shifting each child subtree as a whole.
fn place(node: &mut LayoutNode, extent: &Extent, center: f64, spacing: f64) {
    node.y = center;
    let mut cursor = center - extent.children_block(spacing) / 2.0;
    for (child, child_extent) in node.children.iter_mut().zip(&extent.children) {
        place(child, child_extent, cursor + child_extent.height / 2.0, spacing);
        cursor += child_extent.height + spacing;
    }
}
