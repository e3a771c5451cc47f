use std::ops::{Add, Sub};

use folio_core::LayoutNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    /// Exact extent of every node rectangle in the tree.
    pub fn of_tree(root: &LayoutNode) -> Self {
        let mut pts = Vec::with_capacity(root.node_count() * 2);
        root.walk(&mut |n| {
            pts.push((n.x, n.top()));
            pts.push((n.right(), n.bottom()));
        });
        Self::from_points(pts).unwrap_or_default()
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A positioned tree plus its bounding box, in layout coordinates (root left edge at x = 0,
/// root center at y = 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapLayout {
    pub root: LayoutNode,
    pub bounds: Bounds,
}

impl MindMapLayout {
    /// Wraps a previously computed tree, e.g. the cached `root` of a stored map.
    pub fn from_root(root: LayoutNode) -> Self {
        let bounds = Bounds::of_tree(&root);
        Self { root, bounds }
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Every node in preorder.
    pub fn nodes(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::with_capacity(self.node_count());
        self.root.walk(&mut |n| out.push(n));
        out
    }
}
