use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::outline::PLACEHOLDER_ROOT_LABEL;

/// Starter outline for a map that is not generated from a book.
pub const BLANK_MAP_OUTLINE: &str =
    "Central Topic\n\tBranch 1\n\t\tSub-topic\n\tBranch 2\n\tBranch 3";

/// A positioned outline node.
///
/// `x` is the left edge of the node rectangle and depends only on `depth`; `y` is the vertical
/// center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub label: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color_index: usize,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Preorder walk over this subtree.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a LayoutNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(LayoutNode::node_count).sum::<usize>()
    }
}

/// A persisted mind map. `outline` is authoritative; `root` is a cache of the last layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub id: String,
    #[serde(rename = "bookId", default)]
    pub book_id: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub outline: String,
    #[serde(default, deserialize_with = "lenient_root")]
    pub root: Option<LayoutNode>,
}

impl MindMap {
    pub fn new(title: impl Into<String>, outline: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            book_id: None,
            title: title.into(),
            created_at: now,
            outline: outline.into(),
            root: None,
        }
    }

    pub fn blank(now: DateTime<Utc>) -> Self {
        Self::new("New Mind Map", BLANK_MAP_OUTLINE, now)
    }

    pub fn is_standalone(&self) -> bool {
        self.book_id.is_none()
    }

    /// Replaces the outline text and drops the now-stale cached layout.
    pub fn set_outline(&mut self, outline: impl Into<String>) {
        self.outline = outline.into();
        self.root = None;
    }

    pub fn root_label(&self) -> &str {
        self.root
            .as_ref()
            .map(|r| r.label.as_str())
            .unwrap_or(PLACEHOLDER_ROOT_LABEL)
    }
}

// Older backups store `root` in a different shape. The cache is re-derived from `outline`
// anyway, so anything that is not a layout tree is dropped instead of failing the import.
fn lenient_root<'de, D>(deserializer: D) -> Result<Option<LayoutNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };
    match serde_json::from_value::<LayoutNode>(value) {
        Ok(root) => Ok(Some(root)),
        Err(err) => {
            tracing::warn!(%err, "discarding cached mind map root in unknown shape");
            Ok(None)
        }
    }
}
