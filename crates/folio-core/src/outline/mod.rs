mod edit;
mod parse;
mod utils;

#[cfg(test)]
mod tests;

pub use edit::{Edit, indent_line, outdent_line};
pub use parse::parse_outline;
pub use utils::outline_depth;

use serde::{Deserialize, Serialize};

/// Root label used when an outline has no non-blank line.
pub const PLACEHOLDER_ROOT_LABEL: &str = "Central Topic";

/// One labeled node of a parsed outline. Parents own their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub label: String,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<OutlineNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::node_count).sum::<usize>()
    }

    /// Number of levels below and including `self` (a leaf has depth 1).
    pub fn max_depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::max_depth)
            .max()
            .unwrap_or(0)
    }
}
