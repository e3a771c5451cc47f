use super::utils::{is_blank, outline_depth};
use super::{OutlineNode, PLACEHOLDER_ROOT_LABEL};

/// Parses an indented plain-text outline into a tree.
///
/// The first non-blank line is the root. Every later line attaches under the most recent line
/// whose depth is strictly smaller, so inconsistent indentation degrades to best-effort nesting
/// instead of failing.
pub fn parse_outline(text: &str) -> OutlineNode {
    let mut lines = text.lines().filter(|l| !is_blank(l));

    let Some(first) = lines.next() else {
        return OutlineNode::new(PLACEHOLDER_ROOT_LABEL);
    };

    // Nodes stay on the stack until a shallower-or-equal line arrives; popping a node moves it
    // into its parent's `children`, which keeps sibling order and avoids aliasing.
    let mut stack: Vec<(OutlineNode, isize)> = vec![(OutlineNode::new(first.trim()), -1)];

    for line in lines {
        let label = line.trim();
        if label.is_empty() {
            continue;
        }
        let depth = outline_depth(line) as isize;

        while stack.len() > 1 && stack.last().is_some_and(|(_, d)| *d >= depth) {
            attach_top(&mut stack);
        }
        stack.push((OutlineNode::new(label), depth));
    }

    while stack.len() > 1 {
        attach_top(&mut stack);
    }

    let (root, _) = stack.pop().unwrap_or_else(|| (OutlineNode::new(PLACEHOLDER_ROOT_LABEL), -1));
    tracing::debug!(
        nodes = root.node_count(),
        depth = root.max_depth(),
        "parsed outline"
    );
    root
}

fn attach_top(stack: &mut Vec<(OutlineNode, isize)>) {
    let Some((node, _)) = stack.pop() else {
        return;
    };
    if let Some((parent, _)) = stack.last_mut() {
        parent.children.push(node);
    }
}
