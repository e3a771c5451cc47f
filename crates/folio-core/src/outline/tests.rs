use super::*;

fn labels(node: &OutlineNode) -> Vec<&str> {
    node.children.iter().map(|c| c.label.as_str()).collect()
}

#[test]
fn outline_empty_text_yields_placeholder_root() {
    let root = parse_outline("");
    assert_eq!(root.label, PLACEHOLDER_ROOT_LABEL);
    assert!(root.children.is_empty());

    let root = parse_outline("  \n\t\n   \n");
    assert_eq!(root.label, PLACEHOLDER_ROOT_LABEL);
    assert!(root.children.is_empty());
}

#[test]
fn outline_first_non_blank_line_is_root() {
    let root = parse_outline("\n\n   My Root  \n\tA");
    assert_eq!(root.label, "My Root");
    assert_eq!(labels(&root), vec!["A"]);
}

#[test]
fn outline_tab_hierarchy() {
    let root = parse_outline("Root\n\tA\n\t\tA1\n\tB");
    assert_eq!(root.label, "Root");
    assert_eq!(labels(&root), vec!["A", "B"]);
    assert_eq!(labels(&root.children[0]), vec!["A1"]);
    assert!(root.children[1].children.is_empty());
}

#[test]
fn outline_space_hierarchy_matches_tab_hierarchy() {
    let tabs = parse_outline("Root\n\tA\n\t\tA1\n\tB");
    let spaces = parse_outline("Root\n  A\n    A1\n  B");
    assert_eq!(tabs, spaces);
}

#[test]
fn outline_four_spaces_is_same_depth_as_two_tabs() {
    let a = parse_outline("Root\n\tA\n\t\tdeep");
    let b = parse_outline("Root\n\tA\n    deep");
    assert_eq!(a, b);
    assert_eq!(b.children[0].children[0].label, "deep");
}

#[test]
fn outline_blank_lines_are_ignored() {
    let root = parse_outline("Root\n\n\tA\n\n\n\tB\n");
    assert_eq!(labels(&root), vec!["A", "B"]);
}

#[test]
fn outline_deep_jump_attaches_to_nearest_ancestor() {
    // `A1` jumps three levels below `A`; it still becomes `A`'s child.
    let root = parse_outline("Root\n\tA\n\t\t\t\tA1\n\t\tA2\n\tB");
    assert_eq!(labels(&root), vec!["A", "B"]);
    assert_eq!(labels(&root.children[0]), vec!["A1", "A2"]);
}

#[test]
fn outline_unindented_lines_after_root_are_root_children() {
    let root = parse_outline("Root\nA\nB\n\tB1");
    assert_eq!(labels(&root), vec!["A", "B"]);
    assert_eq!(labels(&root.children[1]), vec!["B1"]);
}

#[test]
fn outline_root_indentation_is_ignored() {
    let root = parse_outline("\t\tRoot\nA");
    assert_eq!(root.label, "Root");
    assert_eq!(labels(&root), vec!["A"]);
}

#[test]
fn outline_labels_are_trimmed() {
    let root = parse_outline("Root\n\t  padded label \t ");
    assert_eq!(labels(&root), vec!["padded label"]);
}

#[test]
fn outline_parse_is_deterministic() {
    let text = "Book\n\tCh1\n\t\tQuote A\n\tCh2\n\t\tQuote B\n\t\tQuote C";
    assert_eq!(parse_outline(text), parse_outline(text));
}

#[test]
fn outline_book_scenario() {
    let text = "Book\n\tCh1\n\t\tQuote A\n\tCh2\n\t\tQuote B\n\t\tQuote C";
    let root = parse_outline(text);
    assert_eq!(root.label, "Book");
    assert_eq!(labels(&root), vec!["Ch1", "Ch2"]);
    assert_eq!(labels(&root.children[0]), vec!["Quote A"]);
    assert_eq!(labels(&root.children[1]), vec!["Quote B", "Quote C"]);
    assert_eq!(root.node_count(), 6);
    assert_eq!(root.max_depth(), 3);
}

#[test]
fn outline_mixed_indentation_tree() {
    let root = parse_outline("Root\n  A\n    A1\n\t\tA2\n   B");
    let expected = OutlineNode::with_children(
        "Root",
        vec![
            OutlineNode::with_children(
                "A",
                vec![OutlineNode::new("A1"), OutlineNode::new("A2")],
            ),
            OutlineNode::new("B"),
        ],
    );
    assert_eq!(root, expected);
}

#[test]
fn outline_crlf_line_endings() {
    let root = parse_outline("Root\r\n\tA\r\n\t\tA1\r\n");
    assert_eq!(labels(&root), vec!["A"]);
    assert_eq!(labels(&root.children[0]), vec!["A1"]);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    fn line() -> impl Strategy<Value = String> {
        let label = "[A-Za-z漢][A-Za-z漢 ]{0,20}";
        prop_oneof![
            3 => (0usize..8, label).prop_map(|(tabs, l)| format!("{}{l}", "\t".repeat(tabs))),
            3 => (0usize..15, label).prop_map(|(spaces, l)| format!("{}{l}", " ".repeat(spaces))),
            1 => "[ \t]{0,4}",
        ]
    }

    fn outline() -> impl Strategy<Value = String> {
        prop::collection::vec(line(), 0..50).prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn parse_is_deterministic(text in outline()) {
            prop_assert_eq!(parse_outline(&text), parse_outline(&text));
        }

        #[test]
        fn every_non_blank_line_becomes_one_node(text in outline()) {
            let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
            prop_assert_eq!(parse_outline(&text).node_count(), non_blank.max(1));
        }

        #[test]
        fn preorder_keeps_line_order(text in outline()) {
            fn preorder<'a>(node: &'a OutlineNode, out: &mut Vec<&'a str>) {
                out.push(&node.label);
                for child in &node.children {
                    preorder(child, out);
                }
            }
            let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            let root = parse_outline(&text);
            let mut labels = Vec::new();
            preorder(&root, &mut labels);
            if lines.is_empty() {
                prop_assert_eq!(labels, vec![PLACEHOLDER_ROOT_LABEL]);
            } else {
                prop_assert_eq!(labels, lines);
            }
        }
    }
}
