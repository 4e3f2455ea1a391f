//! Diagnostic tools: a human-readable tree dump and an integrity walker
//! that checks the structural invariants spec.md §3 lists against
//! [`TreeCorruption`]. Neither is on the hot path; both are grounded in
//! `memkv::art::debug`'s `debug_print`/`verify_integrity` pair, ported
//! from ad-hoc `String` issues to the typed `TreeCorruption` enum.

use log::error;

use crate::error::TreeCorruption;
use crate::node::{Node, NodeType};
use crate::tree::ArtTree;

impl ArtTree {
    /// Print the tree structure to stdout.
    pub fn debug_print(&self) {
        println!("=== art-index ===");
        println!("len: {}", self.len());
        match self.root() {
            Some(root) => debug_node(root, 0),
            None => println!("(empty)"),
        }
        println!("=================");
    }

    /// Walk every reachable node and report structural invariant
    /// violations (spec.md §3). An empty result means the tree is
    /// internally consistent; this does not check application-level
    /// semantics such as key-value correctness.
    pub fn verify_invariants(&self) -> Vec<TreeCorruption> {
        let mut issues = Vec::new();
        if let Some(root) = self.root() {
            verify_node(root, 0, &mut issues);
        }
        for issue in &issues {
            error!("structural invariant violation: {issue}");
        }
        issues
    }
}

fn debug_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Leaf { key, value } => {
            println!(
                "{}Leaf: {:?} -> {:?}",
                indent,
                String::from_utf8_lossy(key),
                String::from_utf8_lossy(value)
            );
        }
        _ => {
            let header = node.header().expect("inner node has a header");
            println!(
                "{}{} (prefix={:?}, logical_len={}, children={})",
                indent,
                node.node_type(),
                String::from_utf8_lossy(header.capped_prefix()),
                header.prefix_len,
                header.num_children,
            );
            for_each_child(node, |byte, child| {
                println!("{}  [{}] ->", indent, byte as char);
                debug_node(child, depth + 2);
            });
        }
    }
}

/// Call `f(byte, child)` for every occupied child slot, in ascending key
/// order, regardless of which variant `node` is.
fn for_each_child<'a>(node: &'a Node, mut f: impl FnMut(u8, &'a Node)) {
    match node {
        Node::Leaf { .. } => {}
        Node::Node4 { header, keys, children } => {
            for i in 0..header.num_children as usize {
                if let Some(c) = children[i].as_deref() {
                    f(keys[i], c);
                }
            }
        }
        Node::Node16 { header, keys, children } => {
            for i in 0..header.num_children as usize {
                if let Some(c) = children[i].as_deref() {
                    f(keys[i], c);
                }
            }
        }
        Node::Node48 { index, children, .. } => {
            for byte in 0..=255u8 {
                let slot = index[byte as usize];
                if slot != 0 {
                    if let Some(c) = children[slot as usize - 1].as_deref() {
                        f(byte, c);
                    }
                }
            }
        }
        Node::Node256 { children, .. } => {
            for byte in 0..=255u8 {
                if let Some(c) = children[byte as usize].as_deref() {
                    f(byte, c);
                }
            }
        }
    }
}

fn verify_node(node: &Node, depth: usize, issues: &mut Vec<TreeCorruption>) {
    if node.is_leaf() {
        return;
    }

    let header = node.header().expect("inner node has a header");
    let n = header.num_children as usize;
    let capacity = match node.node_type() {
        NodeType::Node4 => 4,
        NodeType::Node16 => 16,
        NodeType::Node48 => 48,
        NodeType::Node256 => 256,
        NodeType::Leaf => unreachable!(),
    };
    if n > capacity {
        issues.push(TreeCorruption::CapacityExceeded {
            depth,
            variant: match node.node_type() {
                NodeType::Node4 => "Node4",
                NodeType::Node16 => "Node16",
                NodeType::Node48 => "Node48",
                NodeType::Node256 => "Node256",
                NodeType::Leaf => unreachable!(),
            },
            count: n,
        });
    }
    if n == 0 {
        issues.push(TreeCorruption::EmptyInnerNode { depth });
    }

    match node {
        Node::Node4 { header, keys, .. } => {
            let n = header.num_children as usize;
            for i in 1..n {
                if keys[i - 1] >= keys[i] {
                    issues.push(TreeCorruption::UnsortedKeys { depth });
                    break;
                }
            }
        }
        Node::Node16 { header, keys, .. } => {
            let n = header.num_children as usize;
            for i in 1..n {
                if keys[i - 1] >= keys[i] {
                    issues.push(TreeCorruption::UnsortedKeys { depth });
                    break;
                }
            }
        }
        Node::Node48 { index, children, .. } => {
            for byte in 0..=255u8 {
                let slot = index[byte as usize];
                if slot != 0 && (slot as usize - 1 >= children.len() || children[slot as usize - 1].is_none()) {
                    issues.push(TreeCorruption::DanglingIndex { depth, byte, slot });
                }
            }
        }
        _ => {}
    }

    if let Some(leaf_key) = first_leaf_key(node) {
        let capped_len = header.capped_len();
        let inline_ok = depth + capped_len <= leaf_key.len()
            && header.capped_prefix() == &leaf_key[depth..depth + capped_len];
        let logical_ok = depth + (header.prefix_len as usize) <= leaf_key.len();
        if !inline_ok || !logical_ok {
            issues.push(TreeCorruption::PrefixMismatch {
                depth,
                prefix: header.capped_prefix().to_vec(),
                leaf_key: leaf_key.to_vec(),
            });
        }
    }

    for_each_child(node, |byte, child| {
        verify_node(child, depth + header.prefix_len as usize + 1, issues);
        let _ = byte;
    });
}

fn first_leaf_key(node: &Node) -> Option<&[u8]> {
    if node.is_leaf() {
        return None;
    }
    let mut found = None;
    for_each_child(node, |_, child| {
        if found.is_none() {
            found = Some(child.any_leaf_key());
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_has_no_issues() {
        let tree = ArtTree::new();
        assert!(tree.verify_invariants().is_empty());
    }

    #[test]
    fn populated_tree_has_no_issues() {
        let mut tree = ArtTree::new();
        for i in 0u8..80 {
            tree.insert(&[b'K', i], &[i]);
        }
        for i in (0u8..80).step_by(3) {
            tree.remove(&[b'K', i]);
        }
        let issues = tree.verify_invariants();
        assert!(issues.is_empty(), "unexpected corruption: {:?}", issues);
    }

    #[test]
    fn debug_print_does_not_panic() {
        let mut tree = ArtTree::new();
        tree.insert(b"a1", b"1");
        tree.insert(b"a2", b"2");
        tree.debug_print();
    }
}
