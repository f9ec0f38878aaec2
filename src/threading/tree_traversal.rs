//! Tree traversal utilities for reply forests
//!
//! All functions use an explicit worklist so arbitrarily deep reply chains
//! never exhaust the call stack.

use std::collections::VecDeque;

use super::message::{Message, NodeId};

/// Collect every descendant of `root` in breadth-first order
///
/// The root itself is not included. Siblings keep their record order, and
/// each level is fully emitted before the next one starts.
pub fn collect_descendants(nodes: &[Message], root: NodeId) -> Vec<NodeId> {
    let mut collected = Vec::new();
    let mut queue: VecDeque<NodeId> = match nodes.get(root.0) {
        Some(node) => node.children.iter().copied().collect(),
        None => return collected,
    };

    while let Some(current) = queue.pop_front() {
        collected.push(current);
        if let Some(node) = nodes.get(current.0) {
            queue.extend(node.children.iter().copied());
        }
    }

    collected
}

/// Collect `root` and all its descendants with their depth
///
/// Depth-first, children visited left to right; the root sits at depth 0.
pub fn collect_with_depth(nodes: &[Message], root: NodeId) -> Vec<(NodeId, usize)> {
    let mut collected = Vec::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((current, depth)) = stack.pop() {
        let Some(node) = nodes.get(current.0) else {
            continue;
        };
        collected.push((current, depth));

        // Reverse so the first child is popped first
        for child in node.children.iter().rev() {
            stack.push((*child, depth + 1));
        }
    }

    collected
}
