//! Cycle detection for reply linking
//!
//! Ensures that a parent link never makes a message its own ancestor, so every
//! tree reachable from a root stays finite.

use std::collections::HashSet;

use super::message::{Message, NodeId};

/// Check if linking `child` under `parent` would create a cycle
///
/// Walks the ancestry chain upwards from the proposed parent. If the child
/// shows up anywhere on it (or the chain loops on itself), linking is unsafe.
///
/// ```text
/// Current tree:  A → B → C
///
/// Linking A under C: true (A → B → C → A)
/// Linking D under C: false
/// ```
pub fn detect_cycle_in_ancestry(nodes: &[Message], child: NodeId, parent: NodeId) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(parent);

    while let Some(id) = current {
        if !visited.insert(id) {
            return true;
        }

        if id == child {
            return true;
        }

        current = nodes.get(id.0).and_then(|node| node.parent);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(parents: &[Option<usize>]) -> Vec<Message> {
        parents
            .iter()
            .enumerate()
            .map(|(i, parent)| {
                let mut msg = Message::placeholder(format!("m{i}"));
                msg.parent = parent.map(NodeId);
                msg
            })
            .collect()
    }

    #[test]
    fn test_no_cycle_simple_chain() {
        // A → B → C, plus an unlinked D
        let nodes = chain(&[None, Some(0), Some(1), None]);
        assert!(!detect_cycle_in_ancestry(&nodes, NodeId(3), NodeId(2)));
    }

    #[test]
    fn test_cycle_detected() {
        let nodes = chain(&[None, Some(0), Some(1)]);
        assert!(detect_cycle_in_ancestry(&nodes, NodeId(0), NodeId(2)));
    }

    #[test]
    fn test_self_loop() {
        let nodes = chain(&[None]);
        assert!(detect_cycle_in_ancestry(&nodes, NodeId(0), NodeId(0)));
    }
}
