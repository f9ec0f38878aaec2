//! The reply forest produced by the thread builder

use std::collections::HashMap;
use std::fmt;

use super::builder::LinkIssue;
use super::message::{Message, NodeId};
use super::tree_traversal::{collect_descendants, collect_with_depth};

/// Arena of message nodes plus the thread roots in emission order.
#[derive(Debug, Default)]
pub struct ThreadForest {
    pub(crate) nodes: Vec<Message>,
    pub(crate) index: HashMap<String, NodeId>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) issues: Vec<LinkIssue>,
}

impl ThreadForest {
    /// Thread roots in the order their records were first seen
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn threads(&self) -> impl Iterator<Item = Thread<'_>> {
        self.roots.iter().map(move |root| Thread {
            forest: self,
            root: *root,
        })
    }

    pub fn message(&self, id: NodeId) -> &Message {
        &self.nodes[id.0]
    }

    pub fn get(&self, message_id: &str) -> Option<&Message> {
        self.index.get(message_id).map(|id| &self.nodes[id.0])
    }

    pub fn node_id(&self, message_id: &str) -> Option<NodeId> {
        self.index.get(message_id).copied()
    }

    /// Direct replies of a node, in record order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// All replies below a node, breadth first
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        collect_descendants(&self.nodes, id)
    }

    /// Referenced messages whose own record never arrived
    pub fn orphans(&self) -> impl Iterator<Item = &Message> {
        self.nodes.iter().filter(|node| node.is_placeholder())
    }

    pub fn issues(&self) -> &[LinkIssue] {
        &self.issues
    }

    /// Number of nodes, placeholders included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A traversal root inside a [`ThreadForest`].
#[derive(Clone, Copy)]
pub struct Thread<'a> {
    forest: &'a ThreadForest,
    root: NodeId,
}

impl Thread<'_> {
    /// Number of messages in the thread, root included
    pub fn len(&self) -> usize {
        self.forest.descendants(self.root).len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Thread<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, depth) in collect_with_depth(&self.forest.nodes, self.root) {
            let msg = self.forest.message(id);
            writeln!(
                f,
                "{:indent$}<Email {} - ({})>",
                "",
                msg.subject,
                msg.date,
                indent = depth * 2
            )?;
        }
        Ok(())
    }
}
