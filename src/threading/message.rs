//! Message nodes of the reply forest
//!
//! Nodes live in an arena owned by [`ThreadForest`](super::ThreadForest) and
//! are addressed by [`NodeId`]. A node can exist before its own record has
//! been seen: a reply that names an unseen parent creates an empty
//! placeholder, which is filled in later when (and if) the parent's record
//! arrives.

use chrono::NaiveDateTime;

/// Arena index of a message node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A mailing-list message and its direct replies.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// The Message-ID of this node
    pub message_id: String,

    pub subject: String,
    pub body: String,
    pub date: NaiveDateTime,
    pub tz_offset: i32,
    pub sender: String,
    pub list_url: Option<String>,

    /// Parent node (None for roots and unlinked placeholders)
    pub(crate) parent: Option<NodeId>,

    /// Replies in record order
    pub(crate) children: Vec<NodeId>,

    /// Registered as a thread root
    pub(crate) is_root: bool,

    /// Whether a record for this message has been seen
    pub(crate) populated: bool,
}

impl Message {
    /// Create an empty placeholder for a referenced message
    pub fn placeholder(message_id: String) -> Self {
        Message {
            message_id,
            ..Default::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !self.populated
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Add a reply to this node (avoiding duplicates)
    pub(crate) fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }
}
