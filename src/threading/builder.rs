//! Reply-forest construction from flat message records
//!
//! Records arrive ordered by date, each naming at most one parent. A record
//! may reference a parent that shows up later or never; the builder creates a
//! placeholder node for it and fills it in when the parent's own record
//! arrives, so node identity is stable across the whole pass.
//!
//! ## Linking rules
//!
//! 1. Fetch or create the node for the record and populate its fields
//! 2. No parent: register the node as a thread root (once)
//! 3. Parent: fetch or create the parent node and append this node to its
//!    replies, unless the link would break the single-parent tree
//!
//! Links refused in step 3 are recorded as [`LinkIssue`]s. Reply order is
//! record order, not date order.

use serde::Serialize;

use super::cycle_detection::detect_cycle_in_ancestry;
use super::forest::ThreadForest;
use super::message::{Message, NodeId};
use super::subject_cleaning::clean_subject;
use crate::models::MessageRecord;

/// A parent reference the builder refused to follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkIssue {
    /// The record names itself as parent
    SelfReference { message_id: String },
    /// The node already hangs under another parent; the first one is kept
    ConflictingParent {
        message_id: String,
        kept: String,
        ignored: String,
    },
    /// The node was already registered as a thread root
    RootReparent { message_id: String, parent_id: String },
    /// The node is already registered as a reply; it stays one
    LateRoot { message_id: String },
    /// Following the link would make the node its own ancestor
    Cycle { message_id: String, parent_id: String },
}

/// Incremental builder for a [`ThreadForest`].
#[derive(Debug, Default)]
pub struct ThreadBuilder {
    forest: ThreadForest,
    clean_subjects: bool,
}

impl ThreadBuilder {
    pub fn new(clean_subjects: bool) -> Self {
        Self {
            forest: ThreadForest::default(),
            clean_subjects,
        }
    }

    /// Add one record; records must be pushed in input order
    pub fn push(&mut self, record: MessageRecord) {
        let MessageRecord {
            message_id,
            parent_id,
            subject,
            body,
            date,
            tz_offset,
            sender,
            list_url,
        } = record;

        let id = self.fetch_or_create(&message_id);
        let subject = if self.clean_subjects {
            clean_subject(&subject)
        } else {
            subject
        };

        let node = &mut self.forest.nodes[id.0];
        node.subject = subject;
        node.body = body;
        node.date = date;
        node.tz_offset = tz_offset;
        node.sender = sender;
        node.list_url = list_url;
        node.populated = true;

        match parent_id {
            None => self.register_root(id),
            Some(parent_id) => self.link(id, &parent_id),
        }
    }

    pub fn finish(self) -> ThreadForest {
        let forest = self.forest;
        let orphans = forest.orphans().count();
        if orphans > 0 {
            log::debug!(
                "{} referenced messages never arrived; their replies are unreachable",
                orphans
            );
        }
        if !forest.issues.is_empty() {
            log::warn!(
                "thread building refused {} parent references",
                forest.issues.len()
            );
        }
        forest
    }

    fn fetch_or_create(&mut self, message_id: &str) -> NodeId {
        if let Some(id) = self.forest.index.get(message_id) {
            return *id;
        }

        let id = NodeId(self.forest.nodes.len());
        self.forest
            .nodes
            .push(Message::placeholder(message_id.to_string()));
        self.forest.index.insert(message_id.to_string(), id);
        id
    }

    fn register_root(&mut self, id: NodeId) {
        let node = &self.forest.nodes[id.0];

        if node.is_root {
            log::debug!("duplicate root record for {}", node.message_id);
            return;
        }

        if node.parent.is_some() {
            let message_id = node.message_id.clone();
            self.record(LinkIssue::LateRoot { message_id });
            return;
        }

        self.forest.nodes[id.0].is_root = true;
        self.forest.roots.push(id);
    }

    fn link(&mut self, child: NodeId, parent_message_id: &str) {
        let child_message_id = self.forest.nodes[child.0].message_id.clone();

        if child_message_id == parent_message_id {
            self.record(LinkIssue::SelfReference {
                message_id: child_message_id,
            });
            return;
        }

        if self.forest.nodes[child.0].is_root {
            self.record(LinkIssue::RootReparent {
                message_id: child_message_id,
                parent_id: parent_message_id.to_string(),
            });
            return;
        }

        if let Some(existing) = self.forest.nodes[child.0].parent {
            let kept = self.forest.nodes[existing.0].message_id.clone();
            if kept != parent_message_id {
                self.record(LinkIssue::ConflictingParent {
                    message_id: child_message_id,
                    kept,
                    ignored: parent_message_id.to_string(),
                });
            }
            return;
        }

        let parent = self.fetch_or_create(parent_message_id);

        if detect_cycle_in_ancestry(&self.forest.nodes, child, parent) {
            self.record(LinkIssue::Cycle {
                message_id: child_message_id,
                parent_id: parent_message_id.to_string(),
            });
            return;
        }

        self.forest.nodes[child.0].parent = Some(parent);
        self.forest.nodes[parent.0].add_child(child);
    }

    fn record(&mut self, issue: LinkIssue) {
        log::debug!("refused parent reference: {:?}", issue);
        self.forest.issues.push(issue);
    }
}

/// Build a reply forest from records in input order
pub fn build_threads<I>(records: I, clean_subjects: bool) -> ThreadForest
where
    I: IntoIterator<Item = MessageRecord>,
{
    let mut builder = ThreadBuilder::new(clean_subjects);
    for record in records {
        builder.push(record);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, parent: Option<&str>) -> MessageRecord {
        MessageRecord {
            message_id: id.to_string(),
            parent_id: parent.map(str::to_string),
            subject: format!("[PATCH] {id}"),
            body: String::new(),
            date: NaiveDate::from_ymd_opt(2015, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            tz_offset: 0,
            sender: format!("{id}@example.org"),
            list_url: None,
        }
    }

    fn ids(forest: &ThreadForest, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|id| forest.message(*id).message_id.clone())
            .collect()
    }

    #[test]
    fn test_two_roots_with_chain() {
        let forest = build_threads(
            vec![
                record("A", None),
                record("B", Some("A")),
                record("C", Some("B")),
                record("D", None),
            ],
            true,
        );

        assert_eq!(ids(&forest, forest.roots()), vec!["A", "D"]);
        let a = forest.node_id("A").unwrap();
        let b = forest.node_id("B").unwrap();
        assert_eq!(ids(&forest, forest.children(a)), vec!["B"]);
        assert_eq!(ids(&forest, forest.children(b)), vec!["C"]);
        assert!(forest.issues().is_empty());
    }

    #[test]
    fn test_parent_arrives_after_child() {
        let forest = build_threads(vec![record("B", Some("A")), record("A", None)], true);

        assert_eq!(ids(&forest, forest.roots()), vec!["A"]);
        let a = forest.node_id("A").unwrap();
        assert_eq!(ids(&forest, forest.children(a)), vec!["B"]);
        assert!(!forest.message(a).is_placeholder());
        assert_eq!(forest.message(a).sender, "A@example.org");
        assert_eq!(forest.orphans().count(), 0);
    }

    #[test]
    fn test_missing_parent_is_orphan() {
        let forest = build_threads(vec![record("R", None), record("B", Some("X"))], true);

        assert_eq!(ids(&forest, forest.roots()), vec!["R"]);
        let orphans: Vec<&str> = forest.orphans().map(|m| m.message_id.as_str()).collect();
        assert_eq!(orphans, vec!["X"]);
    }

    #[test]
    fn test_children_keep_record_order() {
        let mut late = record("late", Some("A"));
        late.date = NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let forest = build_threads(
            vec![record("A", None), record("first", Some("A")), late],
            true,
        );
        let a = forest.node_id("A").unwrap();
        assert_eq!(ids(&forest, forest.children(a)), vec!["first", "late"]);
    }

    #[test]
    fn test_self_reference_refused() {
        let forest = build_threads(vec![record("A", Some("A"))], true);
        assert!(forest.roots().is_empty());
        assert_eq!(
            forest.issues(),
            &[LinkIssue::SelfReference {
                message_id: "A".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_root_registered_once() {
        let forest = build_threads(vec![record("A", None), record("A", None)], true);
        assert_eq!(forest.roots().len(), 1);
        assert!(forest.issues().is_empty());
    }

    #[test]
    fn test_duplicate_reply_linked_once() {
        let forest = build_threads(
            vec![record("A", None), record("B", Some("A")), record("B", Some("A"))],
            true,
        );
        let a = forest.node_id("A").unwrap();
        assert_eq!(forest.children(a).len(), 1);
        assert!(forest.issues().is_empty());
    }

    #[test]
    fn test_conflicting_parent_keeps_first() {
        let forest = build_threads(
            vec![
                record("A", None),
                record("D", None),
                record("B", Some("A")),
                record("B", Some("D")),
            ],
            true,
        );
        let d = forest.node_id("D").unwrap();
        assert!(forest.children(d).is_empty());
        assert!(matches!(
            &forest.issues()[0],
            LinkIssue::ConflictingParent { kept, .. } if kept == "A"
        ));
    }

    #[test]
    fn test_root_cannot_become_reply() {
        let forest = build_threads(
            vec![record("A", None), record("B", Some("A")), record("A", Some("B"))],
            true,
        );
        assert_eq!(forest.roots().len(), 1);
        let b = forest.node_id("B").unwrap();
        assert!(forest.children(b).is_empty());
        assert!(matches!(&forest.issues()[0], LinkIssue::RootReparent { .. }));
    }

    #[test]
    fn test_cycle_refused() {
        // B under A (placeholder), then A under B would close a loop
        let forest = build_threads(vec![record("B", Some("A")), record("A", Some("B"))], true);
        assert!(matches!(&forest.issues()[0], LinkIssue::Cycle { .. }));
        let a = forest.node_id("A").unwrap();
        assert_eq!(forest.descendants(a).len(), 1);
    }

    #[test]
    fn test_subject_cleaning_toggle() {
        let mut raw = record("A", None);
        raw.subject = "[Xen-devel] [PATCH] fix\nit".to_string();

        let cleaned = build_threads(vec![raw.clone()], true);
        assert_eq!(cleaned.get("A").unwrap().subject, "[PATCH] fix it");

        let untouched = build_threads(vec![raw], false);
        assert_eq!(
            untouched.get("A").unwrap().subject,
            "[Xen-devel] [PATCH] fix\nit"
        );
    }

    #[test]
    fn test_thread_display_indents_replies() {
        let forest = build_threads(
            vec![record("A", None), record("B", Some("A")), record("C", Some("B"))],
            true,
        );
        let thread = forest.threads().next().unwrap();
        assert_eq!(thread.len(), 3);
        let rendered = thread.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("<Email [PATCH] A"));
        assert!(lines[1].starts_with("  <Email [PATCH] B"));
        assert!(lines[2].starts_with("    <Email [PATCH] C"));
    }
}
