//! Mail threading module
//!
//! Rebuilds reply trees from flat message records. Each record carries at most
//! one parent reference, so the result is a forest of single-parent trees
//! whose roots are the messages that reply to nothing.
//!
//! ## Module Structure
//!
//! - `message`: arena node type
//! - `builder`: incremental forest construction and link validation
//! - `forest`: the resulting forest and thread views
//! - `cycle_detection`: ancestry check used before linking
//! - `tree_traversal`: worklist traversals over the arena
//! - `subject_cleaning`: subject cleanup applied at ingestion

pub mod builder;
pub mod cycle_detection;
pub mod forest;
pub mod message;
pub mod subject_cleaning;
pub mod tree_traversal;

pub use builder::{LinkIssue, ThreadBuilder, build_threads};
pub use forest::{Thread, ThreadForest};
pub use message::{Message, NodeId};
pub use subject_cleaning::clean_subject;
