//! Patch-series reconstruction
//!
//! Turns a reply forest plus the commit log into patch series, versions,
//! patches, comments, and trailer flags, and correlates each patch with the
//! commit that applied it.
//!
//! ## Module Structure
//!
//! - `normalize`: matching keys shared by patches and commits
//! - `subject`: `[PATCH ...]` subject grammar
//! - `trailers`: trailer-line extraction
//! - `members`: per-run people registry
//! - `commits`: commit index keyed by normalized subject
//! - `assembler`: the series assembly pass
//! - `diagnostics`, `stats`: what a run reports besides its output

pub mod assembler;
pub mod commits;
pub mod diagnostics;
pub mod members;
pub mod normalize;
pub mod stats;
pub mod subject;
pub mod trailers;

pub use assembler::SeriesAssembler;
pub use commits::CommitIndex;
pub use diagnostics::{AssemblyDiagnostic, DiagnosticScope};
pub use members::MemberRegistry;
pub use normalize::normalize_key;
pub use stats::AssemblyStats;
pub use subject::{PatchSubject, is_patch_thread, parse_patch_subject};
pub use trailers::extract_trailers;

use crate::config::AssemblyConfig;
use crate::models::{Assembly, CommitRecord, Person};
use crate::threading::ThreadForest;

/// Run one complete assembly pass
///
/// Commits are indexed first, so their authors and committers are the first
/// members registered; then every thread root is assembled in order.
pub fn assemble(
    forest: &ThreadForest,
    commits: &[CommitRecord],
    people: &[Person],
    config: &AssemblyConfig,
) -> Assembly {
    let mut members = MemberRegistry::new();
    let mut diagnostics = Vec::new();
    let index = CommitIndex::build(commits, people, &mut members, &mut diagnostics);

    log::info!(
        "indexed {} commits under {} keys",
        index.indexed(),
        index.len()
    );

    SeriesAssembler::new(forest, config, members, index, diagnostics).run()
}
