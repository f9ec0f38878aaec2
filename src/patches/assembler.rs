//! Patch-series assembly
//!
//! Walks every thread root in emission order and turns accepted threads into
//! series versions:
//!
//! 1. **Accept**: the root subject must look like `[PATCH ...] ...`
//! 2. **Parse**: the root subject must satisfy the patch grammar
//! 3. **Collect patches**: a cover letter (no sequence number) contributes one
//!    patch per direct reply; any other root is itself the only patch
//! 4. **Group**: version 1 always opens a new series; a later version joins
//!    the first series created with the same bare subject, or opens a new one
//!
//! Steps 1 and 2 touch nothing shared, so they can run on the rayon pool
//! ahead of time. Everything after them runs strictly in root order because
//! series grouping and commit claiming depend on it.

use rayon::prelude::*;
use std::collections::HashSet;

use super::commits::CommitIndex;
use super::diagnostics::{AssemblyDiagnostic, DiagnosticScope};
use super::members::MemberRegistry;
use super::normalize::normalize_key;
use super::stats::AssemblyStats;
use super::subject::{PatchSubject, is_patch_thread, parse_patch_subject};
use super::trailers::extract_trailers;
use crate::config::AssemblyConfig;
use crate::error::SubjectParseError;
use crate::models::{Assembly, Comment, Patch, PatchSeries, PatchSeriesVersion, SeriesId};
use crate::threading::{NodeId, ThreadForest};

/// Outcome of the acceptance and grammar checks on a thread root
#[derive(Debug)]
enum RootCheck {
    Rejected,
    Unparseable(SubjectParseError),
    Parsed(PatchSubject),
}

fn check_root(subject: &str) -> RootCheck {
    if !is_patch_thread(subject) {
        return RootCheck::Rejected;
    }
    match parse_patch_subject(subject) {
        Ok(parsed) => RootCheck::Parsed(parsed),
        Err(error) => RootCheck::Unparseable(error),
    }
}

/// Single-pass assembler owning the run's shared state
pub struct SeriesAssembler<'a> {
    forest: &'a ThreadForest,
    config: &'a AssemblyConfig,
    members: MemberRegistry,
    commits: CommitIndex,
    /// Series in creation order; `SeriesId` indexes into it
    series: Vec<PatchSeries>,
    /// Series touched by each assembled thread, duplicates included
    emitted: Vec<SeriesId>,
    diagnostics: Vec<AssemblyDiagnostic>,
    stats: AssemblyStats,
}

impl<'a> SeriesAssembler<'a> {
    pub fn new(
        forest: &'a ThreadForest,
        config: &'a AssemblyConfig,
        members: MemberRegistry,
        commits: CommitIndex,
        diagnostics: Vec<AssemblyDiagnostic>,
    ) -> Self {
        Self {
            forest,
            config,
            members,
            commits,
            series: Vec::new(),
            emitted: Vec::new(),
            diagnostics,
            stats: AssemblyStats::default(),
        }
    }

    /// Assemble every thread and hand back the finished model
    pub fn run(mut self) -> Assembly {
        let forest = self.forest;
        let roots = forest.roots();

        let checks: Vec<RootCheck> = if self.config.parallel_parse {
            roots
                .par_iter()
                .map(|root| check_root(&forest.message(*root).subject))
                .collect()
        } else {
            roots
                .iter()
                .map(|root| check_root(&forest.message(*root).subject))
                .collect()
        };

        for (root, check) in roots.iter().zip(checks) {
            self.assemble_thread(*root, check);
        }

        self.finish()
    }

    fn assemble_thread(&mut self, root: NodeId, check: RootCheck) {
        let forest = self.forest;
        let message = forest.message(root);
        self.stats.threads += 1;

        let parsed = match check {
            RootCheck::Parsed(parsed) => parsed,
            RootCheck::Rejected => {
                self.stats.threads_rejected += 1;
                self.record(AssemblyDiagnostic::ThreadRejected {
                    message_id: message.message_id.clone(),
                    subject: message.subject.clone(),
                });
                return;
            }
            RootCheck::Unparseable(error) => {
                self.reject_root(root, error);
                return;
            }
        };

        let patches = if parsed.is_cover_letter() {
            let mut patches = Vec::new();
            for reply in forest.children(root) {
                match self.build_patch(*reply) {
                    Ok(patch) => patches.push(patch),
                    Err(error) => {
                        self.stats.replies_skipped += 1;
                        self.record(AssemblyDiagnostic::SubjectParse {
                            scope: DiagnosticScope::Reply,
                            message_id: forest.message(*reply).message_id.clone(),
                            thread_root: message.message_id.clone(),
                            error,
                        });
                    }
                }
            }
            patches
        } else {
            match self.build_patch(root) {
                Ok(patch) => vec![patch],
                Err(error) => {
                    self.reject_root(root, error);
                    return;
                }
            }
        };

        let version = PatchSeriesVersion {
            version: parsed.version,
            subject: message.subject.clone(),
            body: message.body.clone(),
            date: message.date,
            tz_offset: message.tz_offset,
            patches,
        };

        self.stats.threads_assembled += 1;
        self.attach_version(&message.message_id, parsed.bare_subject, version);
    }

    fn reject_root(&mut self, root: NodeId, error: SubjectParseError) {
        let message_id = self.forest.message(root).message_id.clone();
        self.stats.threads_rejected += 1;
        self.record(AssemblyDiagnostic::SubjectParse {
            scope: DiagnosticScope::Root,
            thread_root: message_id.clone(),
            message_id,
            error,
        });
    }

    /// Build one patch from a message and its whole reply subtree
    fn build_patch(&mut self, node: NodeId) -> Result<Patch, SubjectParseError> {
        let forest = self.forest;
        let message = forest.message(node);
        let parsed = parse_patch_subject(&message.subject)?;

        let submitter = self.members.resolve(&message.sender);
        let mut flags = extract_trailers(&message.body, message.date, message.tz_offset);
        let mut comments = Vec::new();

        for reply_id in forest.descendants(node) {
            let reply = forest.message(reply_id);
            comments.push(Comment {
                message_id: reply.message_id.clone(),
                subject: reply.subject.clone(),
                body: reply.body.clone(),
                submitter: self.members.resolve(&reply.sender),
                date: reply.date,
                tz_offset: reply.tz_offset,
            });
            flags.extend(extract_trailers(&reply.body, reply.date, reply.tz_offset));
        }

        let key = normalize_key(&parsed.bare_subject);
        let commit = self.commits.claim(&key, &message.message_id);

        self.stats.patches += 1;
        self.stats.comments += comments.len();
        self.stats.flags += flags.len();

        Ok(Patch {
            message_id: message.message_id.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
            sequence_number: parsed.sequence_number,
            total: parsed.total,
            submitter,
            date: message.date,
            tz_offset: message.tz_offset,
            comments,
            flags,
            commit,
        })
    }

    /// Append a version to its series, creating the series when needed
    fn attach_version(
        &mut self,
        root_message_id: &str,
        bare_subject: String,
        version: PatchSeriesVersion,
    ) {
        let existing = if version.version > 1 {
            self.series.iter().position(|s| s.subject == bare_subject)
        } else {
            None
        };

        let index = match existing {
            Some(index) => index,
            None => {
                let id = SeriesId(self.series.len());
                self.series.push(PatchSeries {
                    id,
                    message_id: root_message_id.to_string(),
                    subject: bare_subject,
                    versions: Vec::new(),
                });
                id.0
            }
        };

        if let Some(previous) = self.series[index]
            .latest_version()
            .filter(|previous| *previous > version.version)
        {
            let series_message_id = self.series[index].message_id.clone();
            self.record(AssemblyDiagnostic::VersionRegression {
                series_message_id,
                previous,
                version: version.version,
            });
        }

        self.stats.versions += 1;
        self.series[index].versions.push(version);
        self.emitted.push(SeriesId(index));
    }

    fn record(&mut self, diagnostic: AssemblyDiagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    fn finish(self) -> Assembly {
        let SeriesAssembler {
            forest,
            members,
            commits,
            series,
            emitted,
            diagnostics,
            mut stats,
            ..
        } = self;

        // A reused series is emitted once per version; keep its first position
        let mut seen = HashSet::new();
        let mut slots: Vec<Option<PatchSeries>> = series.into_iter().map(Some).collect();
        let series: Vec<PatchSeries> = emitted
            .into_iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| slots.get_mut(id.0).and_then(Option::take))
            .collect();

        stats.series = series.len();
        stats.commits_indexed = commits.indexed();
        stats.commits_skipped = commits.skipped();
        stats.commits_matched = commits.matched();
        stats.members = members.len();

        log::info!("assembly finished: {}", stats.summary());

        Assembly {
            commits: commits.into_map(),
            series,
            members: members.into_members(),
            diagnostics,
            link_issues: forest.issues().to_vec(),
            stats,
        }
    }
}
