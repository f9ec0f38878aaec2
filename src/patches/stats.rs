//! Assembly statistics tracking.

use serde::Serialize;

/// Counts for a single assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    /// Thread roots seen
    pub threads: usize,
    /// Thread roots turned into a series version
    pub threads_assembled: usize,
    /// Thread roots rejected by the acceptance test or the grammar
    pub threads_rejected: usize,
    /// Cover-letter replies skipped for an unparseable subject
    pub replies_skipped: usize,
    pub series: usize,
    pub versions: usize,
    pub patches: usize,
    pub comments: usize,
    pub flags: usize,
    /// Commit records indexed (overwritten keys included)
    pub commits_indexed: usize,
    /// Commit records skipped for unknown people
    pub commits_skipped: usize,
    /// Commits claimed by a patch
    pub commits_matched: usize,
    pub members: usize,
}

impl AssemblyStats {
    pub fn summary(&self) -> String {
        format!(
            "{} threads ({} assembled, {} rejected), {} series, {} versions, {} patches, \
             {} comments, {} flags, {}/{} commits matched, {} members",
            self.threads,
            self.threads_assembled,
            self.threads_rejected,
            self.series,
            self.versions,
            self.patches,
            self.comments,
            self.flags,
            self.commits_matched,
            self.commits_indexed,
            self.members
        )
    }
}
