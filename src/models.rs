use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::patches::{AssemblyDiagnostic, AssemblyStats};
use crate::threading::LinkIssue;

// ===== Input Records =====

/// One mailing-list message row as handed over by the retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub tz_offset: i32,
    pub sender: String,
    #[serde(default)]
    pub list_url: Option<String>,
}

/// One source-control commit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit_id: i64,
    pub revision: String,
    pub author_date: NaiveDateTime,
    #[serde(default)]
    pub author_tz: i32,
    pub commit_date: NaiveDateTime,
    #[serde(default)]
    pub commit_tz: i32,
    pub message: String,
    pub author_id: i64,
    pub committer_id: i64,
    /// Whether the commit touched at least one tracked file.
    #[serde(default = "default_true")]
    pub has_file_actions: bool,
}

fn default_true() -> bool {
    true
}

/// Row of the people table used to resolve commit authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub email: String,
}

// ===== Assembled Model =====

/// Index of a [`Member`] in the run's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MemberId(pub usize);

/// A person, identified solely by email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub email: String,
}

/// Identity of a [`PatchSeries`] within one run (creation order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SeriesId(pub usize);

/// Known trailer tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlagKind {
    #[serde(rename = "Acked-by")]
    AckedBy,
    #[serde(rename = "Cc")]
    Cc,
    #[serde(rename = "Fixes")]
    Fixes,
    #[serde(rename = "From")]
    From,
    #[serde(rename = "Reported-by")]
    ReportedBy,
    #[serde(rename = "Tested-by")]
    TestedBy,
    #[serde(rename = "Reviewed-by")]
    ReviewedBy,
    #[serde(rename = "Release-Acked-by")]
    ReleaseAckedBy,
    #[serde(rename = "Signed-off-by")]
    SignedOffBy,
    #[serde(rename = "Suggested-by")]
    SuggestedBy,
}

impl FlagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::AckedBy => "Acked-by",
            FlagKind::Cc => "Cc",
            FlagKind::Fixes => "Fixes",
            FlagKind::From => "From",
            FlagKind::ReportedBy => "Reported-by",
            FlagKind::TestedBy => "Tested-by",
            FlagKind::ReviewedBy => "Reviewed-by",
            FlagKind::ReleaseAckedBy => "Release-Acked-by",
            FlagKind::SignedOffBy => "Signed-off-by",
            FlagKind::SuggestedBy => "Suggested-by",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trailer annotation found in a patch message or one of its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub kind: FlagKind,
    pub value: String,
    pub date: NaiveDateTime,
    pub tz_offset: i32,
}

/// A reply somewhere below a patch message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub message_id: String,
    pub subject: String,
    pub body: String,
    pub submitter: MemberId,
    pub date: NaiveDateTime,
    pub tz_offset: i32,
}

/// One patch of a posted series version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub message_id: String,
    pub subject: String,
    pub body: String,
    pub sequence_number: Option<u32>,
    pub total: Option<u32>,
    pub submitter: MemberId,
    pub date: NaiveDateTime,
    pub tz_offset: i32,
    pub comments: Vec<Comment>,
    pub flags: Vec<Flag>,
    /// Key of the matched commit in [`Assembly::commits`].
    pub commit: Option<String>,
}

/// One posting of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchSeriesVersion {
    pub version: u32,
    pub subject: String,
    pub body: String,
    pub date: NaiveDateTime,
    pub tz_offset: i32,
    pub patches: Vec<Patch>,
}

/// A logical submission, possibly posted in several versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchSeries {
    pub id: SeriesId,
    /// Message id of the root that started the series.
    pub message_id: String,
    /// Bare subject shared by every version.
    pub subject: String,
    pub versions: Vec<PatchSeriesVersion>,
}

impl PatchSeries {
    pub fn latest_version(&self) -> Option<u32> {
        self.versions.last().map(|v| v.version)
    }
}

/// A source-control commit keyed by its normalized subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub commit_id: i64,
    pub revision: String,
    pub subject: String,
    pub author: MemberId,
    pub committer: MemberId,
    pub author_date: NaiveDateTime,
    pub author_tz: i32,
    pub commit_date: NaiveDateTime,
    pub commit_tz: i32,
    /// Message id of the patch that claimed this commit.
    pub patch: Option<String>,
}

/// Everything one run produces, handed to the persistence collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub commits: BTreeMap<String, Commit>,
    pub series: Vec<PatchSeries>,
    pub members: Vec<Member>,
    pub diagnostics: Vec<AssemblyDiagnostic>,
    pub link_issues: Vec<LinkIssue>,
    pub stats: AssemblyStats,
}

impl Assembly {
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.0)
    }

    /// The commit a patch was correlated with, if any.
    pub fn commit_for(&self, patch: &Patch) -> Option<&Commit> {
        patch.commit.as_ref().and_then(|key| self.commits.get(key))
    }
}
