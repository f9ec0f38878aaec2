//! Local failures recorded during assembly
//!
//! None of these stop a run: the failing thread, reply, or commit is skipped
//! and the next one is processed.

use serde::Serialize;
use std::fmt;

use crate::error::SubjectParseError;

/// Where a subject parse failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticScope {
    /// The thread root; the whole thread is skipped
    Root,
    /// A reply to a cover letter; only that reply is skipped
    Reply,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssemblyDiagnostic {
    /// The root subject does not look like `[PATCH ...] ...`
    ThreadRejected { message_id: String, subject: String },
    SubjectParse {
        scope: DiagnosticScope,
        message_id: String,
        thread_root: String,
        error: SubjectParseError,
    },
    /// A commit names a person missing from the people table
    UnknownPerson {
        commit_id: i64,
        revision: String,
        person_id: i64,
    },
    /// A version was appended after a higher one in the same series
    VersionRegression {
        series_message_id: String,
        previous: u32,
        version: u32,
    },
}

impl AssemblyDiagnostic {
    pub fn log(&self) {
        log::warn!("{}", self);
    }
}

impl fmt::Display for AssemblyDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyDiagnostic::ThreadRejected {
                message_id,
                subject,
            } => write!(f, "not a valid patch thread {}: {}", message_id, subject),
            AssemblyDiagnostic::SubjectParse {
                scope: DiagnosticScope::Root,
                message_id,
                error,
                ..
            } => write!(f, "thread {} skipped: {}", message_id, error),
            AssemblyDiagnostic::SubjectParse {
                scope: DiagnosticScope::Reply,
                message_id,
                thread_root,
                error,
            } => write!(
                f,
                "reply {} in thread {} skipped: {}",
                message_id, thread_root, error
            ),
            AssemblyDiagnostic::UnknownPerson {
                commit_id,
                revision,
                person_id,
            } => write!(
                f,
                "commit {} ({}) skipped: unknown person {}",
                commit_id, revision, person_id
            ),
            AssemblyDiagnostic::VersionRegression {
                series_message_id,
                previous,
                version,
            } => write!(
                f,
                "series {} got version {} after version {}",
                series_message_id, version, previous
            ),
        }
    }
}
