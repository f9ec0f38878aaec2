//! JSON snapshot adapters
//!
//! A snapshot is an export of the message and commit archives:
//!
//! ```json
//! { "messages": [...], "people": [...], "commits": [...] }
//! ```
//!
//! [`SnapshotSource`] applies the same filters and ordering the archive
//! queries apply, so a snapshot can stand in for the live stores.
//! [`JsonFileSink`] writes a finished run to disk atomically.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::DateRange;
use crate::error::{SinkError, SourceError};
use crate::models::{Assembly, CommitRecord, MessageRecord, Person};
use crate::pipeline::{AssemblySink, CommitSource, MessageSource};

/// Subject marker every retrieved message must contain (any letter case)
const PATCH_MARKER: &str = "[patch";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSource {
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

impl SnapshotSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = fs::File::open(path.as_ref())?;
        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(snapshot)
    }
}

impl MessageSource for SnapshotSource {
    fn fetch_messages(&self, range: &DateRange) -> Result<Vec<MessageRecord>, SourceError> {
        let mut messages: Vec<MessageRecord> = self
            .messages
            .iter()
            .filter(|m| range.contains(&m.date))
            .filter(|m| m.subject.to_lowercase().contains(PATCH_MARKER))
            .cloned()
            .collect();
        // Stable: equal dates keep snapshot order
        messages.sort_by_key(|m| m.date);
        Ok(messages)
    }
}

impl CommitSource for SnapshotSource {
    fn fetch_people(&self) -> Result<Vec<Person>, SourceError> {
        Ok(self.people.clone())
    }

    fn fetch_commits(&self, range: &DateRange) -> Result<Vec<CommitRecord>, SourceError> {
        let mut commits: Vec<CommitRecord> = self
            .commits
            .iter()
            .filter(|c| c.has_file_actions && range.contains(&c.commit_date))
            .cloned()
            .collect();
        commits.sort_by_key(|c| c.commit_date);
        Ok(commits)
    }
}

/// Writes an [`Assembly`] as pretty JSON, replacing the target in one rename
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AssemblySink for JsonFileSink {
    fn store(&mut self, assembly: &Assembly) -> Result<(), SinkError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut staged = tempfile::NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, assembly)?;
            writer.flush()?;
        }

        staged
            .persist(&self.path)
            .map_err(|err| SinkError::Persist {
                path: self.path.display().to_string(),
                error: err.error,
            })?;

        log::info!(
            "wrote {} series and {} commits to {}",
            assembly.series.len(),
            assembly.commits.len(),
            self.path.display()
        );
        Ok(())
    }
}
