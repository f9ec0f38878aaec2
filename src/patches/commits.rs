//! Commit indexing by normalized subject
//!
//! Commits are keyed by the normalized first line of their message so that a
//! patch's bare subject can be looked up directly. Two commits sharing a key
//! resolve to the later one.

use std::collections::{BTreeMap, HashMap};

use super::diagnostics::AssemblyDiagnostic;
use super::members::MemberRegistry;
use super::normalize::normalize_key;
use crate::models::{Commit, CommitRecord, Person};

/// Commits of one run, keyed by normalized subject
#[derive(Debug, Default)]
pub struct CommitIndex {
    commits: BTreeMap<String, Commit>,
    indexed: usize,
    skipped: usize,
}

impl CommitIndex {
    /// Index commit records, resolving authors and committers to members
    ///
    /// Records whose author or committer id is missing from `people` are
    /// skipped and reported through `diagnostics`.
    pub fn build(
        records: &[CommitRecord],
        people: &[Person],
        members: &mut MemberRegistry,
        diagnostics: &mut Vec<AssemblyDiagnostic>,
    ) -> Self {
        let emails: HashMap<i64, &str> = people
            .iter()
            .map(|person| (person.id, person.email.as_str()))
            .collect();

        let mut index = CommitIndex::default();

        for record in records {
            let (author, committer) = match (
                emails.get(&record.author_id),
                emails.get(&record.committer_id),
            ) {
                (Some(author), Some(committer)) => (*author, *committer),
                (author, _) => {
                    let person_id = if author.is_none() {
                        record.author_id
                    } else {
                        record.committer_id
                    };
                    let diagnostic = AssemblyDiagnostic::UnknownPerson {
                        commit_id: record.commit_id,
                        revision: record.revision.clone(),
                        person_id,
                    };
                    diagnostic.log();
                    diagnostics.push(diagnostic);
                    index.skipped += 1;
                    continue;
                }
            };

            let subject = record.message.split('\n').next().unwrap_or("").trim();

            let commit = Commit {
                commit_id: record.commit_id,
                revision: record.revision.clone(),
                subject: subject.to_string(),
                author: members.resolve(author),
                committer: members.resolve(committer),
                author_date: record.author_date,
                author_tz: record.author_tz,
                commit_date: record.commit_date,
                commit_tz: record.commit_tz,
                patch: None,
            };

            let key = normalize_key(subject);
            if let Some(previous) = index.commits.insert(key.clone(), commit) {
                log::debug!(
                    "commit {} replaces {} under key `{}`",
                    record.revision,
                    previous.revision,
                    key
                );
            }
            index.indexed += 1;
        }

        index
    }

    /// Claim the commit stored under `key` for a patch
    ///
    /// Returns the key when the commit exists and no other patch claimed it
    /// yet. A claimed commit is never reassigned.
    pub fn claim(&mut self, key: &str, patch_message_id: &str) -> Option<String> {
        let commit = self.commits.get_mut(key)?;
        if commit.patch.is_some() {
            return None;
        }
        commit.patch = Some(patch_message_id.to_string());
        Some(key.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&Commit> {
        self.commits.get(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Records indexed, overwritten ones included
    pub fn indexed(&self) -> usize {
        self.indexed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn matched(&self) -> usize {
        self.commits.values().filter(|c| c.patch.is_some()).count()
    }

    pub fn into_map(self) -> BTreeMap<String, Commit> {
        self.commits
    }
}
