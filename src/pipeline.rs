//! Run orchestration
//!
//! A run reads messages, people, and commits from the retrieval side, builds
//! the reply forest, assembles series, and hands the finished [`Assembly`] to
//! the persistence side in one call. Any retrieval failure aborts the run
//! before anything is stored.

use crate::config::{AssemblyConfig, DateRange};
use crate::error::{PipelineError, SinkError, SourceError};
use crate::models::{Assembly, CommitRecord, MessageRecord, Person};
use crate::patches::assemble;
use crate::threading::build_threads;

/// Retrieval of patch-bearing mailing-list messages
pub trait MessageSource {
    /// Messages dated inside `range` whose subject contains `[PATCH`, oldest first
    fn fetch_messages(&self, range: &DateRange) -> Result<Vec<MessageRecord>, SourceError>;
}

/// Retrieval of the commit log and the people it refers to
pub trait CommitSource {
    fn fetch_people(&self) -> Result<Vec<Person>, SourceError>;

    /// Commits dated inside `range` that touch at least one file, oldest first
    fn fetch_commits(&self, range: &DateRange) -> Result<Vec<CommitRecord>, SourceError>;
}

/// Persistence of a finished run
pub trait AssemblySink {
    fn store(&mut self, assembly: &Assembly) -> Result<(), SinkError>;
}

/// Execute one full run
pub fn run<M, C, S>(
    messages: &M,
    commits: &C,
    sink: &mut S,
    range: &DateRange,
    config: &AssemblyConfig,
) -> Result<Assembly, PipelineError>
where
    M: MessageSource + ?Sized,
    C: CommitSource + ?Sized,
    S: AssemblySink + ?Sized,
{
    log::info!("reading messages from {} to {}", range.from, range.to);
    let records = messages
        .fetch_messages(range)
        .map_err(PipelineError::Messages)?;
    let people = commits.fetch_people().map_err(PipelineError::People)?;
    let commit_records = commits
        .fetch_commits(range)
        .map_err(PipelineError::Commits)?;

    log::info!(
        "retrieved {} messages, {} commits, {} people",
        records.len(),
        commit_records.len(),
        people.len()
    );

    let forest = build_threads(records, config.clean_subjects);
    log::info!("built {} threads", forest.roots().len());

    let assembly = assemble(&forest, &commit_records, &people, config);
    sink.store(&assembly)?;

    Ok(assembly)
}
