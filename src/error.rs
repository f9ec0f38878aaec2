use serde::Serialize;
use std::io;
use thiserror::Error;

/// A subject line that does not carry a parseable `[PATCH ...]` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("unable to parse patch subject `{subject}`")]
pub struct SubjectParseError {
    pub subject: String,
}

impl SubjectParseError {
    pub fn new(subject: impl Into<String>) -> Self {
        SubjectParseError {
            subject: subject.into(),
        }
    }
}

/// Errors raised by the retrieval collaborator. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source data: {0}")]
    Io(#[from] io::Error),
    #[error("failed to decode source data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("source backend error: {0}")]
    Backend(String),
}

/// Errors raised by the persistence collaborator.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write assembly: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode assembly: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to persist assembly to {path}: {error}")]
    Persist { path: String, error: io::Error },
}

/// Fatal failures of a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("message retrieval failed: {0}")]
    Messages(#[source] SourceError),
    #[error("people retrieval failed: {0}")]
    People(#[source] SourceError),
    #[error("commit retrieval failed: {0}")]
    Commits(#[source] SourceError),
    #[error("storing assembly failed: {0}")]
    Store(#[from] SinkError),
}
