//! Patch-series history reconstruction
//!
//! Rebuilds patch series from a flat stream of mailing-list messages and
//! correlates each patch with the commit that applied it.
//!
//! ```text
//! message records ─► threading ─► ThreadForest ─┐
//!                                               ├─► patches::assemble ─► Assembly
//! commit records + people ──────────────────────┘
//! ```
//!
//! [`pipeline::run`] wires the stages to a retrieval source and a
//! persistence sink; [`snapshot`] provides JSON-file implementations of both.

pub mod config;
pub mod error;
pub mod models;
pub mod patches;
pub mod pipeline;
pub mod snapshot;
pub mod threading;

pub use config::{AssemblyConfig, DateRange};
pub use error::{PipelineError, SinkError, SourceError, SubjectParseError};
pub use models::Assembly;
pub use patches::assemble;
pub use pipeline::run;
pub use threading::build_threads;
