// src/error.rs
//! Error types for fetching, tasks, the task graph and configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::sources::Source;
use crate::tasks::TaskId;

/// Why a source could not deliver its table.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect or read deadline expired.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("could not parse {site} page: {reason}")]
    Parse { site: Source, reason: String },

    /// The page parsed but yielded no rows. Treated as a failure so an
    /// empty artifact is never committed.
    #[error("{site} returned no rows")]
    Empty { site: Source },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Failure of a single task. Descendants of the task are not run.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("fetching {site} failed")]
    Fetch {
        site: Source,
        #[source]
        error: FetchError,
    },

    #[error("missing upstream artifact {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("column {column:?} not found in {artifact}")]
    MissingColumn { column: String, artifact: String },

    #[error("dependency {0} produced no output")]
    MissingInput(TaskId),
}

impl TaskError {
    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        TaskError::Io { path: path.into(), error }
    }
}

/// Rejected graph shapes. Raised before any task runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("task {0} is declared twice")]
    DuplicateTask(TaskId),

    #[error("tasks {first} and {second} both write {}", path.display())]
    DuplicateOutput { first: TaskId, second: TaskId, path: PathBuf },

    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("dependency cycle through {0}")]
    Cycle(TaskId),

    #[error("no task named {0}")]
    UnknownTarget(TaskId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("output directory must not be empty")]
    EmptyOutputDir,

    #[error("letter set must not be empty")]
    EmptyLetters,

    #[error("letter {0:?} is not an ASCII letter or digit")]
    InvalidLetter(char),

    #[error("combine needs at least one input artifact")]
    NoInputs,

    #[error("input artifact {0:?} listed twice")]
    DuplicateInput(String),

    #[error("input artifact {0:?} must be a plain file name")]
    InvalidInput(String),

    #[error("worker count must be at least 1")]
    NoWorkers,
}
