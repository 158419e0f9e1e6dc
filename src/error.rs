//! Error taxonomy: repository, directive resolution, descriptor grammar, configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a mail repository.
///
/// `NotFound` and `Parse` concern a single record and are skipped inside a
/// `raw-list` directive. `ScopeNotFound` means a whole scope is missing and
/// always aborts the directive.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("message not found: {0}")]
    NotFound(String),

    #[error("failed to parse message {id}: {reason}")]
    Parse { id: String, reason: String },

    #[error("mail scope not found: {}", .0.display())]
    ScopeNotFound(PathBuf),

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    /// Whether the failure is confined to one record.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Parse { .. })
    }
}

/// Failures while turning a directive string into email records.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed directive '{0}': expected '<source>: <params>'")]
    Malformed(String),

    #[error("invalid range '{0}': expected '<min>~<max>' with integer bounds")]
    Range(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Fatal descriptor errors. Any of these aborts the whole file.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("line {line}: {message}")]
    Grammar { line: usize, message: String },

    #[error("line {line}: {source}")]
    Resolve {
        line: usize,
        #[source]
        source: ResolveError,
    },
}

impl DescriptorError {
    pub fn grammar(line: usize, message: impl Into<String>) -> Self {
        Self::Grammar {
            line,
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Grammar { line, .. } | Self::Resolve { line, .. } => *line,
        }
    }
}

/// Invalid arguments or configuration, reported before any processing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("permutation length {length} exceeds the {available} available items")]
    LengthExceedsItems { length: usize, available: usize },

    #[error("unknown condition pattern '{name}' for {task} tasks (expected one of: {expected})")]
    UnknownPattern {
        name: String,
        task: String,
        expected: String,
    },

    #[error("permutation length {length} does not fit pattern '{pattern}' (needs {expected})")]
    PatternLength {
        pattern: String,
        length: usize,
        expected: usize,
    },

    #[error("{count} inputs cannot be split evenly into {groups} groups")]
    UnevenGroups { count: usize, groups: usize },

    #[error("inbox '{0}' not found in manifest")]
    MissingManifestEntry(String),

    #[error("{0}")]
    Invalid(String),
}
