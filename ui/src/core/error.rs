//! Error taxonomy shared by the loader, renderer and report builder.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("couldn't read dataset at {path}: {source}")]
    DatasetUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing artifact {name} (expected at {path})")]
    MissingArtifact { name: &'static str, path: PathBuf },

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("report generation failed: {0}")]
    Report(String),

    #[error("pivot needs exactly two grouping keys, got {0}")]
    PivotShape(usize),
}

impl DashboardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the report precondition failure that a fresh render can fix.
    pub fn is_missing_artifact(&self) -> bool {
        matches!(self, Self::MissingArtifact { .. })
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
