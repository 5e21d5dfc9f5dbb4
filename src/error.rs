//! Errors reported before the stepping engine starts.
//!
//! Anything that goes wrong once workers are inside the generation loop is
//! an engine defect and panics instead of surfacing here.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Zero workers were requested.
    #[error("worker count must be a positive integer")]
    NoWorkers,

    /// More workers than rows; some worker would own an empty range.
    #[error("worker count {workers} exceeds grid size {size}")]
    TooManyWorkers { workers: usize, size: usize },

    #[error("grid size must be a positive integer")]
    EmptyGrid,

    #[error("input is empty: expected a `<size> <steps>` header")]
    MissingHeader,

    #[error("malformed header {0:?}: expected `<size> <steps>`")]
    MalformedHeader(String),

    #[error("input ends before grid row {row} of {size}")]
    MissingRow { row: usize, size: usize },

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

impl Error {
    /// Whether the error comes from an invalid run configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::NoWorkers | Error::TooManyWorkers { .. } | Error::EmptyGrid
        )
    }

    /// Whether the error comes from malformed or unreadable input.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Error::MissingHeader
                | Error::MalformedHeader(_)
                | Error::MissingRow { .. }
                | Error::RowLength { .. }
                | Error::Io(_)
        )
    }
}
