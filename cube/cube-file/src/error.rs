//! Error types for cube file parsing.

use thiserror::Error;

/// Result type for cube file operations.
pub type CubeResult<T> = Result<T, CubeError>;

/// Errors that can occur while reading a cube file.
///
/// Line numbers are 1-based and count the two comment lines.
#[derive(Debug, Error)]
pub enum CubeError {
    /// A header or atom line is missing, short, or not numeric.
    #[error("line {line}: malformed header: {reason}")]
    MalformedHeader {
        /// Line the problem was found on.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// The voxel payload could not be read.
    #[error("line {line}: malformed voxel data: {reason}")]
    MalformedData {
        /// Line the problem was found on.
        line: usize,
        /// Position in the flattened payload, when known.
        index: Option<usize>,
        /// What was wrong.
        reason: String,
    },

    /// An atom line names an atomic number outside the element table.
    #[error("line {line}: unknown atomic number {atomic_number} (expected 0-96)")]
    UnknownElement {
        /// Line of the atom.
        line: usize,
        /// The atomic number as written.
        atomic_number: i64,
    },

    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CubeError {
    pub(crate) fn header(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    /// Line the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedHeader { line, .. }
            | Self::MalformedData { line, .. }
            | Self::UnknownElement { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
