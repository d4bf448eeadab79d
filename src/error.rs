//! Error types.
//!
//! Recoverable problems inside a record are [`Diagnostic`](crate::diagnostics::Diagnostic)s,
//! not errors. [`DecodeError`] aborts a single record; [`HarnessError`] is fatal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why an edge list could not be decoded.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EdgeListFault {
    /// A token that must be an integer is not.
    #[error("expected an integer, found {token:?}")]
    NotAnInteger {
        /// The offending token.
        token: String,
    },
    /// Strict mode: the declared count disagrees with the tokens present.
    #[error("declared {declared} edges but the line holds {tokens} tokens (expected {expected})")]
    CountMismatch {
        /// Count given by the first token.
        declared: i64,
        /// Tokens on the line, count token included.
        tokens: usize,
        /// `1 + 2 * declared`.
        expected: i64,
    },
}

/// A structural failure that aborts decoding of one record.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before the additional-edges line.
    #[error("line {line}: input ends before the additional-edges line")]
    Truncated {
        /// Line number of the parameter line.
        line: usize,
    },
    /// The additional-edges line is malformed.
    #[error("line {line}, column {column}: malformed edge list: {fault}")]
    MalformedEdgeList {
        /// 1-based line number.
        line: usize,
        /// 1-based column of the offending token.
        column: usize,
        /// What was wrong.
        fault: EdgeListFault,
    },
}

impl DecodeError {
    /// Source line the error refers to.
    pub const fn line(&self) -> usize {
        match self {
            Self::Truncated { line } | Self::MalformedEdgeList { line, .. } => *line,
        }
    }
}

/// Errors reading or writing the flat graph format.
#[derive(Error, Debug)]
pub enum FlatFileError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file has no leading vertex count.
    #[error("missing vertex count")]
    MissingVertexCount,
    /// The vertex count is not in `1..=MAX_FLAT_VERTICES`.
    #[error("invalid number of vertices: {0}")]
    InvalidVertexCount(String),
    /// A `k=` line whose value is not an integer.
    #[error("invalid critical k: {0:?}")]
    InvalidCriticalK(String),
}

/// Fatal errors surfaced to the caller.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A file or directory could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A flat graph file is malformed.
    #[error("{}: {source}", .path.display())]
    Flat {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: FlatFileError,
    },
    /// A record's vertex count cannot be expressed in the flat format.
    #[error(
        "configuration {name} (line {line}) has {vertex_count} vertices; \
         the flat format accepts 1..={max}"
    )]
    VertexCountOutOfRange {
        /// Record name.
        name: String,
        /// Line of the record's name.
        line: usize,
        /// Vertex count from the header.
        vertex_count: u32,
        /// Largest vertex count the flat format accepts.
        max: u32,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
