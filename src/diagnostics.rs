//! Recoverable parse events.
//!
//! Nothing reported here aborts a record. The scanner hands every event to a
//! [`DiagnosticSink`]; the default [`LogSink`] forwards them to the `log` facade.

use std::fmt;

/// A recoverable issue encountered while scanning or decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A name candidate was not followed by a valid parameter line.
    HeaderRejected {
        /// Line of the rejected name candidate.
        line: usize,
    },
    /// A non-integer token ended an adjacency run.
    NonNumericToken {
        /// Line number.
        line: usize,
        /// 1-based column of the token.
        column: usize,
        /// Token text.
        token: String,
    },
    /// A vertex index was outside `1..=vertex_count`; the edge was dropped.
    VertexOutOfRange {
        /// Line number.
        line: usize,
        /// 1-based first endpoint as written.
        source: i64,
        /// 1-based second endpoint as written.
        target: i64,
        /// Vertex count from the header.
        vertex_count: u32,
    },
    /// The additional-edges line had an odd trailing token.
    DanglingEdgeToken {
        /// Line number.
        line: usize,
        /// The unpaired token.
        token: String,
    },
    /// An edge from a vertex to itself was dropped.
    SelfLoop {
        /// Line number.
        line: usize,
        /// 0-based vertex.
        vertex: u32,
    },
    /// A value above the coordinate threshold ended adjacency parsing.
    CoordinateBoundary {
        /// Line number.
        line: usize,
    },
    /// Lenient mode: the declared additional-edge count disagrees with the pairs present.
    EdgeCountMismatch {
        /// Line number.
        line: usize,
        /// Count given by the first token.
        declared: i64,
        /// Complete pairs found.
        found: usize,
    },
}

impl Diagnostic {
    /// Source line the event refers to.
    pub const fn line(&self) -> usize {
        match self {
            Self::HeaderRejected { line }
            | Self::NonNumericToken { line, .. }
            | Self::VertexOutOfRange { line, .. }
            | Self::DanglingEdgeToken { line, .. }
            | Self::SelfLoop { line, .. }
            | Self::CoordinateBoundary { line }
            | Self::EdgeCountMismatch { line, .. } => *line,
        }
    }

    /// Whether the event dropped data a reader would likely care about.
    ///
    /// Header rejections, self-loops and coordinate boundaries are routine.
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::NonNumericToken { .. }
                | Self::VertexOutOfRange { .. }
                | Self::DanglingEdgeToken { .. }
                | Self::EdgeCountMismatch { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderRejected { line } => {
                write!(f, "line {line}: not a configuration header, skipping")
            }
            Self::NonNumericToken {
                line,
                column,
                token,
            } => write!(
                f,
                "line {line}, column {column}: non-numeric token {token:?} ends adjacency data"
            ),
            Self::VertexOutOfRange {
                line,
                source,
                target,
                vertex_count,
            } => write!(
                f,
                "line {line}: invalid edge ({source}->{target}) with n={vertex_count}, dropped"
            ),
            Self::DanglingEdgeToken { line, token } => {
                write!(f, "line {line}: unpaired additional-edge token {token:?} dropped")
            }
            Self::SelfLoop { line, vertex } => {
                write!(f, "line {line}: self-loop at vertex {vertex} dropped")
            }
            Self::CoordinateBoundary { line } => {
                write!(f, "line {line}: coordinate data reached")
            }
            Self::EdgeCountMismatch {
                line,
                declared,
                found,
            } => write!(
                f,
                "line {line}: declared {declared} additional edges, found {found}"
            ),
        }
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticSink {
    /// Handles one event.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards warnings to `log::warn!` and routine events to `log::debug!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            log::warn!("{diagnostic}");
        } else {
            log::debug!("{diagnostic}");
        }
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for FnSink<F> {
    fn report(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic);
    }
}

// ============================================================================
// Counts
// ============================================================================

/// Per-kind tallies of reported events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    /// [`Diagnostic::HeaderRejected`].
    pub headers_rejected: usize,
    /// [`Diagnostic::NonNumericToken`].
    pub non_numeric_tokens: usize,
    /// [`Diagnostic::VertexOutOfRange`].
    pub out_of_range: usize,
    /// [`Diagnostic::DanglingEdgeToken`].
    pub dangling_tokens: usize,
    /// [`Diagnostic::SelfLoop`].
    pub self_loops: usize,
    /// [`Diagnostic::CoordinateBoundary`].
    pub coordinate_boundaries: usize,
    /// [`Diagnostic::EdgeCountMismatch`].
    pub count_mismatches: usize,
}

impl DiagnosticCounts {
    /// Records one event.
    pub fn tally(&mut self, diagnostic: &Diagnostic) {
        let slot = match diagnostic {
            Diagnostic::HeaderRejected { .. } => &mut self.headers_rejected,
            Diagnostic::NonNumericToken { .. } => &mut self.non_numeric_tokens,
            Diagnostic::VertexOutOfRange { .. } => &mut self.out_of_range,
            Diagnostic::DanglingEdgeToken { .. } => &mut self.dangling_tokens,
            Diagnostic::SelfLoop { .. } => &mut self.self_loops,
            Diagnostic::CoordinateBoundary { .. } => &mut self.coordinate_boundaries,
            Diagnostic::EdgeCountMismatch { .. } => &mut self.count_mismatches,
        };
        *slot += 1;
    }

    /// Events that dropped data (see [`Diagnostic::is_warning`]).
    pub const fn warnings(&self) -> usize {
        self.non_numeric_tokens + self.out_of_range + self.dangling_tokens + self.count_mismatches
    }
}

// ============================================================================
// Tests
// ============================================================================
