//! Record decoder: turns the lines after a header into a canonical edge set.
//!
//! A record body is:
//!
//! ```text
//! <count> <v1> <v2> ...      additional edges (1-based pairs), or "0"
//! <src> <guard> <e1> ...     adjacency rows, repeated
//! <x> <y> ...                coordinate block (values above the threshold)
//! ```
//!
//! Adjacency rows end at a blank line, at a row with fewer than three tokens, at a
//! non-integer token, or when the source/guard value exceeds the coordinate threshold.

use std::collections::BTreeSet;

use crate::config::{EdgeCountMode, ParseConfig};
use crate::cursor::{LineCursor, RawLine, Token};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{DecodeError, EdgeListFault};
use crate::record::{ConfigurationHeader, ConfigurationRecord, Edge};

// ============================================================================
// Public API
// ============================================================================

/// Decodes the body of one configuration, starting at the additional-edges line.
///
/// On success the cursor rests on the first line that was not consumed (a blank line,
/// coordinate data, or the end of input).
///
/// # Errors
/// - [`DecodeError::Truncated`] if no additional-edges line follows the header.
/// - [`DecodeError::MalformedEdgeList`] if that line holds a non-integer token, or in
///   [`EdgeCountMode::Strict`] when its declared count disagrees with the tokens present.
pub fn decode<S: DiagnosticSink + ?Sized>(
    header: ConfigurationHeader,
    cursor: &mut LineCursor<'_, '_>,
    config: &ParseConfig,
    sink: &mut S,
) -> Result<ConfigurationRecord, DecodeError> {
    let Some(extra) = cursor.next_line() else {
        return Err(DecodeError::Truncated {
            line: header.line + 1,
        });
    };

    let mut edges = EdgeCollector {
        vertex_count: header.vertex_count,
        edges: BTreeSet::new(),
        sink,
    };

    decode_additional_edges(extra, config.edge_count_mode, &mut edges)?;

    while let Some(line) = cursor.peek() {
        if line.is_blank() {
            break;
        }
        let Some((source, targets)) =
            adjacency_row(line, config.coordinate_threshold, &mut *edges.sink)
        else {
            break;
        };
        for target in targets {
            edges.insert(line.number, source, target);
        }
        cursor.advance(1);
    }

    Ok(ConfigurationRecord {
        name: header.name,
        vertex_count: header.vertex_count,
        edges: edges.edges,
        line: header.line,
    })
}

// ============================================================================
// Internal
// ============================================================================

/// Bound-checks, converts and inserts 1-based pairs.
struct EdgeCollector<'k, S: ?Sized> {
    vertex_count: u32,
    edges: BTreeSet<Edge>,
    sink: &'k mut S,
}

impl<S: DiagnosticSink + ?Sized> EdgeCollector<'_, S> {
    fn insert(&mut self, line: usize, source: i64, target: i64) {
        let n = i64::from(self.vertex_count);
        if !(1..=n).contains(&source) || !(1..=n).contains(&target) {
            self.sink.report(Diagnostic::VertexOutOfRange {
                line,
                source,
                target,
                vertex_count: self.vertex_count,
            });
            return;
        }
        let u = (source - 1) as u32;
        let v = (target - 1) as u32;
        match Edge::new(u, v) {
            Some(edge) => {
                self.edges.insert(edge);
            }
            None => self.sink.report(Diagnostic::SelfLoop { line, vertex: u }),
        }
    }
}

fn malformed(line: &RawLine<'_>, token: Token<'_>) -> DecodeError {
    DecodeError::MalformedEdgeList {
        line: line.number,
        column: token.column,
        fault: EdgeListFault::NotAnInteger {
            token: token.text.to_owned(),
        },
    }
}

fn decode_additional_edges<S: DiagnosticSink + ?Sized>(
    line: &RawLine<'_>,
    mode: EdgeCountMode,
    edges: &mut EdgeCollector<'_, S>,
) -> Result<(), DecodeError> {
    let text = line.trimmed();
    if text.is_empty() || text == "0" {
        return Ok(());
    }

    let tokens: Vec<Token<'_>> = line.tokens().collect();
    let count_token = tokens[0];
    let declared = count_token.int().ok_or_else(|| malformed(line, count_token))?;
    let rest = &tokens[1..];

    let expected = declared.checked_mul(2).and_then(|d| d.checked_add(1));
    if expected != i64::try_from(tokens.len()).ok() {
        match mode {
            EdgeCountMode::Strict => {
                return Err(DecodeError::MalformedEdgeList {
                    line: line.number,
                    column: count_token.column,
                    fault: EdgeListFault::CountMismatch {
                        declared,
                        tokens: tokens.len(),
                        expected: expected.unwrap_or(i64::MAX),
                    },
                });
            }
            EdgeCountMode::Lenient => edges.sink.report(Diagnostic::EdgeCountMismatch {
                line: line.number,
                declared,
                found: rest.len() / 2,
            }),
        }
    }

    let pairs = rest.chunks_exact(2);
    let dangling = pairs.remainder().first().copied();
    for pair in pairs {
        let a = pair[0].int().ok_or_else(|| malformed(line, pair[0]))?;
        let b = pair[1].int().ok_or_else(|| malformed(line, pair[1]))?;
        edges.insert(line.number, a, b);
    }
    if let Some(token) = dangling {
        edges.sink.report(Diagnostic::DanglingEdgeToken {
            line: line.number,
            token: token.text.to_owned(),
        });
    }
    Ok(())
}

/// Reads one adjacency row as `(source, endpoints)`, or `None` when the run ends here.
fn adjacency_row<S: DiagnosticSink + ?Sized>(
    line: &RawLine<'_>,
    threshold: i64,
    sink: &mut S,
) -> Option<(i64, Vec<i64>)> {
    let tokens: Vec<Token<'_>> = line.tokens().collect();
    if tokens.len() < 3 {
        return None;
    }

    let non_numeric = |token: Token<'_>| Diagnostic::NonNumericToken {
        line: line.number,
        column: token.column,
        token: token.text.to_owned(),
    };

    let Some(source) = tokens[0].int() else {
        sink.report(non_numeric(tokens[0]));
        return None;
    };
    let Some(guard) = tokens[1].int() else {
        sink.report(non_numeric(tokens[1]));
        return None;
    };
    if source > threshold || guard > threshold {
        sink.report(Diagnostic::CoordinateBoundary { line: line.number });
        return None;
    }

    let mut targets = Vec::with_capacity(tokens.len() - 2);
    for &token in &tokens[2..] {
        let Some(target) = token.int() else {
            sink.report(non_numeric(token));
            return None;
        };
        if target > threshold {
            break;
        }
        targets.push(target);
    }
    Some((source, targets))
}

// ============================================================================
// Tests
// ============================================================================
