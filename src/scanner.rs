//! Segment scanner: finds configuration headers and drives the decoder.
//!
//! A header is a name line followed by a line whose first four tokens are non-negative
//! integers (`n r a b`). Lookahead is exactly one line; a rejected candidate is treated as
//! noise and the search retries on the next line.

use std::fs;
use std::path::Path;

use crate::config::{FailurePolicy, ParseConfig};
use crate::cursor::{split_lines, LineCursor, RawLine};
use crate::decoder::decode;
use crate::diagnostics::{Diagnostic, DiagnosticCounts, DiagnosticSink, LogSink};
use crate::error::{DecodeError, HarnessError};
use crate::record::{ConfigurationHeader, ConfigurationRecord};

// ============================================================================
// Outcomes
// ============================================================================

/// A configuration whose header was found but whose body could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Name from the header.
    pub name: String,
    /// Line of the name.
    pub line: usize,
    /// Why decoding failed.
    pub error: DecodeError,
}

/// Result of one header: a decoded record, or the reason it was skipped.
pub type RecordOutcome = Result<ConfigurationRecord, SkippedRecord>;

// ============================================================================
// Scanner
// ============================================================================

/// Lazy, single-pass iterator over the configurations in a line buffer.
///
/// ```
/// use qi_harness::cursor::split_lines;
/// use qi_harness::config::ParseConfig;
/// use qi_harness::diagnostics::NullSink;
/// use qi_harness::scanner::Scanner;
///
/// let lines = split_lines("0.7322\n3 3 0 0\n0\n1 5 2 3\n15000 3000\n\n");
/// let mut scanner = Scanner::new(&lines, ParseConfig::default(), NullSink);
/// let record = scanner.next().unwrap().unwrap();
/// assert_eq!(record.name, "0.7322");
/// assert_eq!(record.edge_count(), 2);
/// assert!(scanner.next().is_none());
/// ```
pub struct Scanner<'s, 'a, S = LogSink> {
    cursor: LineCursor<'s, 'a>,
    config: ParseConfig,
    sink: S,
    counts: DiagnosticCounts,
    halted: bool,
}

impl<'s, 'a, S: DiagnosticSink> Scanner<'s, 'a, S> {
    /// Creates a scanner positioned at the first line.
    pub fn new(lines: &'s [RawLine<'a>], config: ParseConfig, sink: S) -> Self {
        Self {
            cursor: LineCursor::new(lines),
            config,
            sink,
            counts: DiagnosticCounts::default(),
            halted: false,
        }
    }

    /// Index of the next line the scanner will look at.
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Tallies of diagnostics reported so far.
    pub const fn diagnostic_counts(&self) -> DiagnosticCounts {
        self.counts
    }

    /// Whether an [`FailurePolicy::AbortAll`] failure stopped the scan.
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Consumes the scanner and returns its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.counts.tally(&diagnostic);
        self.sink.report(diagnostic);
    }

    fn next_header(&mut self) -> Option<ConfigurationHeader> {
        loop {
            self.cursor.skip_blank();
            let name_line = self.cursor.peek()?;
            let params_line = self.cursor.peek_ahead(1)?;

            if let Some([vertex_count, ring_size, card_c, card_c_prime]) = parse_params(params_line)
            {
                self.cursor.advance(2);
                return Some(ConfigurationHeader {
                    name: name_line.trimmed().to_owned(),
                    vertex_count,
                    ring_size,
                    card_c,
                    card_c_prime,
                    line: name_line.number,
                });
            }

            self.report(Diagnostic::HeaderRejected {
                line: name_line.number,
            });
            self.cursor.advance(1);
        }
    }
}

impl<S: DiagnosticSink> Iterator for Scanner<'_, '_, S> {
    type Item = RecordOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let header = self.next_header()?;
        let name = header.name.clone();
        let line = header.line;

        let mut tally = Tally {
            counts: &mut self.counts,
            inner: &mut self.sink,
        };
        match decode(header, &mut self.cursor, &self.config, &mut tally) {
            Ok(record) => {
                self.cursor.skip_to_boundary();
                Some(Ok(record))
            }
            Err(error) => {
                log::warn!("skipping configuration {name:?} (line {line}): {error}");
                match self.config.failure_policy {
                    FailurePolicy::SkipOne => self.cursor.skip_to_boundary(),
                    FailurePolicy::AbortAll => self.halted = true,
                }
                Some(Err(SkippedRecord { name, line, error }))
            }
        }
    }
}

/// Counts diagnostics on their way to the caller's sink.
struct Tally<'x, S> {
    counts: &'x mut DiagnosticCounts,
    inner: &'x mut S,
}

impl<S: DiagnosticSink> DiagnosticSink for Tally<'_, S> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.counts.tally(&diagnostic);
        self.inner.report(diagnostic);
    }
}

/// Returns the first four tokens as `u32`s if the line is a parameter line.
fn parse_params(line: &RawLine<'_>) -> Option<[u32; 4]> {
    let mut tokens = line.tokens();
    let mut params = [0u32; 4];
    for slot in &mut params {
        *slot = tokens.next()?.text.parse().ok()?;
    }
    Some(params)
}

// ============================================================================
// Whole-input entry points
// ============================================================================

/// Everything a full scan produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Successfully decoded records in source order.
    pub records: Vec<ConfigurationRecord>,
    /// Records whose header was found but whose body failed to decode.
    pub skipped: Vec<SkippedRecord>,
    /// Whether [`FailurePolicy::AbortAll`] cut the scan short.
    pub aborted: bool,
    /// Tallies of recoverable events.
    pub diagnostics: DiagnosticCounts,
}

impl ParseReport {
    /// Whether no record was skipped and nothing dropped data.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.diagnostics.warnings() == 0
    }
}

/// Scans a line buffer to completion, reporting diagnostics to `sink`.
pub fn parse_lines_with<S: DiagnosticSink>(
    lines: &[RawLine<'_>],
    config: &ParseConfig,
    sink: S,
) -> ParseReport {
    let mut scanner = Scanner::new(lines, config.clone(), sink);
    let mut report = ParseReport::default();
    for outcome in scanner.by_ref() {
        match outcome {
            Ok(record) => report.records.push(record),
            Err(skipped) => report.skipped.push(skipped),
        }
    }
    report.aborted = scanner.is_halted();
    report.diagnostics = scanner.diagnostic_counts();

    if !report.skipped.is_empty() {
        log::warn!(
            "{} configuration(s) skipped, {} decoded",
            report.skipped.len(),
            report.records.len()
        );
    }
    log::debug!(
        "scan finished: {} records, {} diagnostics dropped data",
        report.records.len(),
        report.diagnostics.warnings()
    );
    report
}

/// Scans a line buffer, logging diagnostics.
pub fn parse_lines(lines: &[RawLine<'_>], config: &ParseConfig) -> ParseReport {
    parse_lines_with(lines, config, LogSink)
}

/// Scans in-memory text, logging diagnostics.
pub fn parse_str(text: &str, config: &ParseConfig) -> ParseReport {
    parse_lines(&split_lines(text), config)
}

/// Reads a whole file, then scans it.
///
/// # Errors
/// Returns [`HarnessError::Io`] if the file cannot be read. No partial results are produced.
pub fn parse_file(path: impl AsRef<Path>, config: &ParseConfig) -> Result<ParseReport, HarnessError> {
    parse_file_with(path, config, LogSink)
}

/// Reads a whole file, then scans it, reporting diagnostics to `sink`.
///
/// # Errors
/// Returns [`HarnessError::Io`] if the file cannot be read. No partial results are produced.
pub fn parse_file_with<S: DiagnosticSink>(
    path: impl AsRef<Path>,
    config: &ParseConfig,
    sink: S,
) -> Result<ParseReport, HarnessError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    log::info!("parsing configurations from {}", path.display());
    Ok(parse_lines_with(&split_lines(&text), config, sink))
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgeCountMode;
    use crate::diagnostics::NullSink;
    use crate::error::EdgeListFault;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::collections::BTreeSet;

    fn parse(text: &str) -> ParseReport {
        parse_lines_with(&split_lines(text), &ParseConfig::default(), NullSink)
    }

    fn pairs(record: &ConfigurationRecord) -> Vec<(u32, u32)> {
        record.edge_pairs().collect()
    }

    // -------------------------------------------------------------------------
    // Header detection
    // -------------------------------------------------------------------------

    #[test]
    fn additional_edges_only_record() {
        let report = parse("name\n5 0 0 0\n2 1 2 4 5\n\n");
        assert_eq!(report.records.len(), 1);
        let rec = &report.records[0];
        assert_eq!(rec.name, "name");
        assert_eq!(rec.vertex_count, 5);
        assert_eq!(pairs(rec), vec![(0, 1), (3, 4)]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn rejected_candidate_does_not_hide_next_header() {
        // "intro" is followed by a 3-token line, so it is noise; "1 2 3" is then
        // itself a candidate followed by a non-integer line.
        let text = "intro\n1 2 3\nreal\n4 4 0 0\n0\n1 2 2\n\n";
        let report = parse(text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "real");
        assert_eq!(report.records[0].line, 3);
        assert_eq!(pairs(&report.records[0]), vec![(0, 1)]);
        assert_eq!(report.diagnostics.headers_rejected, 2);
    }

    #[test]
    fn parameter_line_with_non_integer_is_rejected() {
        let report = parse("a\n4 4 x 0\nb\n3 3 0 0\n0\n\n");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "b");
    }

    #[test]
    fn extra_parameter_tokens_are_ignored() {
        let report = parse("a\n4 4 1 1 9 9\n0\n\n");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].vertex_count, 4);
    }

    #[test]
    fn name_is_trimmed() {
        let report = parse("   2.122  \n3 3 0 0\n0\n\n");
        assert_eq!(report.records[0].name, "2.122");
    }

    #[test]
    fn lone_trailing_line_ends_scan() {
        let report = parse("\n\norphan");
        assert!(report.records.is_empty());
        assert!(report.skipped.is_empty());
    }

    // -------------------------------------------------------------------------
    // Record boundaries
    // -------------------------------------------------------------------------

    #[test]
    fn coordinate_block_is_skipped_between_records() {
        let text = "\
first
3 3 0 0
0
1 3 2 3
2 2 3
12000 13000 14000
1 2 3 4 5 6
7 8 9 10

second
2 2 0 0
1 1 2
";
        let report = parse(text);
        assert_eq!(report.records.len(), 2);
        assert_eq!(pairs(&report.records[0]), vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(report.records[1].name, "second");
        assert_eq!(pairs(&report.records[1]), vec![(0, 1)]);
        assert_eq!(report.diagnostics.coordinate_boundaries, 1);
    }

    #[test]
    fn duplicate_rows_yield_single_edge() {
        let report = parse("d\n2 2 0 0\n1 1 2\n1 2 2\n2 1 1\n\n");
        assert_eq!(pairs(&report.records[0]), vec![(0, 1)]);
    }

    #[test]
    fn record_without_trailing_blank_line_is_emitted() {
        let report = parse("x\n3 3 0 0\n0\n1 1 3");
        assert_eq!(report.records.len(), 1);
        assert_eq!(pairs(&report.records[0]), vec![(0, 2)]);
    }

    // -------------------------------------------------------------------------
    // Failure policy
    // -------------------------------------------------------------------------

    #[test]
    fn truncated_record_is_skipped() {
        let report = parse("ok\n2 2 0 0\n1 1 2\n\ncut\n4 4 0 0");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "cut");
        assert_eq!(report.skipped[0].error, DecodeError::Truncated { line: 6 });
        assert!(!report.aborted);
        assert!(!report.is_clean());
    }

    const WITH_MALFORMED: &str = "\
bad
4 4 0 0
2 1 oops
1 2 2
99999 1

good
3 3 0 0
0
1 2 2

";

    #[test]
    fn skip_one_resumes_after_malformed_record() {
        let report = parse(WITH_MALFORMED);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0].error,
            DecodeError::MalformedEdgeList {
                line: 3,
                column: 5,
                fault: EdgeListFault::NotAnInteger { .. }
            }
        ));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "good");
        assert_eq!(pairs(&report.records[0]), vec![(0, 1)]);
    }

    #[test]
    fn abort_all_stops_at_first_failure() {
        let config = ParseConfig {
            failure_policy: FailurePolicy::AbortAll,
            ..ParseConfig::default()
        };
        let report = parse_lines_with(&split_lines(WITH_MALFORMED), &config, NullSink);
        assert!(report.aborted);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.records.is_empty());
    }

    #[test]
    fn strict_count_mode_skips_mismatched_record() {
        let config = ParseConfig {
            edge_count_mode: EdgeCountMode::Strict,
            ..ParseConfig::default()
        };
        let text = "a\n4 4 0 0\n2 1 2\n\nb\n4 4 0 0\n1 1 2\n\n";
        let report = parse_lines_with(&split_lines(text), &config, NullSink);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "a");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "b");
    }

    #[test]
    fn scanner_is_lazy() {
        let lines = split_lines("a\n2 2 0 0\n1 1 2\n\nb\n2 2 0 0\n0\n\n");
        let mut scanner = Scanner::new(&lines, ParseConfig::default(), NullSink);
        let first = scanner.next().unwrap().unwrap();
        assert_eq!(first.name, "a");
        assert_eq!(scanner.position(), 4);
        let second = scanner.next().unwrap().unwrap();
        assert_eq!(second.name, "b");
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn sink_receives_every_diagnostic() {
        let lines = split_lines("noise\n\nc\n3 3 0 0\n1 2\n1 1 9\n\n");
        let mut scanner = Scanner::new(&lines, ParseConfig::default(), Vec::new());
        let rec = scanner.next().unwrap().unwrap();
        assert!(rec.edges.is_empty());
        let counts = scanner.diagnostic_counts();
        let seen = scanner.into_sink();
        // "1 2" declares one edge but holds no complete pair.
        assert_eq!(seen.len(), 4);
        assert_eq!(counts.headers_rejected, 1);
        assert_eq!(counts.count_mismatches, 1);
        assert_eq!(counts.dangling_tokens, 1);
        assert_eq!(counts.out_of_range, 1);
    }

    #[test]
    fn parse_file_reports_missing_source() {
        let err = parse_file("/nonexistent/qi-harness/source.txt", &ParseConfig::default())
            .unwrap_err();
        assert!(matches!(err, HarnessError::Io { .. }));
    }

    // -------------------------------------------------------------------------
    // Randomized round trips
    // -------------------------------------------------------------------------

    /// Renders a configuration in source form, spreading edges between the
    /// additional-edges line and adjacency rows, followed by a coordinate block.
    fn render<R: Rng>(rng: &mut R, name: &str, n: u32, edges: &BTreeSet<(u32, u32)>) -> String {
        let mut extra = Vec::new();
        let mut rows: Vec<Vec<u32>> = vec![Vec::new(); n as usize];
        for &(u, v) in edges {
            match rng.random_range(0..3) {
                0 => extra.push((u, v)),
                1 => rows[u as usize].push(v),
                _ => rows[v as usize].push(u),
            }
        }

        let mut out = format!("{name}\n{n} {} 0 0\n", rng.random_range(3..15));
        if extra.is_empty() {
            out.push_str("0\n");
        } else {
            out.push_str(&extra.len().to_string());
            for (u, v) in &extra {
                out.push_str(&format!(" {} {}", u + 1, v + 1));
            }
            out.push('\n');
        }
        for (src, targets) in rows.iter().enumerate() {
            if targets.is_empty() {
                continue;
            }
            out.push_str(&format!("{} {}", src + 1, rng.random_range(1..=10_000)));
            for t in targets {
                out.push_str(&format!(" {}", t + 1));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "{} {}\n{} {} {}\n\n",
            rng.random_range(10_001..60_000),
            rng.random_range(0..60_000),
            rng.random_range(0..100),
            rng.random_range(0..100),
            rng.random_range(0..100)
        ));
        out
    }

    #[test]
    fn random_sources_decode_exactly() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        for _ in 0..50 {
            let mut text = String::from("Configurations\nsource listing\n\n");
            let mut expected = Vec::new();
            for i in 0..rng.random_range(1..8) {
                let n = rng.random_range(2..30u32);
                let mut edges = BTreeSet::new();
                for _ in 0..rng.random_range(0..3 * n) {
                    let u = rng.random_range(0..n);
                    let v = rng.random_range(0..n);
                    if u != v {
                        edges.insert((u.min(v), u.max(v)));
                    }
                }
                let name = format!("cfg{i}");
                text.push_str(&render(&mut rng, &name, n, &edges));
                expected.push((name, n, edges));
            }

            let report = parse(&text);
            assert!(report.skipped.is_empty());
            assert_eq!(report.records.len(), expected.len());
            for (rec, (name, n, edges)) in report.records.iter().zip(&expected) {
                assert_eq!(&rec.name, name);
                assert_eq!(rec.vertex_count, *n);
                let got: BTreeSet<(u32, u32)> = rec.edge_pairs().collect();
                assert_eq!(&got, edges, "edge mismatch in {name}");
            }
        }
    }
}
