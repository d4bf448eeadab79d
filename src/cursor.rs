//! Source lines and the forward-only cursor shared by the scanner and decoder.

use std::num::IntErrorKind;

// ============================================================================
// RawLine
// ============================================================================

/// A single line of source text together with its 1-based line number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// 1-based line number in the source.
    pub number: usize,
    /// Line contents without the trailing newline.
    pub text: &'a str,
}

impl<'a> RawLine<'a> {
    /// Creates a line.
    pub const fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Returns the line with surrounding whitespace removed.
    #[inline]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// Whether the line contains only whitespace.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whitespace-separated tokens paired with their 1-based byte column.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'a>> + 'a {
        let base = self.text.as_ptr() as usize;
        self.text.split_whitespace().map(move |text| Token {
            column: text.as_ptr() as usize - base + 1,
            text,
        })
    }
}

/// Splits text into numbered lines. Both `\n` and `\r\n` endings are accepted.
pub fn split_lines(text: &str) -> Vec<RawLine<'_>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| RawLine::new(i + 1, line))
        .collect()
}

// ============================================================================
// Token
// ============================================================================

/// A whitespace-delimited token and the column it starts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// 1-based byte column of the first character.
    pub column: usize,
    /// Token text.
    pub text: &'a str,
}

impl Token<'_> {
    /// Parses the token as a signed integer.
    ///
    /// Digit strings too long for `i64` clamp to `i64::MAX` or `i64::MIN`, so they still
    /// compare past any coordinate threshold instead of reading as non-numeric.
    #[inline]
    pub fn int(&self) -> Option<i64> {
        match self.text.parse::<i64>() {
            Ok(value) => Some(value),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Some(i64::MAX),
                IntErrorKind::NegOverflow => Some(i64::MIN),
                _ => None,
            },
        }
    }
}

// ============================================================================
// LineCursor
// ============================================================================

/// Forward-only position over a line buffer.
///
/// The position never decreases. The scanner owns the cursor and lends it to the
/// decoder for the duration of one record.
#[derive(Clone, Debug)]
pub struct LineCursor<'s, 'a> {
    lines: &'s [RawLine<'a>],
    pos: usize,
}

impl<'s, 'a> LineCursor<'s, 'a> {
    /// Creates a cursor at the first line.
    pub const fn new(lines: &'s [RawLine<'a>]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Index of the next unconsumed line.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Whether every line has been consumed.
    #[inline]
    pub const fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// The next unconsumed line, if any.
    #[inline]
    pub fn peek(&self) -> Option<&'s RawLine<'a>> {
        self.lines.get(self.pos)
    }

    /// The line `offset` positions after the next unconsumed one.
    #[inline]
    pub fn peek_ahead(&self, offset: usize) -> Option<&'s RawLine<'a>> {
        self.lines.get(self.pos + offset)
    }

    /// Consumes and returns the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<&'s RawLine<'a>> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some(line)
    }

    /// Consumes up to `n` lines.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.lines.len());
    }

    /// Consumes blank lines until a non-blank line or the end of input.
    pub fn skip_blank(&mut self) {
        while self.peek().is_some_and(RawLine::is_blank) {
            self.pos += 1;
        }
    }

    /// Consumes all non-blank lines, then at most one blank line.
    ///
    /// Leaves the cursor on a clean record boundary.
    pub fn skip_to_boundary(&mut self) {
        while self.peek().is_some_and(|line| !line.is_blank()) {
            self.pos += 1;
        }
        self.advance(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_numbers_from_one() {
        let lines = split_lines("a\r\nb\n\nc");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], RawLine::new(1, "a"));
        assert_eq!(lines[1], RawLine::new(2, "b"));
        assert!(lines[2].is_blank());
        assert_eq!(lines[3].number, 4);
    }

    #[test]
    fn tokens_report_columns() {
        let line = RawLine::new(1, "  12 x  7");
        let toks: Vec<_> = line.tokens().collect();
        assert_eq!(toks.len(), 3);
        assert_eq!((toks[0].column, toks[0].text), (3, "12"));
        assert_eq!((toks[1].column, toks[1].text), (6, "x"));
        assert_eq!((toks[2].column, toks[2].text), (9, "7"));
        assert_eq!(toks[0].int(), Some(12));
        assert_eq!(toks[1].int(), None);
    }

    #[test]
    fn oversized_integers_clamp() {
        let line = RawLine::new(1, "99999999999999999999 -99999999999999999999 +7 1e5 --3");
        let ints: Vec<_> = line.tokens().map(|t| t.int()).collect();
        assert_eq!(
            ints,
            vec![Some(i64::MAX), Some(i64::MIN), Some(7), None, None]
        );
    }

    #[test]
    fn skip_to_boundary_consumes_one_blank() {
        let lines = split_lines("a\nb\n\n\nc");
        let mut cursor = LineCursor::new(&lines);
        cursor.skip_to_boundary();
        assert_eq!(cursor.position(), 3);
        cursor.skip_blank();
        assert_eq!(cursor.peek().map(|l| l.text), Some("c"));
    }

    #[test]
    fn skip_to_boundary_stops_at_end() {
        let lines = split_lines("a\nb");
        let mut cursor = LineCursor::new(&lines);
        cursor.skip_to_boundary();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn cursor_never_moves_past_end() {
        let lines = split_lines("only");
        let mut cursor = LineCursor::new(&lines);
        cursor.advance(10);
        assert_eq!(cursor.position(), 1);
        assert!(cursor.next_line().is_none());
    }
}
