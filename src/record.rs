//! Configuration headers, canonical edges and decoded records.

use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Header
// ============================================================================

/// The name line and `n r a b` parameter line that open a configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigurationHeader {
    /// Free-form label (trimmed name line).
    pub name: String,
    /// Number of vertices; bounds every vertex index in the record.
    pub vertex_count: u32,
    /// Boundary ring size. Parsed, not used downstream.
    pub ring_size: u32,
    /// \(|C|\). Parsed, not used downstream.
    pub card_c: u32,
    /// \(|C'|\). Parsed, not used downstream.
    pub card_c_prime: u32,
    /// 1-based line number of the name line.
    pub line: usize,
}

// ============================================================================
// Edge
// ============================================================================

/// An undirected edge in canonical form: `lo < hi`.
///
/// Self-loops cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    lo: u32,
    hi: u32,
}

impl Edge {
    /// Builds the canonical edge between two 0-based vertices, or `None` for a self-loop.
    #[inline]
    pub fn new(u: u32, v: u32) -> Option<Self> {
        match u.cmp(&v) {
            std::cmp::Ordering::Less => Some(Self { lo: u, hi: v }),
            std::cmp::Ordering::Greater => Some(Self { lo: v, hi: u }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller endpoint.
    #[inline]
    pub const fn lo(self) -> u32 {
        self.lo
    }

    /// Larger endpoint.
    #[inline]
    pub const fn hi(self) -> u32 {
        self.hi
    }

    /// Both endpoints as `(lo, hi)`.
    #[inline]
    pub const fn endpoints(self) -> (u32, u32) {
        (self.lo, self.hi)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lo, self.hi)
    }
}

// ============================================================================
// Record
// ============================================================================

/// A fully decoded configuration.
///
/// Every edge satisfies `lo < hi < vertex_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigurationRecord {
    /// Label taken from the header.
    pub name: String,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Deduplicated canonical edges, ordered by `(lo, hi)`.
    pub edges: BTreeSet<Edge>,
    /// 1-based line number of the name line.
    pub line: usize,
}

impl ConfigurationRecord {
    /// Number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the record contains the edge `{u, v}` (0-based).
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        Edge::new(u, v).is_some_and(|e| self.edges.contains(&e))
    }

    /// Edges as `(lo, hi)` pairs in ascending order.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges.iter().map(|e| e.endpoints())
    }
}

// ============================================================================
// Tests
// ============================================================================
