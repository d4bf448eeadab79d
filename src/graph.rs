//! Undirected simple graph built from decoded configurations.
//!
//! Rows are sorted neighbor lists, so memory follows the edge count rather than the
//! square of the vertex count.

use crate::record::ConfigurationRecord;

// ============================================================================
// Graph
// ============================================================================

/// A simple undirected graph with sparse adjacency.
///
/// Representation:
/// - `rows[v]` holds the neighbors of vertex `v` in ascending order.
/// - No self-loops, symmetric at all times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    rows: Vec<Vec<u32>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an edgeless graph on `n` vertices.
    pub fn with_vertices(n: u32) -> Self {
        Self {
            rows: vec![Vec::new(); n as usize],
            edge_count: 0,
        }
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self) -> u32 {
        let v = self.rows.len();
        self.rows.push(Vec::new());
        v as u32
    }

    /// Adds `{u, v}`.
    ///
    /// Out-of-range endpoints and self-loops are ignored. Returns whether the edge is new.
    pub fn add_edge(&mut self, u: u32, v: u32) -> bool {
        let n = self.rows.len();
        if u as usize >= n || v as usize >= n || u == v {
            return false;
        }
        let Err(at) = self.rows[u as usize].binary_search(&v) else {
            return false;
        };
        self.rows[u as usize].insert(at, v);
        if let Err(at) = self.rows[v as usize].binary_search(&u) {
            self.rows[v as usize].insert(at, u);
        }
        self.edge_count += 1;
        true
    }

    /// Whether `{u, v}` is an edge. Out-of-range vertices have no edges.
    #[inline]
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        self.rows
            .get(u as usize)
            .is_some_and(|row| row.binary_search(&v).is_ok())
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of edges.
    #[inline]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Degree of `v`.
    pub fn degree(&self, v: u32) -> u32 {
        self.rows.get(v as usize).map_or(0, |row| row.len() as u32)
    }

    /// Neighbors of `v` in ascending order.
    pub fn neighbors(&self, v: u32) -> impl Iterator<Item = u32> + '_ {
        self.rows
            .get(v as usize)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .copied()
    }

    /// Edges as `(u, v)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.vertex_count())
            .flat_map(move |u| self.neighbors(u).filter(move |&v| v > u).map(move |v| (u, v)))
    }
}

impl From<&ConfigurationRecord> for Graph {
    fn from(record: &ConfigurationRecord) -> Self {
        let mut graph = Self::with_vertices(record.vertex_count);
        for (u, v) in record.edge_pairs() {
            graph.add_edge(u, v);
        }
        graph
    }
}

// ============================================================================
// Tests
// ============================================================================
