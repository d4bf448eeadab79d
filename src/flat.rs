//! The flat graph format consumed by the downstream validator.
//!
//! ```text
//! <vertex_count>
//! <u> <v>            one line per edge, 0-based
//! k=<critical_k>
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{FlatFileError, HarnessError};
use crate::graph::Graph;

/// Largest vertex count the reader accepts, and the largest record export writes.
pub const MAX_FLAT_VERTICES: u32 = 99_999;

// ============================================================================
// Writing
// ============================================================================

/// Writes a vertex count, one `u v` line per edge and the `k=` line.
///
/// Edges are written as given.
///
/// # Errors
/// Propagates I/O errors from the writer.
pub fn write_edge_list<W, I>(mut w: W, vertex_count: u32, edges: I, critical_k: u32) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (u32, u32)>,
{
    writeln!(w, "{vertex_count}")?;
    for (u, v) in edges {
        writeln!(w, "{u} {v}")?;
    }
    writeln!(w, "k={critical_k}")?;
    w.flush()
}

/// Writes `graph` followed by the `k=` line.
///
/// # Errors
/// Propagates I/O errors from the writer.
pub fn write_flat<W: Write>(w: W, graph: &Graph, critical_k: u32) -> io::Result<()> {
    write_edge_list(w, graph.vertex_count(), graph.edges(), critical_k)
}

/// Writes `graph` to a file, replacing any existing file.
///
/// # Errors
/// Returns [`HarnessError::Io`] if the file cannot be created or written.
pub fn save_flat(path: impl AsRef<Path>, graph: &Graph, critical_k: u32) -> Result<(), HarnessError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
    write_flat(BufWriter::new(file), graph, critical_k).map_err(|e| HarnessError::io(path, e))
}

// ============================================================================
// Reading
// ============================================================================

/// A graph loaded from the flat format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatGraph {
    /// The graph.
    pub graph: Graph,
    /// Value of the `k=` line, if present.
    pub critical_k: Option<u32>,
    /// Edges dropped for being out of range or self-loops.
    pub ignored_edges: usize,
}

/// Reads the flat format.
///
/// Edges with an endpoint outside `[0, n)` and self-loops are logged and ignored.
/// Reading stops at the first token that is neither an integer nor a `k=` entry.
///
/// # Errors
/// Fails on I/O errors, a missing or out-of-range vertex count, or a non-integer `k=`.
pub fn read_flat<R: Read>(mut reader: R) -> Result<FlatGraph, FlatFileError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let first = tokens.next().ok_or(FlatFileError::MissingVertexCount)?;
    let n: i64 = first
        .parse()
        .map_err(|_| FlatFileError::InvalidVertexCount(first.to_owned()))?;
    if n <= 0 || n > i64::from(MAX_FLAT_VERTICES) {
        return Err(FlatFileError::InvalidVertexCount(first.to_owned()));
    }

    let mut graph = Graph::with_vertices(n as u32);
    let mut critical_k = None;
    let mut ignored_edges = 0;

    while let Some(token) = tokens.next() {
        if let Some(k) = token.strip_prefix("k=") {
            let k = k
                .parse()
                .map_err(|_| FlatFileError::InvalidCriticalK(k.to_owned()))?;
            critical_k = Some(k);
            continue;
        }
        let Ok(src) = token.parse::<i64>() else { break };
        let Some(Ok(dest)) = tokens.next().map(str::parse::<i64>) else {
            break;
        };
        if (0..n).contains(&src) && (0..n).contains(&dest) && src != dest {
            graph.add_edge(src as u32, dest as u32);
        } else {
            log::warn!("invalid edge ({src}, {dest}) ignored");
            ignored_edges += 1;
        }
    }

    Ok(FlatGraph {
        graph,
        critical_k,
        ignored_edges,
    })
}

/// Loads a flat file from disk.
///
/// # Errors
/// Returns [`HarnessError::Io`] if the file cannot be opened and
/// [`HarnessError::Flat`] if its contents are malformed.
pub fn load_flat(path: impl AsRef<Path>) -> Result<FlatGraph, HarnessError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
    read_flat(file).map_err(|source| HarnessError::Flat {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_emits_count_edges_and_k() {
        let mut g = Graph::with_vertices(4);
        g.add_edge(3, 1);
        g.add_edge(0, 2);
        let mut out = Vec::new();
        write_flat(&mut out, &g, 5).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "4\n0 2\n1 3\nk=5\n");
    }

    #[test]
    fn write_and_read_agree() {
        let mut g = Graph::with_vertices(6);
        for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)] {
            g.add_edge(u, v);
        }
        let mut out = Vec::new();
        write_flat(&mut out, &g, 4).unwrap();
        let flat = read_flat(out.as_slice()).unwrap();
        assert_eq!(flat.graph, g);
        assert_eq!(flat.critical_k, Some(4));
        assert_eq!(flat.ignored_edges, 0);
    }

    #[test]
    fn read_ignores_invalid_edges() {
        let flat = read_flat("3\n0 1\n1 1\n2 3\n-1 0\n1 2\n".as_bytes()).unwrap();
        assert_eq!(flat.graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert_eq!(flat.ignored_edges, 3);
        assert_eq!(flat.critical_k, None);
    }

    #[test]
    fn read_stops_at_non_numeric_token() {
        let flat = read_flat("3\n0 1\n# trailer\n1 2\n".as_bytes()).unwrap();
        assert_eq!(flat.graph.edge_count(), 1);
    }

    #[test]
    fn read_rejects_bad_vertex_count() {
        assert!(matches!(
            read_flat("".as_bytes()),
            Err(FlatFileError::MissingVertexCount)
        ));
        assert!(matches!(
            read_flat("0\n".as_bytes()),
            Err(FlatFileError::InvalidVertexCount(_))
        ));
        assert!(matches!(
            read_flat("100000\n".as_bytes()),
            Err(FlatFileError::InvalidVertexCount(_))
        ));
        assert!(matches!(
            read_flat("abc\n".as_bytes()),
            Err(FlatFileError::InvalidVertexCount(_))
        ));
    }

    #[test]
    fn read_rejects_bad_critical_k() {
        assert!(matches!(
            read_flat("2\n0 1\nk=five\n".as_bytes()),
            Err(FlatFileError::InvalidCriticalK(_))
        ));
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir().join(format!("qi-harness-flat-{}.txt", std::process::id()));
        let mut g = Graph::with_vertices(5);
        g.add_edge(4, 0);
        g.add_edge(2, 3);
        save_flat(&path, &g, 7).unwrap();
        let flat = load_flat(&path).unwrap();
        assert_eq!(flat.graph, g);
        assert_eq!(flat.critical_k, Some(7));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_flat("/nonexistent/qi-harness/graph.txt").unwrap_err();
        assert!(matches!(err, HarnessError::Io { .. }));
    }
}
