//! # qi-harness
//!
//! A recovering parser for configuration source files of the kind used in
//! discharging-method proofs, plus the glue that turns each configuration into a
//! flat graph file for a downstream validator.
//!
//! A source file is a sequence of blank-line separated blocks:
//!
//! ```text
//! <name>
//! <n> <r> <a> <b>              vertex count, ring size, |C|, |C'|
//! <count> <v1> <v2> ...        additional edges (1-based pairs), or "0"
//! <src> <guard> <e1> <e2> ...  adjacency rows
//! <x> <y> ...                  coordinate block, ignored
//! ```
//!
//! There is no explicit marker separating adjacency rows from coordinates; values above
//! a magnitude threshold (10000 by default) end the adjacency data.
//!
//! ## Quick Start
//!
//! ```
//! use qi_harness::prelude::*;
//!
//! let text = "name\n5 0 0 0\n2 1 2 4 5\n\n";
//! let report = parse_str(text, &ParseConfig::default());
//! let record = &report.records[0];
//! assert_eq!(record.vertex_count, 5);
//! assert_eq!(record.edge_pairs().collect::<Vec<_>>(), vec![(0, 1), (3, 4)]);
//! ```
//!
//! ## Writing Flat Graph Files
//!
//! ```
//! use qi_harness::prelude::*;
//!
//! let report = parse_str("c\n3 3 0 0\n0\n1 1 2 3\n\n", &ParseConfig::default());
//! let graph = Graph::from(&report.records[0]);
//! let mut out = Vec::new();
//! write_flat(&mut out, &graph, 5).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "3\n0 1\n0 2\nk=5\n");
//! ```
//!
//! ## Modules
//!
//! - [`cursor`]: numbered source lines and the forward-only cursor.
//! - [`scanner`]: header detection, record boundaries and whole-input entry points.
//! - [`decoder`]: additional-edge and adjacency-row decoding.
//! - [`record`]: headers, canonical edges and decoded records.
//! - [`diagnostics`]: recoverable events and sinks.
//! - [`graph`]: bitset adjacency graph built from records.
//! - [`flat`]: the flat `n / u v / k=` format.
//! - [`export`]: one flat file per record, written in parallel.
//! - [`config`], [`error`]: settings and error types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::inline_always)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod config;
pub mod cursor;
pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod flat;
pub mod graph;
pub mod record;
pub mod scanner;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::config::{EdgeCountMode, ExportConfig, FailurePolicy, FileNaming, ParseConfig};
    pub use crate::diagnostics::{Diagnostic, DiagnosticSink, FnSink, LogSink};
    pub use crate::error::{DecodeError, HarnessError};
    pub use crate::export::{convert_file, export_records};
    pub use crate::flat::{load_flat, read_flat, save_flat, write_flat};
    pub use crate::graph::Graph;
    pub use crate::record::{ConfigurationRecord, Edge};
    pub use crate::scanner::{
        parse_file, parse_file_with, parse_lines, parse_str, ParseReport, Scanner,
    };
}
