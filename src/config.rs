//! Parser and export settings.

use std::path::PathBuf;

/// Magnitude above which a value is taken to be coordinate data rather than a vertex index.
pub const DEFAULT_COORDINATE_THRESHOLD: i64 = 10_000;

/// Critical k written to exported files unless overridden.
pub const DEFAULT_CRITICAL_K: u32 = 5;

/// What the scanner does after a record fails to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the record as skipped and continue from the next record boundary.
    #[default]
    SkipOne,
    /// Report the record as skipped and stop scanning.
    AbortAll,
}

/// How the declared count on the additional-edges line is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeCountMode {
    /// Ignore the declared count; a mismatch is only a diagnostic.
    #[default]
    Lenient,
    /// Require exactly `1 + 2 * count` tokens.
    Strict,
}

/// Settings for [`Scanner`](crate::scanner::Scanner) and the `parse_*` entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Behaviour after a structural failure.
    pub failure_policy: FailurePolicy,
    /// Additional-edge count validation.
    pub edge_count_mode: EdgeCountMode,
    /// Values strictly greater than this end adjacency parsing.
    pub coordinate_threshold: i64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::SkipOne,
            edge_count_mode: EdgeCountMode::Lenient,
            coordinate_threshold: DEFAULT_COORDINATE_THRESHOLD,
        }
    }
}

/// How exported files are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileNaming {
    /// `config_001.txt`, `config_002.txt`, ... in source order.
    #[default]
    Sequential,
    /// `<name>.txt`, with characters outside `[A-Za-z0-9._-]` replaced by `_`.
    RecordName,
}

/// Settings for [`export_records`](crate::export::export_records).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory receiving one file per record. Created if missing.
    pub out_dir: PathBuf,
    /// Scalar written as the trailing `k=` line.
    pub critical_k: u32,
    /// File naming scheme.
    pub naming: FileNaming,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("graphs/robertson"),
            critical_k: DEFAULT_CRITICAL_K,
            naming: FileNaming::Sequential,
        }
    }
}
