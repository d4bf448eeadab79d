//! Writes decoded configurations as flat graph files, one per record.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::{ExportConfig, FileNaming, ParseConfig};
use crate::error::HarnessError;
use crate::flat::{write_edge_list, MAX_FLAT_VERTICES};
use crate::record::ConfigurationRecord;
use crate::scanner::{parse_file, ParseReport};

/// Files produced by an export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Paths written, in record order.
    pub written: Vec<PathBuf>,
    /// Total edges across all written files.
    pub edges: usize,
}

/// File name for the record at 0-based position `index`.
pub fn file_name(record: &ConfigurationRecord, index: usize, naming: FileNaming) -> String {
    match naming {
        FileNaming::Sequential => format!("config_{:03}.txt", index + 1),
        FileNaming::RecordName => format!("{}.txt", sanitize(&record.name)),
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

/// File names for `records` in source order.
///
/// With [`FileNaming::RecordName`], a name already taken gets a `_2`, `_3`, ... suffix
/// in source order.
fn assign_file_names(records: &[ConfigurationRecord], naming: FileNaming) -> Vec<String> {
    let mut taken = HashSet::with_capacity(records.len());
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let name = file_name(record, i, naming);
            if taken.insert(name.clone()) {
                return name;
            }
            let stem = name.trim_end_matches(".txt");
            let unique = (2..)
                .map(|k| format!("{stem}_{k}.txt"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default();
            log::warn!(
                "configuration {} (line {}) repeats file name {name}, writing {unique}",
                record.name,
                record.line
            );
            taken.insert(unique.clone());
            unique
        })
        .collect()
}

/// Writes every record into `config.out_dir`, creating it if needed.
///
/// Files are written in parallel. Nothing is written if any record's vertex count is
/// outside `1..=MAX_FLAT_VERTICES`.
///
/// # Errors
/// - [`HarnessError::VertexCountOutOfRange`] for a record the flat format cannot hold.
/// - The first [`HarnessError::Io`] encountered creating the directory or a file.
pub fn export_records(
    records: &[ConfigurationRecord],
    config: &ExportConfig,
) -> Result<ExportSummary, HarnessError> {
    if let Some(record) = records
        .iter()
        .find(|r| r.vertex_count == 0 || r.vertex_count > MAX_FLAT_VERTICES)
    {
        return Err(HarnessError::VertexCountOutOfRange {
            name: record.name.clone(),
            line: record.line,
            vertex_count: record.vertex_count,
            max: MAX_FLAT_VERTICES,
        });
    }

    let out_dir = config.out_dir.as_path();
    fs::create_dir_all(out_dir).map_err(|e| HarnessError::io(out_dir, e))?;

    let names = assign_file_names(records, config.naming);
    let written = records
        .par_iter()
        .zip(names.par_iter())
        .map(|(record, name)| write_one(&out_dir.join(name), record, config.critical_k))
        .collect::<Result<Vec<_>, _>>()?;

    let edges = records.iter().map(ConfigurationRecord::edge_count).sum();
    log::info!(
        "wrote {} configuration files ({edges} edges) to {}",
        written.len(),
        out_dir.display()
    );
    Ok(ExportSummary { written, edges })
}

fn write_one(
    path: &Path,
    record: &ConfigurationRecord,
    critical_k: u32,
) -> Result<PathBuf, HarnessError> {
    let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
    write_edge_list(
        BufWriter::new(file),
        record.vertex_count,
        record.edge_pairs(),
        critical_k,
    )
    .map_err(|e| HarnessError::io(path, e))?;
    log::debug!(
        "{}: {} vertices, {} edges",
        path.display(),
        record.vertex_count,
        record.edge_count()
    );
    Ok(path.to_path_buf())
}

/// Parses `source` and exports every decoded record.
///
/// # Errors
/// Fails if the source cannot be read or an output file cannot be written.
pub fn convert_file(
    source: impl AsRef<Path>,
    parse: &ParseConfig,
    export: &ExportConfig,
) -> Result<(ParseReport, ExportSummary), HarnessError> {
    let report = parse_file(source, parse)?;
    if report.records.is_empty() {
        log::warn!("no configurations were parsed from the source file");
    }
    let summary = export_records(&report.records, export)?;
    Ok((report, summary))
}

// ============================================================================
// Tests
// ============================================================================
