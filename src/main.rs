use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qi_harness::config::{
    EdgeCountMode, ExportConfig, FailurePolicy, FileNaming, ParseConfig,
    DEFAULT_COORDINATE_THRESHOLD, DEFAULT_CRITICAL_K,
};
use qi_harness::diagnostics::{Diagnostic, DiagnosticSink, FnSink, LogSink};
use qi_harness::export::convert_file;
use qi_harness::scanner::{parse_file_with, ParseReport};

#[derive(Parser, Debug)]
#[command(name = "qi-harness")]
#[command(about = "Parse configuration source files and export flat graph files")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one flat graph file per configuration.
    #[command(name = "convert")]
    Convert(ConvertArgs),
    /// Print a summary of the configurations in a source file.
    #[command(name = "inspect")]
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    SkipOne,
    AbortAll,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Naming {
    Sequential,
    Name,
}

#[derive(Args, Debug, Clone)]
struct ParseArgs {
    /// Configuration source file.
    source: PathBuf,
    /// What to do when a record cannot be decoded.
    #[arg(long, value_enum, default_value = "skip-one")]
    policy: Policy,
    /// Require the additional-edge count to match the pairs present.
    #[arg(long)]
    strict_count: bool,
    /// Values above this end adjacency data.
    #[arg(long, default_value_t = DEFAULT_COORDINATE_THRESHOLD)]
    threshold: i64,
}

impl ParseArgs {
    fn config(&self) -> ParseConfig {
        ParseConfig {
            failure_policy: match self.policy {
                Policy::SkipOne => FailurePolicy::SkipOne,
                Policy::AbortAll => FailurePolicy::AbortAll,
            },
            edge_count_mode: if self.strict_count {
                EdgeCountMode::Strict
            } else {
                EdgeCountMode::Lenient
            },
            coordinate_threshold: self.threshold,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct ConvertArgs {
    #[command(flatten)]
    parse: ParseArgs,
    /// Output directory.
    #[arg(long, default_value = "graphs/robertson")]
    out_dir: PathBuf,
    /// Value written on the trailing `k=` line.
    #[arg(long, default_value_t = DEFAULT_CRITICAL_K)]
    critical_k: u32,
    /// Output file naming.
    #[arg(long, value_enum, default_value = "sequential")]
    naming: Naming,
}

#[derive(Args, Debug, Clone)]
struct InspectArgs {
    #[command(flatten)]
    parse: ParseArgs,
    /// Number of records to list.
    #[arg(long, default_value_t = 3)]
    limit: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Convert(args) => run_convert(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_convert(args: &ConvertArgs) -> Result<()> {
    let export = ExportConfig {
        out_dir: args.out_dir.clone(),
        critical_k: args.critical_k,
        naming: match args.naming {
            Naming::Sequential => FileNaming::Sequential,
            Naming::Name => FileNaming::RecordName,
        },
    };
    let (report, summary) = convert_file(&args.parse.source, &args.parse.config(), &export)
        .with_context(|| format!("converting {}", args.parse.source.display()))?;

    print_counts(&report);
    println!(
        "Wrote {} files ({} edges) to {}",
        summary.written.len(),
        summary.edges,
        args.out_dir.display()
    );
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let mut warning_lines = Vec::new();
    let sink = FnSink(|diagnostic: Diagnostic| {
        if diagnostic.is_warning() {
            warning_lines.push(diagnostic.line());
        }
        LogSink.report(diagnostic);
    });
    let report = parse_file_with(&args.parse.source, &args.parse.config(), sink)
        .with_context(|| format!("reading {}", args.parse.source.display()))?;

    print_counts(&report);
    for (i, record) in report.records.iter().take(args.limit).enumerate() {
        println!(
            "Config {}: {} - {} vertices, {} edges",
            i + 1,
            record.name,
            record.vertex_count,
            record.edge_count()
        );
    }
    for skipped in &report.skipped {
        println!(
            "Skipped {} (header line {}, failed at line {}): {}",
            skipped.name,
            skipped.line,
            skipped.error.line(),
            skipped.error
        );
    }
    if !warning_lines.is_empty() {
        warning_lines.dedup();
        let shown: Vec<String> = warning_lines
            .iter()
            .take(args.limit)
            .map(usize::to_string)
            .collect();
        println!(
            "Dropped data on {} line(s): {}{}",
            warning_lines.len(),
            shown.join(", "),
            if warning_lines.len() > shown.len() { ", ..." } else { "" }
        );
    }
    Ok(())
}

fn print_counts(report: &ParseReport) {
    println!(
        "Found {} configurations ({} skipped{})",
        report.records.len(),
        report.skipped.len(),
        if report.aborted { ", scan aborted" } else { "" }
    );
    let d = &report.diagnostics;
    if d.warnings() > 0 {
        println!(
            "Dropped data: {} out-of-range edges, {} non-numeric tokens, {} unpaired tokens, {} count mismatches",
            d.out_of_range, d.non_numeric_tokens, d.dangling_tokens, d.count_mismatches
        );
    }
}
