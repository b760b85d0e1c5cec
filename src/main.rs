//! controldiff command-line interface.
//!
//! `compare` reports the changes between two document files; `batch` compares
//! every forward pair of the versions listed in a configuration file and
//! writes one report per pair plus an index page.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use controldiff::config::DocumentDescriptor;
use controldiff::output::format_summary;
use controldiff::{
    compare_documents, load_config, run_batch, OutputFormat, RenderOptions, Renderer,
    ReportLabels, SchemaDialect,
};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// controldiff - change reports between versions of a security control document
///
/// Lists the controls added, removed and changed between document versions,
/// with the text edits of changed controls highlighted inline.
#[derive(Parser)]
#[command(name = "controldiff")]
#[command(version)]
#[command(about = "Change reports between versions of a security control document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (log progress to stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (suppress summaries)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two document files
    Compare(CompareArgs),
    /// Compare every version pair listed in a configuration file
    Batch(BatchArgs),
}

#[derive(Args)]
struct CompareArgs {
    /// Old document version
    #[arg(value_name = "OLD")]
    old: PathBuf,

    /// New document version
    #[arg(value_name = "NEW")]
    new: PathBuf,

    /// Schema dialect of both documents
    #[arg(long, value_enum, default_value = "v1")]
    dialect: DialectArg,

    /// Schema dialect of the old document (overrides --dialect)
    #[arg(long, value_enum)]
    old_dialect: Option<DialectArg>,

    /// Schema dialect of the new document (overrides --dialect)
    #[arg(long, value_enum)]
    new_dialect: Option<DialectArg>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Label of the old version (defaults to the file stem)
    #[arg(long)]
    old_label: Option<String>,

    /// Label of the new version (defaults to the file stem)
    #[arg(long)]
    new_label: Option<String>,
}

#[derive(Args)]
struct BatchArgs {
    /// Configuration file listing the document versions, oldest first
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory for reports and the index (overrides the configuration)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Report file prefix (overrides the configuration)
    #[arg(long)]
    prefix: Option<String>,

    /// Report format
    #[arg(short = 'f', long, value_enum, default_value = "html")]
    format: ReportFormatArg,
}

/// Schema dialect argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum DialectArg {
    /// CID / classifications / compliances attributes
    V1,
    /// cid / classification / compliance attributes
    V2,
}

impl From<DialectArg> for SchemaDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::V1 => SchemaDialect::V1,
            DialectArg::V2 => SchemaDialect::V2,
        }
    }
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Standalone HTML page
    Html,
    /// JSON representation
    Json,
    /// Colored terminal output
    Terminal,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Html => OutputFormat::Html,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

/// Batch report format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ReportFormatArg {
    /// HTML reports plus an index page
    Html,
    /// JSON reports
    Json,
}

impl From<ReportFormatArg> for OutputFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Html => OutputFormat::Html,
            ReportFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is warn.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .ok();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Compare(args) => run_compare(args, cli.quiet),
        Command::Batch(args) => run_batch_command(args, cli.quiet),
    }
}

fn run_compare(args: CompareArgs, quiet: bool) -> Result<i32> {
    let old = DocumentDescriptor {
        version: args.old_label.unwrap_or_else(|| file_label(&args.old)),
        filename: args.old.clone(),
        dialect: args.old_dialect.unwrap_or(args.dialect).into(),
    };
    let new = DocumentDescriptor {
        version: args.new_label.unwrap_or_else(|| file_label(&args.new)),
        filename: args.new.clone(),
        dialect: args.new_dialect.unwrap_or(args.dialect).into(),
    };

    info!("Parsing {} and {}", old.filename.display(), new.filename.display());
    let changes = compare_documents(&old, &new).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            old.filename.display(),
            new.filename.display()
        )
    })?;

    let renderer = Renderer::default();
    let labels = ReportLabels::new(&old.version, &new.version);
    let output_format: OutputFormat = args.format.into();
    let output = renderer
        .render_report(&labels, &changes, output_format)
        .context("Failed to format report")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
            if !quiet {
                println!("{}", format_summary(&changes.stats));
            }
        }
        None if quiet && is_listing(output_format) => {
            for line in output.lines() {
                if !line.starts_with("Summary:") && !line.trim().is_empty() {
                    println!("{}", line);
                }
            }
        }
        None => println!("{}", output),
    }

    if changes.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn run_batch_command(args: BatchArgs, quiet: bool) -> Result<i32> {
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;

    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(prefix) = args.prefix {
        config.report_prefix = prefix;
    }

    let renderer = Renderer::new(RenderOptions {
        document_name: config.report_prefix.clone(),
        ..Default::default()
    });

    let outcome = run_batch(&config, &renderer, args.format.into())
        .context("Failed to write batch output")?;

    if !quiet {
        for report in &outcome.reports {
            println!("Wrote {}", report.display());
        }
        if let Some(index) = &outcome.index {
            println!("Wrote {}", index.display());
        }
    }
    for failure in &outcome.failures {
        eprintln!(
            "Error: failed to compare {} to {}: {}",
            failure.old, failure.new, failure.error
        );
    }

    if outcome.is_success() {
        Ok(0)
    } else {
        Ok(2)
    }
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_listing(format: OutputFormat) -> bool {
    matches!(format, OutputFormat::Terminal | OutputFormat::Plain)
}
