//! nodone: done-callback linter CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use nodone::analyzer::Linter;
use nodone::config::{
    build_ignore_set, is_ignored, load_config, write_starter_config, CONFIG_FILENAME,
};
use nodone::fixer::apply_file_fixes;
use nodone::reporter::{ConsoleReporter, JsonReporter, LintSummary, SarifReporter};
use nodone::FileReport;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// nodone: flag tests and hooks that take a done callback
#[derive(Parser, Debug)]
#[command(name = "nodone")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Test file or directory to lint (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Output in SARIF format (for GitHub Code Scanning)
    #[arg(long, conflicts_with = "json")]
    sarif: bool,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (show suggestions under each diagnostic)
    #[arg(long, short)]
    verbose: bool,

    /// Apply suggested rewrites in place
    #[arg(long)]
    fix: bool,

    /// Path to config file (default: search .nodonerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lint files in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .nodonerc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log_level);

    if let Some(Commands::Init { dir }) = args.command {
        return run_init(dir.as_deref());
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("A path to lint is required");
    };

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    let config = load_config(work_dir, args.config.as_deref())?;

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let test_patterns = config.get_test_patterns();
    let test_files = collect_test_files(&path, ignore_set.as_ref(), &test_patterns)?;

    if test_files.is_empty() {
        eprintln!("{}: No test files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let linter = Linter::new(&config);
    let use_parallel = args.parallel || args.jobs.is_some() || test_files.len() > 10;

    let (mut results, mut had_errors) = lint_files(&linter, &test_files, use_parallel, args.quiet);

    if args.fix {
        let (fixed, fix_errors) = fix_files(&linter, &results, args.quiet);
        had_errors |= fix_errors;
        for report in fixed {
            if let Some(slot) = results.iter_mut().find(|r| r.file_path == report.file_path) {
                *slot = report;
            }
        }
    }

    if results.is_empty() {
        eprintln!("{}: All files failed to lint", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let summary = LintSummary::from_reports(&results);

    if args.sarif {
        println!("{}", SarifReporter::new().report(&results));
    } else if args.json {
        let reporter = JsonReporter::new().pretty();
        println!("{}", reporter.report_with_summary(&results, &summary));
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in &results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report_many(&results, &summary);
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else if summary.errors > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let written = write_starter_config(dir)?;
    println!("{}: Created {}", "Done".green().bold(), written.display());
    Ok(ExitCode::SUCCESS)
}

fn collect_test_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    test_patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if is_test_file(file_path, test_patterns) {
            if let Some(set) = ignore_set {
                if is_ignored(file_path, set) {
                    continue;
                }
            }
            files.push(file_path.to_path_buf());
        }
    }

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn is_test_file(path: &Path, test_patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if path
        .components()
        .any(|c| c.as_os_str() == "node_modules")
    {
        return false;
    }

    test_patterns.iter().any(|p| name.ends_with(p))
}

/// Lint every file, in parallel when asked. Failures are reported and skipped.
fn lint_files(
    linter: &Linter,
    files: &[PathBuf],
    parallel: bool,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    let had_errors = AtomicBool::new(false);
    let lint_one = |file: &PathBuf| match linter.lint_path(file) {
        Ok(report) => Some(report),
        Err(e) => {
            had_errors.store(true, Ordering::Relaxed);
            if !quiet {
                eprintln!("{}: Failed to lint {}: {:#}", "Error".red(), file.display(), e);
            }
            None
        }
    };

    // par_iter().collect() keeps input order
    let results: Vec<FileReport> = if parallel {
        files.par_iter().filter_map(lint_one).collect()
    } else {
        files.iter().filter_map(lint_one).collect()
    };

    (results, had_errors.load(Ordering::Relaxed))
}

/// Apply suggestions to every fixable file, then lint those files again.
fn fix_files(
    linter: &Linter,
    results: &[FileReport],
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    let mut had_errors = false;
    let mut relinted = Vec::new();
    let mut applied = 0;
    let mut skipped = 0;

    for report in results.iter().filter(|r| r.fixable_count() > 0) {
        let outcome = apply_file_fixes(&report.file_path, report)
            .and_then(|outcome| Ok((outcome, linter.lint_path(&report.file_path)?)));
        match outcome {
            Ok((outcome, after)) => {
                applied += outcome.applied;
                skipped += outcome.skipped;
                relinted.push(after);
            }
            Err(e) => {
                had_errors = true;
                eprintln!(
                    "{}: Failed to fix {}: {:#}",
                    "Error".red(),
                    report.file_path.display(),
                    e
                );
            }
        }
    }

    tracing::info!(applied, skipped, files = relinted.len(), "applied fixes");
    if !quiet && applied > 0 {
        eprintln!("{}: Applied {} fix(es)", "Fixed".green().bold(), applied);
    }
    if !quiet && skipped > 0 {
        eprintln!(
            "{}: {} overlapping fix(es) skipped; run --fix again to apply them",
            "Info".blue(),
            skipped
        );
    }
    (relinted, had_errors)
}
