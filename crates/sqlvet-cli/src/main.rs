use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sqlvet_core::{Config, RunSummary, SplitMode, ValidationResult};
use sqlvet_engine::{read_input, JsonDirectoryWriter, ReaderOptions, ReportSink, Validator, WriteError};
use sqlvet_sql::{resolve_dialect, DIALECTS};

/// sqlvet - Offline SQL validation against dialect rules
#[derive(Parser)]
#[command(name = "sqlvet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: sqlvet.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the queries in a file or directory
    Check(CheckArgs),

    /// List the available dialects and their policies
    Dialects,
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    /// SQL file, or directory of SQL files
    path: PathBuf,

    /// Dialect to validate against (overrides config)
    #[arg(short, long)]
    dialect: Option<String>,

    /// Directory for per-query JSON results (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How to cut files into queries: statement or line
    #[arg(long)]
    split: Option<SplitMode>,

    /// Also run the subquery, CTE and set-operation checks
    #[arg(long)]
    extended: bool,

    /// Write the run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Exit 0 even when queries fail validation
    #[arg(long)]
    no_fail: bool,
}

impl CheckArgs {
    /// Command-line flags take precedence over the config file
    fn apply_to(&self, config: &mut Config) {
        if let Some(dialect) = &self.dialect {
            config.dialect = dialect.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(split) = self.split {
            config.split = split;
        }
        if self.extended {
            config.extended_checks = true;
        }
        if let Some(summary) = &self.summary {
            config.summary_file = Some(summary.clone());
        }
        if self.no_fail {
            config.fail_on_invalid = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check(args) => check_command(config, &args, cli.verbose),
        Commands::Dialects => {
            dialects_command();
            Ok(())
        }
    }
}

/// Log to stderr; RUST_LOG wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let default_path = Path::new("sqlvet.toml");

    let config = if let Some(config_path) = path {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else if default_path.exists() {
        Config::from_file(default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    Ok(config)
}

/// Check command - validate every query and write one result per query
fn check_command(mut config: Config, args: &CheckArgs, verbose: bool) -> Result<()> {
    args.apply_to(&mut config);

    // Unknown dialects stop the run before any input is read
    let dialect = resolve_dialect(&config.dialect)?;
    let validator = Validator::new(dialect).with_extended_checks(config.extended_checks);

    if verbose {
        eprintln!("{} dialect: {}", "Using".cyan(), validator.dialect().name());
        eprintln!("{} {}", "Reading queries from:".cyan(), args.path.display());
    }

    let records = read_input(&args.path, &ReaderOptions::from_config(&config))
        .with_context(|| format!("Failed to read queries from {}", args.path.display()))?;

    if records.is_empty() {
        eprintln!("{}", "No queries found".yellow());
    }

    let mut sink = ConsoleSink::new(JsonDirectoryWriter::new(&config.output_dir));

    let summary = validator
        .run(records, &mut sink)
        .with_context(|| format!("Failed to write results to {}", sink.inner.output_dir().display()))?;

    if let Some(summary_path) = &config.summary_file {
        summary
            .save_to_file(summary_path)
            .with_context(|| format!("Failed to write summary to {}", summary_path.display()))?;
        if verbose {
            eprintln!("{} {}", "Summary saved to:".green(), summary_path.display());
        }
    }

    print_run_summary(&summary, sink.inner.output_dir());

    if config.fail_on_invalid && summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Dialects command - show the registered dialect policies
fn dialects_command() {
    println!("{}", "Available dialects".bold());
    println!();

    for (name, dialect) in DIALECTS {
        let allowed: Vec<&str> = dialect.allowed_statements().iter().map(|k| k.as_str()).collect();
        let forbidden = dialect.forbidden_keywords();

        println!("  {}", name.green().bold());
        println!("    Max subquery depth: {}", dialect.max_subquery_depth());
        println!("    Statements:         {}", allowed.join(", "));
        if forbidden.is_empty() {
            println!("    Forbidden keywords: -");
        } else {
            println!("    Forbidden keywords: {}", forbidden.join(", "));
        }
        println!();
    }
}

/// Prints one line per result, then forwards it
struct ConsoleSink<S> {
    inner: S,
}

impl<S: ReportSink> ConsoleSink<S> {
    fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: ReportSink> ReportSink for ConsoleSink<S> {
    fn write(&mut self, result: &ValidationResult) -> Result<(), WriteError> {
        print_result(result);
        self.inner.write(result)
    }
}

fn print_result(result: &ValidationResult) {
    if result.is_success() {
        println!("{} #{} {}", "✓".green(), result.query_id, result.source_label);
        return;
    }

    println!("{} #{} {}", "✗".red(), result.query_id, result.source_label);
    for diag in &result.diagnostics {
        println!("    [{}] {}", diag.category.as_str().yellow(), diag);
    }
}

fn print_run_summary(summary: &RunSummary, output_dir: &Path) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "SQL Validation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Dialect:   {}", summary.dialect);
    println!("Results:   {}", output_dir.display());
    println!();

    println!("{}", "Summary:".bold());
    println!("  Processed: {}", summary.processed);
    println!("  Passed:    {}", summary.passed.to_string().green());

    if summary.failed > 0 {
        println!("  Failed:    {}", summary.failed.to_string().red().bold());
    } else {
        println!("  Failed:    {}", summary.failed.to_string().green());
    }

    println!();
    if summary.processed > 0 && !summary.has_failures() {
        println!("{}", "✓ All queries passed!".green().bold());
    }
    println!("{}", "=".repeat(60).bright_blue());
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlvet_engine::MemorySink;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "sqlvet", "check", "queries", "--dialect", "mysql", "--split", "line", "--extended", "--no-fail",
        ])
        .unwrap();

        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };

        let mut config = Config::default();
        args.apply_to(&mut config);

        assert_eq!(config.dialect, "mysql");
        assert_eq!(config.split, SplitMode::Line);
        assert!(config.extended_checks);
        assert!(!config.fail_on_invalid);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn missing_flags_keep_config() {
        let mut config = Config::from_toml("dialect = \"mysql\"\nextended_checks = true").unwrap();
        CheckArgs { path: PathBuf::from("q.sql"), ..Default::default() }.apply_to(&mut config);

        assert_eq!(config.dialect, "mysql");
        assert!(config.extended_checks);
    }

    #[test]
    fn unknown_dialect_fails_before_reading() {
        let mut config = Config::default();
        config.dialect = "oracle".to_string();
        let args = CheckArgs { path: PathBuf::from("/definitely/not/here"), ..Default::default() };

        let err = check_command(config, &args, false).unwrap_err();
        assert!(err.to_string().contains("Unknown dialect 'oracle'"));
    }

    #[test]
    fn check_writes_results_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("queries.sql");
        std::fs::write(&input, "SELECT a FROM t;\nWITH x (SELECT 1) SELECT * FROM x;").unwrap();

        let out = dir.path().join("out");
        let args = CheckArgs {
            path: input,
            dialect: Some("mysql".to_string()),
            output: Some(out.clone()),
            extended: true,
            no_fail: true,
            ..Default::default()
        };

        check_command(Config::default(), &args, false).unwrap();

        assert!(out.join("query_1.json").exists());
        let failed = std::fs::read_to_string(out.join("query_2.json")).unwrap();
        assert!(failed.contains("Invalid CTE"));
    }

    #[test]
    fn console_sink_forwards_results() {
        let mut sink = ConsoleSink::new(MemorySink::default());
        let result = ValidationResult::new(
            1,
            sqlvet_core::QueryRecord::new("q.sql", "SELECT a FROM t"),
            vec![],
        );

        sink.write(&result).unwrap();
        assert_eq!(sink.inner.results, vec![result]);
    }
}
