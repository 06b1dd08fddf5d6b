//! Org Audit CLI - command-line interface for organizational policy checks
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates the command line into an audit of one roster file
//! - Handles external concerns like configuration discovery, exit codes and terminal output

use anyhow::Context;
use clap::{Parser, ValueEnum};
use org_audit::{
    AnalysisOptions, AuditConfig, AuditOptions, OrgAuditor, OutputFormat, ReportFormatter,
    ReportOptions,
};
use std::path::PathBuf;
use std::process;

/// Org Audit - salary and reporting-line policy checks
#[derive(Parser)]
#[command(name = "org-audit")]
#[command(version = "0.1.0")]
#[command(about = "Validates a management hierarchy and reports policy violations")]
#[command(long_about = "Org Audit reads an employee roster (id,name,salary,managerId), validates the management hierarchy it describes, and reports managers paid outside the allowed band and employees with overly long reporting lines.")]
struct Cli {
    /// Roster file to analyze
    roster: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Run the two analyses in parallel
    #[arg(long)]
    parallel: bool,

    /// Exit with status 2 when any violation is found
    #[arg(long)]
    fail_on_violations: bool,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config)?;
    let formatter = ReportFormatter::new(ReportOptions {
        use_colors: !cli.no_color,
        ..Default::default()
    });
    let auditor = OrgAuditor::new_with_config(config)?.with_report_formatter(formatter);

    let options = AuditOptions {
        analysis_options: AnalysisOptions {
            parallel: cli.parallel,
        },
    };

    let report = auditor
        .audit_file(&cli.roster, &options)
        .with_context(|| format!("failed to audit '{}'", cli.roster.display()))?;

    println!("{}", auditor.format_report(&report, cli.format.into())?);

    if cli.fail_on_violations && report.has_violations() {
        Ok(2)
    } else {
        Ok(0)
    }
}

fn load_config(config_path: Option<PathBuf>) -> anyhow::Result<AuditConfig> {
    if let Some(path) = config_path {
        return AuditConfig::load_from_file(&path)
            .with_context(|| format!("failed to load configuration '{}'", path.display()));
    }

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(AuditConfig::discover_in(cwd)?.unwrap_or_default())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
