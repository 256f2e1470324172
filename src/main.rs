use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error};

use trackline::ReportBuilder;

/// Turn Epic, Feature, and Dependency exports into a dated program status report
#[derive(Parser)]
#[command(name = "trackline")]
#[command(about = "Generate a program status report from Jira-style CSV exports", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Epics CSV export (prompted for when omitted)
    #[arg(short, long)]
    epics: Option<PathBuf>,

    /// Path to the Features CSV export (prompted for when omitted)
    #[arg(short, long)]
    features: Option<PathBuf>,

    /// Path to the Dependencies CSV export (prompted for when omitted)
    #[arg(short, long)]
    dependencies: Option<PathBuf>,

    /// Directory the report file is written into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .init();

    debug!("trackline started with verbosity level: {}", cli.verbose);

    if let Err(e) = run(cli) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let epics = resolve_path(cli.epics, "Epics")?;
    let features = resolve_path(cli.features, "Features")?;
    let dependencies = resolve_path(cli.dependencies, "Dependencies")?;

    let report = ReportBuilder::new(epics, features, dependencies)
        .output_dir(cli.output_dir)
        .build()?;

    println!("✅ Report written to {}", report.display());
    Ok(())
}

/// Use the flag value when given, otherwise prompt on stdin.
fn resolve_path(flag: Option<PathBuf>, table: &str) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    print!("Enter the {table} CSV file path: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PathBuf::from(input.trim()))
}
