use anyhow::{Context, Result};
use clap::Parser;
use dustilock::{
    config::Config,
    model::ScanReport,
    output::{print_result, ConsoleSink, OutputFormat},
    registry::PublicRegistry,
    scanner::{FindingSink, NullSink, ScanMode, Scanner},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const AT_RISK: u8 = 1;
    pub const ERROR: u8 = 2;
}

#[derive(Parser)]
#[command(name = "dustilock")]
#[command(
    author,
    version,
    about = "Find dependencies that are available for public registration (dependency confusion)"
)]
struct Cli {
    /// Scan all files recursively
    #[arg(short, long)]
    recursive: bool,

    /// Audit only: report findings but exit successfully
    #[arg(short, long)]
    audit: bool,

    /// The path to scan (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Additional directory name to skip during recursive scans
    #[arg(long, value_name = "NAME")]
    exclude: Vec<String>,

    /// Maximum registry queries in flight per manifest
    #[arg(long)]
    concurrency: Option<usize>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write the default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "dustilock=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    if cli.print_config {
        println!("{}", Config::generate_default_config());
        return Ok(exit_codes::SUCCESS);
    }

    if cli.init_config {
        handle_init_config()?;
        return Ok(exit_codes::SUCCESS);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.excluded_directories.extend(cli.exclude);
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }

    let format_str = cli.format.unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Text;

    let root = match cli.path {
        Some(path) => std::path::absolute(&path)
            .with_context(|| format!("Invalid scan path: {}", path.display()))?,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let mode = if cli.recursive {
        ScanMode::Recursive
    } else {
        ScanMode::Flat
    };

    let registry =
        PublicRegistry::new(&config.registry).context("Failed to set up registry client")?;
    let scanner = Scanner::from_config(Box::new(registry), &config);

    if is_interactive {
        println!(
            "[*] Scanning directory \"{}\" (recursive={}) ...",
            root.display(),
            cli.recursive
        );
    }

    let mut console = ConsoleSink::stdio();
    let mut quiet = NullSink;
    let sink: &mut dyn FindingSink = if is_interactive {
        &mut console
    } else {
        &mut quiet
    };

    let report = scanner
        .scan(&root, mode, sink)
        .await
        .with_context(|| format!("Scan of \"{}\" failed", root.display()))?;

    print_result(&report, format)?;

    if is_interactive && report.at_risk {
        eprintln!("[!] One or more packages are available for public registration");
    }

    Ok(determine_exit_code(&report, cli.audit))
}

/// Findings fail the run unless audit mode is on.
fn determine_exit_code(report: &ScanReport, audit: bool) -> u8 {
    if report.at_risk && !audit {
        exit_codes::AT_RISK
    } else {
        exit_codes::SUCCESS
    }
}

fn handle_init_config() -> Result<()> {
    let config_path = Config::config_path();

    if config_path.exists() {
        println!("Config file already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default().save()?;
    println!("Created config file at: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dustilock::model::{Ecosystem, ScanFinding, VersionConstraint};

    fn report_with_finding() -> ScanReport {
        let mut report = ScanReport::new("/repo", false);
        report.record(ScanFinding::new(
            "/repo/requirements.txt",
            "foo",
            VersionConstraint::Unconstrained,
            Ecosystem::Python,
        ));
        report
    }

    #[test]
    fn test_exit_code_without_findings() {
        let report = ScanReport::new("/repo", true);
        assert_eq!(determine_exit_code(&report, false), exit_codes::SUCCESS);
        assert_eq!(determine_exit_code(&report, true), exit_codes::SUCCESS);
    }

    #[test]
    fn test_exit_code_with_findings() {
        let report = report_with_finding();
        assert_eq!(determine_exit_code(&report, false), exit_codes::AT_RISK);
        assert_eq!(determine_exit_code(&report, true), exit_codes::SUCCESS);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "dustilock",
            "-r",
            "-a",
            "--path",
            "/srv/app",
            "--exclude",
            "vendor",
            "--exclude",
            ".venv",
        ]);

        assert!(cli.recursive);
        assert!(cli.audit);
        assert_eq!(cli.path, Some(PathBuf::from("/srv/app")));
        assert_eq!(cli.exclude, vec!["vendor", ".venv"]);
    }
}
