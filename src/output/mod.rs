mod cli;
mod json;

pub use cli::{print_cli_table, ConsoleSink};
pub use json::print_json;

use crate::model::ScanReport;
use anyhow::Result;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Streamed progress lines plus a summary table
    Text,
    /// JSON report for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

pub fn print_result(report: &ScanReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_cli_table(report),
        OutputFormat::Json => print_json(report),
    }
}
