use crate::model::{Ecosystem, ScanFinding, ScanReport};
use crate::scanner::FindingSink;
use anyhow::Result;
use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Registry")]
    registry: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Constraint")]
    constraint: String,
    #[tabled(rename = "Manifest")]
    manifest: String,
}

/// Streams scan progress as plain lines.
///
/// Scanned manifests go to `out`; findings go to `err` so they stay visible
/// when stdout is redirected. Write failures such as a closed pipe are
/// ignored; the returned report still carries every finding.
pub struct ConsoleSink<O: Write, E: Write> {
    out: O,
    err: E,
}

impl ConsoleSink<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> FindingSink for ConsoleSink<O, E> {
    fn on_manifest(&mut self, path: &Path, _ecosystem: Ecosystem) {
        let _ = writeln!(self.out, "[*] Scanning \"{}\"", path.display());
    }

    fn on_finding(&mut self, finding: &ScanFinding) {
        let _ = writeln!(self.err, "[!] {}", finding);
    }
}

pub fn print_cli_table(report: &ScanReport) -> Result<()> {
    println!();
    println!("{}", render_summary(report));
    Ok(())
}

fn render_summary(report: &ScanReport) -> String {
    let mut lines = vec![format!(
        "Scanned {} manifest(s) in \"{}\" (recursive={}) at {}",
        report.manifests_scanned,
        report.root.display(),
        report.recursive,
        report.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    )];

    if report.findings.is_empty() {
        lines.push("No packages are available for public registration.".to_string());
        return lines.join("\n");
    }

    let rows: Vec<FindingRow> = report
        .findings
        .iter()
        .map(|finding| FindingRow {
            registry: finding.ecosystem.display_name().to_string(),
            package: truncate(&finding.dependency_name, 40),
            constraint: truncate(&finding.version_constraint.to_string(), 24),
            manifest: finding.manifest_path.display().to_string(),
        })
        .collect();

    lines.push(String::new());
    lines.push(Table::new(rows).with(Style::rounded()).to_string());
    lines.push(String::new());

    let npm = report.findings_for(Ecosystem::Node).count();
    let python = report.findings_for(Ecosystem::Python).count();
    lines.push(format!(
        "{} package(s) available for public registration ({} npm, {} PyPI)",
        report.findings.len(),
        npm,
        python
    ));

    lines.join("\n")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
