use super::{Ecosystem, VersionConstraint};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A dependency whose name is currently unclaimed on its public registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFinding {
    pub manifest_path: PathBuf,
    pub dependency_name: String,
    pub version_constraint: VersionConstraint,
    pub ecosystem: Ecosystem,
}

impl ScanFinding {
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        dependency_name: impl Into<String>,
        version_constraint: VersionConstraint,
        ecosystem: Ecosystem,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            dependency_name: dependency_name.into(),
            version_constraint,
            ecosystem,
        }
    }
}

impl fmt::Display for ScanFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} package \"{}:{}\" is available for public registration. {}",
            self.ecosystem.registry_name(),
            self.dependency_name,
            self.version_constraint,
            self.manifest_path.display()
        )
    }
}

/// Outcome of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub recursive: bool,
    pub scanned_at: DateTime<Utc>,
    pub manifests_scanned: usize,
    pub findings: Vec<ScanFinding>,
    /// True when at least one dependency can be registered by anyone.
    pub at_risk: bool,
}

impl ScanReport {
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
            scanned_at: Utc::now(),
            manifests_scanned: 0,
            findings: Vec::new(),
            at_risk: false,
        }
    }

    pub fn record(&mut self, finding: ScanFinding) {
        self.at_risk = true;
        self.findings.push(finding);
    }

    pub fn findings_for(&self, ecosystem: Ecosystem) -> impl Iterator<Item = &ScanFinding> {
        self.findings
            .iter()
            .filter(move |finding| finding.ecosystem == ecosystem)
    }
}
