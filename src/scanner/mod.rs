//! Directory traversal and manifest analysis.
//!
//! The [`Scanner`] finds manifests under a directory, parses each one, and
//! asks a [`RegistryOracle`] whether every declared name is free on its public
//! registry. Free names become [`ScanFinding`]s, pushed to a [`FindingSink`]
//! as they are confirmed and collected into the returned [`ScanReport`].
//!
//! # Manifest Patterns
//!
//! | Pattern | Parser |
//! |---------|--------|
//! | `package*.json` | Node |
//! | `yarn*.json` | Node |
//! | `requirements*.txt` | Python |
//!
//! # Example
//!
//! ```no_run
//! use dustilock::config::RegistryConfig;
//! use dustilock::registry::PublicRegistry;
//! use dustilock::scanner::{NullSink, ScanMode, Scanner};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = PublicRegistry::new(&RegistryConfig::default())?;
//!     let scanner = Scanner::new(Box::new(registry));
//!
//!     let report = scanner
//!         .scan(Path::new("."), ScanMode::Recursive, &mut NullSink)
//!         .await?;
//!     for finding in &report.findings {
//!         println!("{}", finding);
//!     }
//!     Ok(())
//! }
//! ```

mod manifest;

pub use manifest::{ManifestCandidate, ManifestKind};

use crate::config::{Config, IgnoreConfig, DEFAULT_EXCLUDED_DIRECTORIES};
use crate::error::{Result, ScanError};
use crate::model::{DependencyRecord, Ecosystem, ManifestFile, ScanFinding, ScanReport};
use crate::parser::parse_manifest;
use crate::registry::RegistryOracle;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Whether a scan looks only at a directory's own files or its whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Flat,
    Recursive,
}

/// Receives scan progress as it happens.
pub trait FindingSink {
    /// Called before a matched manifest is parsed.
    fn on_manifest(&mut self, _path: &Path, _ecosystem: Ecosystem) {}

    /// Called once per dependency confirmed available for registration.
    fn on_finding(&mut self, finding: &ScanFinding);
}

/// Discards everything; the returned report still carries the findings.
pub struct NullSink;

impl FindingSink for NullSink {
    fn on_finding(&mut self, _finding: &ScanFinding) {}
}

impl FindingSink for Vec<ScanFinding> {
    fn on_finding(&mut self, finding: &ScanFinding) {
        self.push(finding.clone());
    }
}

pub struct Scanner {
    oracle: Box<dyn RegistryOracle>,
    exclusions: BTreeSet<String>,
    ignore: IgnoreConfig,
    concurrency: usize,
}

impl Scanner {
    /// Creates a scanner with the default exclusion set and one registry
    /// query at a time.
    pub fn new(oracle: Box<dyn RegistryOracle>) -> Self {
        Self {
            oracle,
            exclusions: DEFAULT_EXCLUDED_DIRECTORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            ignore: IgnoreConfig::default(),
            concurrency: 1,
        }
    }

    pub fn from_config(oracle: Box<dyn RegistryOracle>, config: &Config) -> Self {
        Self {
            oracle,
            exclusions: config.exclusion_set(),
            ignore: config.ignore.clone(),
            concurrency: config.effective_concurrency(),
        }
    }

    /// Replaces the directory names pruned from recursive scans.
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreConfig) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn exclusions(&self) -> &BTreeSet<String> {
        &self.exclusions
    }

    /// Scans `root` and returns every finding.
    ///
    /// # Errors
    ///
    /// Stops at the first failure: an unreadable directory or file, a
    /// malformed Node manifest, or a failed registry query. Findings already
    /// handed to `sink` stay delivered.
    pub async fn scan(
        &self,
        root: &Path,
        mode: ScanMode,
        sink: &mut dyn FindingSink,
    ) -> Result<ScanReport> {
        let mut report = ScanReport::new(root, mode == ScanMode::Recursive);

        match mode {
            ScanMode::Flat => {
                for candidate in self.list_directory(root)? {
                    self.analyze_manifest(&candidate, sink, &mut report).await?;
                }
            }
            ScanMode::Recursive => {
                for entry in self.walk(root) {
                    let entry = entry.map_err(|source| ScanError::Walk {
                        path: source.path().unwrap_or(root).to_path_buf(),
                        source,
                    })?;

                    if let Some(candidate) = classify_entry(entry) {
                        self.analyze_manifest(&candidate, sink, &mut report).await?;
                    }
                }
            }
        }
        debug!(count = report.manifests_scanned, "Scanned manifests");

        Ok(report)
    }

    /// Scans the immediate files of `dir`.
    pub async fn scan_directory(
        &self,
        dir: &Path,
        sink: &mut dyn FindingSink,
    ) -> Result<ScanReport> {
        self.scan(dir, ScanMode::Flat, sink).await
    }

    /// Scans the whole tree under `root`, skipping excluded directories.
    pub async fn scan_directory_recursive(
        &self,
        root: &Path,
        sink: &mut dyn FindingSink,
    ) -> Result<ScanReport> {
        self.scan(root, ScanMode::Recursive, sink).await
    }

    /// Matched manifests directly inside `dir`, sorted by file name.
    pub fn list_directory(&self, dir: &Path) -> Result<Vec<ManifestCandidate>> {
        let entries = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| io_error(dir, source))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if let Some(kind) = entry.file_name().to_str().and_then(ManifestKind::classify) {
                candidates.push(ManifestCandidate { path, kind });
            }
        }

        candidates.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(candidates)
    }

    /// Entries under `root` in depth-first order, sorted by file name.
    ///
    /// A directory whose name is in the exclusion set is pruned with its
    /// whole subtree. The root itself is always walked.
    fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry))
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let excluded = entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.exclusions.contains(name));

        if excluded {
            debug!("Skipping excluded directory {}", entry.path().display());
        }
        excluded
    }

    /// Parses one manifest and checks each of its dependencies.
    async fn analyze_manifest(
        &self,
        candidate: &ManifestCandidate,
        sink: &mut dyn FindingSink,
        report: &mut ScanReport,
    ) -> Result<()> {
        let ecosystem = candidate.kind.ecosystem();
        info!("Scanning \"{}\"", candidate.path.display());
        sink.on_manifest(&candidate.path, ecosystem);

        let manifest = load_manifest(&candidate.path, ecosystem)?;
        report.manifests_scanned += 1;

        let records: Vec<DependencyRecord> = manifest
            .records()
            .filter(|record| {
                let ignored = self.ignore.should_ignore_package(&record.name);
                if ignored {
                    debug!("Ignoring {} package \"{}\"", ecosystem.registry_name(), record.name);
                }
                !ignored
            })
            .collect();

        let oracle = self.oracle.as_ref();
        let mut checks = stream::iter(records)
            .map(|record| async move {
                let available = oracle.is_available(ecosystem, &record.name).await;
                (record, available)
            })
            .buffer_unordered(self.concurrency);

        while let Some((record, available)) = checks.next().await {
            if !available? {
                continue;
            }

            let finding = ScanFinding::new(
                &manifest.path,
                record.name,
                record.constraint,
                ecosystem,
            );
            sink.on_finding(&finding);
            report.record(finding);
        }

        Ok(())
    }
}

fn classify_entry(entry: DirEntry) -> Option<ManifestCandidate> {
    if !entry.path().is_file() {
        return None;
    }

    let kind = entry.file_name().to_str().and_then(ManifestKind::classify)?;
    Some(ManifestCandidate {
        path: entry.into_path(),
        kind,
    })
}

/// Reads and parses a manifest file.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if the file cannot be read and
/// [`ScanError::Parse`] if a Node manifest is not valid JSON.
pub fn load_manifest(path: &Path, ecosystem: Ecosystem) -> Result<ManifestFile> {
    let content = fs::read(path).map_err(|source| io_error(path, source))?;
    let dependencies =
        parse_manifest(ecosystem, content.as_slice()).map_err(|source| ScanError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(ManifestFile::new(path, ecosystem, dependencies))
}

fn io_error(path: &Path, source: std::io::Error) -> ScanError {
    ScanError::Io {
        path: PathBuf::from(path),
        source,
    }
}
