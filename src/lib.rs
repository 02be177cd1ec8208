//! dustilock - find dependencies that anyone could publish.
//!
//! Scans a project for Node (`package*.json`, `yarn*.json`) and Python
//! (`requirements*.txt`) manifests and reports every declared dependency
//! whose name is unclaimed on the public npm registry or PyPI. Such names
//! are open to dependency confusion: whoever registers them first can ship
//! code into builds that resolve them from the public index.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod registry;
pub mod scanner;

pub use config::Config;
pub use error::{OracleError, ScanError};
pub use model::{
    DependencyRecord, Ecosystem, ManifestFile, ScanFinding, ScanReport, VersionConstraint,
};
pub use registry::{PublicRegistry, RegistryOracle};
pub use scanner::{FindingSink, ScanMode, Scanner};
