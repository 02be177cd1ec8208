//! Core data types for manifests, dependencies, and scan results.
//!
//! This module contains the fundamental types used throughout dustilock:
//!
//! - [`Ecosystem`] - The public registry a manifest resolves against (npm, PyPI)
//! - [`DependencyRecord`] - A declared dependency name and its version constraint
//! - [`ManifestFile`] - A parsed manifest and the dependencies it declares
//! - [`ScanFinding`] - A dependency whose name is free to register publicly
//! - [`ScanReport`] - Complete scan results
//!
//! # Example
//!
//! ```
//! use dustilock::model::{Ecosystem, ScanFinding, VersionConstraint};
//!
//! let finding = ScanFinding::new(
//!     "package.json",
//!     "left-padz",
//!     VersionConstraint::Unconstrained,
//!     Ecosystem::Node,
//! );
//! assert_eq!(
//!     finding.to_string(),
//!     "npm package \"left-padz:*\" is available for public registration. package.json"
//! );
//! ```

mod dependency;
mod finding;

pub use dependency::*;
pub use finding::*;
