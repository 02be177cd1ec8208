//! Manifest parsers.
//!
//! Each parser turns manifest content into a [`DependencyMap`] of
//! lowercased dependency names to their declared constraints.
//!
//! | Parser | Files | Ecosystem |
//! |--------|-------|-----------|
//! | [`parse_package_json`] | `package*.json`, `yarn*.json` | Node |
//! | [`parse_requirements`] | `requirements*.txt` | Python |
//!
//! The requirements parser is best-effort and never fails; unrecognized
//! lines are skipped. The Node parser fails only when the document is not
//! JSON of the expected shape.

mod package_json;
mod requirements;

pub use package_json::parse_package_json;
pub use requirements::{parse_requirement_line, parse_requirements};

use crate::model::{DependencyMap, Ecosystem};
use std::io::BufRead;

/// Parses manifest content with the parser for `ecosystem`.
pub fn parse_manifest<R: BufRead>(
    ecosystem: Ecosystem,
    reader: R,
) -> Result<DependencyMap, serde_json::Error> {
    match ecosystem {
        Ecosystem::Node => parse_package_json(reader),
        Ecosystem::Python => Ok(parse_requirements(reader)),
    }
}
