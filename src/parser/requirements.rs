use crate::model::{DependencyMap, Operator, VersionConstraint};
use regex::Regex;
use std::io::BufRead;
use std::sync::LazyLock;

static EGG_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#&]+egg=([A-Za-z0-9_.\-]+)").expect("egg fragment pattern"));

static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+").expect("package name pattern"));

/// Parses a pip requirements file.
///
/// Lines that declare nothing resolvable from the index (comments, pip
/// options such as `-r`/`--requirement`/`-e`, direct URLs) are skipped.
/// Reading stops at the first I/O error; whatever was parsed so far is
/// returned.
pub fn parse_requirements<R: BufRead>(reader: R) -> DependencyMap {
    let mut dependencies = DependencyMap::new();

    for line in reader.split(b'\n') {
        let Ok(line) = line else {
            break;
        };
        let line = String::from_utf8_lossy(&line);
        if let Some((name, constraint)) = parse_requirement_line(&line) {
            dependencies.insert(name, constraint);
        }
    }

    dependencies
}

/// Parses a single requirements line into a lowercased name and constraint.
pub fn parse_requirement_line(line: &str) -> Option<(String, VersionConstraint)> {
    let line = line.trim();

    // `-e git+https://host/repo.git#egg=name` still names a package
    if let Some(captures) = EGG_FRAGMENT.captures(line) {
        return Some((captures[1].to_lowercase(), VersionConstraint::Any));
    }

    let line = match line.find('#') {
        Some(comment) => line[..comment].trim_end(),
        None => line,
    };

    if line.is_empty() || line.starts_with('-') || line.contains("://") {
        return None;
    }

    let name = PACKAGE_NAME.find(line)?;
    let constraint = parse_constraint(&line[name.end()..]);

    Some((name.as_str().to_lowercase(), constraint))
}

/// Reads `[extras] [operator version]` following a package name.
fn parse_constraint(rest: &str) -> VersionConstraint {
    let rest = skip_extras(rest.trim_start()).trim_start();

    let Some((op, rest)) = Operator::strip_prefix(rest) else {
        return VersionConstraint::Unconstrained;
    };

    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());

    if end == 0 {
        return VersionConstraint::Unconstrained;
    }

    VersionConstraint::Pinned {
        op,
        version: rest[..end].to_string(),
    }
}

fn skip_extras(rest: &str) -> &str {
    rest.strip_prefix('[')
        .and_then(|inner| inner.find(']').map(|close| &inner[close + 1..]))
        .unwrap_or(rest)
}
