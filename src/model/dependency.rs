use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Node,
    Python,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Node => "node",
            Ecosystem::Python => "python",
        }
    }

    /// Name of the public registry packages of this ecosystem resolve from.
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Node => "npm",
            Ecosystem::Python => "python",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Node => "NPM",
            Ecosystem::Python => "PyPI",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Comparison operators accepted in a requirements line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    /// Single `=`, the conda spelling of an exact pin.
    #[serde(rename = "=")]
    CondaEqual,
}

impl Operator {
    /// Longest operators first so `==` is never read as `=`.
    const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Greater,
        Operator::Less,
        Operator::CondaEqual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::CondaEqual => "=",
        }
    }

    /// Splits a leading operator off `input`, returning it with the remainder.
    pub fn strip_prefix(input: &str) -> Option<(Operator, &str)> {
        Self::ALL
            .iter()
            .find_map(|op| input.strip_prefix(op.as_str()).map(|rest| (*op, rest)))
    }
}

/// A version constraint, kept for display only.
///
/// The serialized forms are stable: `Any` renders as `any`, `Unconstrained`
/// as `*`, `Pinned` as operator followed by version (with a `:conda` suffix
/// for a single `=`), and `Declared` as the raw lowercased manifest value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionConstraint {
    /// Referenced through an `#egg=` fragment; any version may be pulled.
    Any,
    /// Declared without a version.
    Unconstrained,
    Pinned { op: Operator, version: String },
    /// Free-form value taken verbatim from a Node manifest.
    Declared(String),
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Any => f.write_str("any"),
            VersionConstraint::Unconstrained => f.write_str("*"),
            VersionConstraint::Pinned { op, version } => {
                write!(f, "{}{}", op.as_str(), version)?;
                if *op == Operator::CondaEqual {
                    f.write_str(":conda")?;
                }
                Ok(())
            }
            VersionConstraint::Declared(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for VersionConstraint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A declared dependency name and the constraint it was declared with.
///
/// The name is the registry lookup key: non-empty, never scoped (`@...`),
/// never a URL or alias reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyRecord {
    pub name: String,
    pub constraint: VersionConstraint,
}

impl DependencyRecord {
    pub fn new(name: impl Into<String>, constraint: VersionConstraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }
}

/// Parsed dependencies keyed by name; a repeated name keeps the last constraint.
pub type DependencyMap = BTreeMap<String, VersionConstraint>;

/// A manifest that matched a filename pattern and parsed successfully.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub ecosystem: Ecosystem,
    pub dependencies: DependencyMap,
}

impl ManifestFile {
    pub fn new(
        path: impl Into<PathBuf>,
        ecosystem: Ecosystem,
        dependencies: DependencyMap,
    ) -> Self {
        Self {
            path: path.into(),
            ecosystem,
            dependencies,
        }
    }

    pub fn records(&self) -> impl Iterator<Item = DependencyRecord> + '_ {
        self.dependencies
            .iter()
            .map(|(name, constraint)| DependencyRecord::new(name.clone(), constraint.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_constraint_display() {
        let pinned = VersionConstraint::Pinned {
            op: Operator::Equal,
            version: "1.2.3".to_string(),
        };
        assert_eq!(pinned.to_string(), "==1.2.3");

        let lower = VersionConstraint::Pinned {
            op: Operator::GreaterOrEqual,
            version: "2.0".to_string(),
        };
        assert_eq!(lower.to_string(), ">=2.0");
    }

    #[test]
    fn test_conda_pin_gets_marker() {
        let conda = VersionConstraint::Pinned {
            op: Operator::CondaEqual,
            version: "1.0".to_string(),
        };
        assert_eq!(conda.to_string(), "=1.0:conda");
    }

    #[test]
    fn test_fixed_constraint_forms() {
        assert_eq!(VersionConstraint::Any.to_string(), "any");
        assert_eq!(VersionConstraint::Unconstrained.to_string(), "*");
        assert_eq!(
            VersionConstraint::Declared("^4.17.21".to_string()).to_string(),
            "^4.17.21"
        );
    }

    #[test]
    fn test_operator_prefers_longest_match() {
        assert_eq!(Operator::strip_prefix("==1.0"), Some((Operator::Equal, "1.0")));
        assert_eq!(Operator::strip_prefix(">=1.0"), Some((Operator::GreaterOrEqual, "1.0")));
        assert_eq!(Operator::strip_prefix("<=1.0"), Some((Operator::LessOrEqual, "1.0")));
        assert_eq!(Operator::strip_prefix(">1.0"), Some((Operator::Greater, "1.0")));
        assert_eq!(Operator::strip_prefix("=1.0"), Some((Operator::CondaEqual, "1.0")));
        assert_eq!(Operator::strip_prefix("~=1.0"), None);
    }

    #[test]
    fn test_constraint_serializes_as_string() {
        let json = serde_json::to_string(&VersionConstraint::Unconstrained).unwrap();
        assert_eq!(json, "\"*\"");
    }

    #[test]
    fn test_ecosystem_names() {
        assert_eq!(Ecosystem::Node.registry_name(), "npm");
        assert_eq!(Ecosystem::Python.registry_name(), "python");
        assert_eq!(Ecosystem::Python.to_string(), "PyPI");
    }
}
