use crate::model::Ecosystem;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Manifest file kinds, in the order their patterns are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// `package*.json`
    PackageJson,
    /// `yarn*.json`
    YarnJson,
    /// `requirements*.txt`
    Requirements,
}

static MANIFEST_PATTERNS: LazyLock<Vec<(ManifestKind, Regex)>> = LazyLock::new(|| {
    ManifestKind::ALL
        .iter()
        .map(|kind| {
            let pattern = Regex::new(kind.pattern()).expect("manifest filename pattern");
            (*kind, pattern)
        })
        .collect()
});

impl ManifestKind {
    pub const ALL: [ManifestKind; 3] = [
        ManifestKind::PackageJson,
        ManifestKind::YarnJson,
        ManifestKind::Requirements,
    ];

    /// Filename pattern, anchored on the whole base name.
    pub fn pattern(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => r"^package.*\.json$",
            ManifestKind::YarnJson => r"^yarn.*\.json$",
            ManifestKind::Requirements => r"^requirements.*\.txt$",
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            ManifestKind::PackageJson | ManifestKind::YarnJson => Ecosystem::Node,
            ManifestKind::Requirements => Ecosystem::Python,
        }
    }

    /// Classifies a file by base name; the first matching pattern wins.
    pub fn classify(file_name: &str) -> Option<ManifestKind> {
        MANIFEST_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(file_name))
            .map(|(kind, _)| *kind)
    }
}

/// A file selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCandidate {
    pub path: PathBuf,
    pub kind: ManifestKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_manifests() {
        assert_eq!(ManifestKind::classify("package.json"), Some(ManifestKind::PackageJson));
        assert_eq!(ManifestKind::classify("package-lock.json"), Some(ManifestKind::PackageJson));
        assert_eq!(ManifestKind::classify("packages.json"), Some(ManifestKind::PackageJson));
        assert_eq!(ManifestKind::classify("yarn.json"), Some(ManifestKind::YarnJson));
        assert_eq!(ManifestKind::classify("yarn-workspace.json"), Some(ManifestKind::YarnJson));
    }

    #[test]
    fn test_python_manifests() {
        for name in ["requirements.txt", "requirements-dev.txt", "requirements_test.txt"] {
            assert_eq!(ManifestKind::classify(name), Some(ManifestKind::Requirements));
        }
    }

    #[test]
    fn test_non_manifests() {
        assert_eq!(ManifestKind::classify("README.md"), None);
        assert_eq!(ManifestKind::classify("yarn.lock"), None);
        assert_eq!(ManifestKind::classify("dev-requirements.txt"), None);
        assert_eq!(ManifestKind::classify("package.json.bak"), None);
        assert_eq!(ManifestKind::classify("Package.json"), None);
        assert_eq!(ManifestKind::classify("tsconfig.json"), None);
    }

    #[test]
    fn test_ecosystem_routing() {
        assert_eq!(ManifestKind::PackageJson.ecosystem(), Ecosystem::Node);
        assert_eq!(ManifestKind::YarnJson.ecosystem(), Ecosystem::Node);
        assert_eq!(ManifestKind::Requirements.ecosystem(), Ecosystem::Python);
    }
}
