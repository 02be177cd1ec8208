use crate::model::{DependencyMap, VersionConstraint};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

#[derive(Deserialize)]
struct PackageJson {
    dependencies: Option<Map<String, Value>>,
    #[serde(rename = "devDependencies")]
    dev_dependencies: Option<Map<String, Value>>,
}

/// Parses the `dependencies` and `devDependencies` of a Node manifest.
///
/// Scoped packages (`@scope/name`) are left out, as are entries whose
/// version is an alias (`npm:other@1.0`) or a URL; none of these resolve
/// by bare name through the public registry. An entry repeated in
/// `devDependencies` overrides the one in `dependencies`.
///
/// # Errors
///
/// Returns an error if the content is not JSON or its top-level shape
/// does not decode (for example `dependencies` is not an object).
pub fn parse_package_json<R: Read>(reader: R) -> Result<DependencyMap, serde_json::Error> {
    let manifest: PackageJson = serde_json::from_reader(reader)?;
    let mut dependencies = DependencyMap::new();

    let sections = [manifest.dependencies, manifest.dev_dependencies];
    for (name, value) in sections.into_iter().flatten().flatten() {
        if name.starts_with('@') || name.is_empty() {
            continue;
        }

        if let Some(constraint) = declared_constraint(&value) {
            dependencies.insert(name.to_lowercase(), constraint);
        }
    }

    Ok(dependencies)
}

fn declared_constraint(value: &Value) -> Option<VersionConstraint> {
    let version = match value {
        Value::Null => return Some(VersionConstraint::Unconstrained),
        Value::String(version) => version.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };

    if version.starts_with("npm:") || version.contains("://") {
        return None;
    }

    if version.is_empty() {
        return Some(VersionConstraint::Unconstrained);
    }

    Some(VersionConstraint::Declared(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> DependencyMap {
        parse_package_json(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_merges_dependencies_and_dev_dependencies() {
        let deps = parse(
            r#"{
                "name": "app",
                "dependencies": {"express": "^4.18.2", "lodash": "4.17.21"},
                "devDependencies": {"jest": "~29.7.0"}
            }"#,
        );

        assert_eq!(deps.len(), 3);
        assert_eq!(deps["express"].to_string(), "^4.18.2");
        assert_eq!(deps["lodash"].to_string(), "4.17.21");
        assert_eq!(deps["jest"].to_string(), "~29.7.0");
    }

    #[test]
    fn test_scoped_packages_are_skipped() {
        let deps = parse(r#"{"dependencies":{"@scope/x":"1.0.0","bar":"1.0.0"}}"#);
        assert_eq!(deps.len(), 1);
        assert!(deps.contains_key("bar"));
        assert!(deps.keys().all(|name| !name.starts_with('@')));
    }

    #[test]
    fn test_alias_versions_are_skipped() {
        let deps = parse(
            r#"{"dependencies":{"aliased":"npm:real-package@1.0.0","NPMUPPER":"NPM:other@2"}}"#,
        );
        assert!(deps.is_empty());
    }

    #[test]
    fn test_url_versions_are_skipped() {
        let deps = parse(
            r#"{"dependencies":{
                "from-git":"git+https://github.com/org/repo.git",
                "from-tarball":"https://example.com/pkg.tgz",
                "normal":"1.0.0"
            }}"#,
        );
        assert_eq!(deps.len(), 1);
        assert!(deps.contains_key("normal"));
    }

    #[test]
    fn test_versions_are_lowercased() {
        let deps = parse(r#"{"dependencies":{"tagged":"LATEST"}}"#);
        assert_eq!(deps["tagged"].to_string(), "latest");
    }

    #[test]
    fn test_null_or_empty_version_is_unconstrained() {
        let deps = parse(r#"{"dependencies":{"nothing":null,"blank":""}}"#);
        assert_eq!(deps["nothing"], VersionConstraint::Unconstrained);
        assert_eq!(deps["blank"].to_string(), "*");
    }

    #[test]
    fn test_dev_dependency_overrides_dependency() {
        let deps = parse(r#"{"dependencies":{"dup":"1.0.0"},"devDependencies":{"dup":"2.0.0"}}"#);
        assert_eq!(deps["dup"].to_string(), "2.0.0");
    }

    #[test]
    fn test_missing_sections_yield_nothing() {
        assert!(parse(r#"{"name":"empty","version":"1.0.0"}"#).is_empty());
        assert!(parse(r#"{"dependencies":null}"#).is_empty());
    }

    #[test]
    fn test_lockfile_style_values_are_stringified() {
        let deps = parse(r#"{"dependencies":{"nested":{"version":"1.0.0"}}}"#);
        assert_eq!(deps["nested"].to_string(), r#"{"version":"1.0.0"}"#);
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(parse_package_json("{\"dependencies\": {".as_bytes()).is_err());
        assert!(parse_package_json("not json".as_bytes()).is_err());
    }

    #[test]
    fn test_wrong_shape_fails() {
        assert!(parse_package_json("[1, 2, 3]".as_bytes()).is_err());
        assert!(parse_package_json(r#"{"dependencies": ["a", "b"]}"#.as_bytes()).is_err());
    }
}
