use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Name of the package-metadata file looked up inside a package root
pub const PACKAGE_METADATA_FILENAME: &'static str = "package.json";

/// Parsed `package.json`, reduced to the fields this tool consumes.
///
/// Every field is optional in the wild; defaulting happens here, once at load time, so the rest of
/// the code never re-checks for absent fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageDescriptor {
    pub name: Option<String>,
    /// Entry point consulted when resolving a bare package specifier with no sub-path
    pub main: Option<String>,
    /// Peer names mapped to version ranges. Declaration order is preserved; the range strings are
    /// never inspected, only the keys matter.
    pub peer_dependencies: IndexMap<String, String>,
}

impl PackageDescriptor {
    /// Reads and parses `<dir>/package.json`. A missing or unparsable file yields `None`, which
    /// callers treat as "no peers declared" rather than an error.
    pub fn load(dir: &Path) -> Option<PackageDescriptor> {
        let path = dir.join(PACKAGE_METADATA_FILENAME);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(descriptor) => Some(descriptor),
            Err(error) => {
                log::debug!("ignoring unparsable {}: {}", path.display(), error);
                None
            }
        }
    }

    /// The declared peer name which `specifier` imports, if any: either the specifier is the name
    /// itself or a `name/sub/path` import of it. When several declared names match (e.g. peers
    /// `a` and `a/b` against specifier `a/b/c`), the longest one wins.
    pub fn matching_peer(&self, specifier: &str) -> Option<&str> {
        self.peer_dependencies.keys()
            .filter(|name| specifier_imports(specifier, name))
            .max_by_key(|name| name.len())
            .map(String::as_str)
    }

    /// Name to show in diagnostics
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed package>")
    }
}

/// Whether `specifier` is `package_name` exactly, or a sub-path import `package_name/...`.
/// A longer package name that merely shares a prefix (`react` vs `react-dom`) doesn't match.
fn specifier_imports(specifier: &str, package_name: &str) -> bool {
    match specifier.strip_prefix(package_name) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::PackageDescriptor;

    #[test]
    fn parses_relevant_fields_and_defaults_the_rest() {
        let descriptor: PackageDescriptor = serde_json::from_str(r#"{
            "name": "libX",
            "version": "1.2.3",
            "main": "lib/entry.js",
            "dependencies": {"lodash": "^4"},
            "peerDependencies": {"react": "^18", "react-dom": "^18"}
        }"#).unwrap();
        assert_eq!(descriptor.name.as_deref(), Some("libX"));
        assert_eq!(descriptor.main.as_deref(), Some("lib/entry.js"));
        assert_eq!(
            descriptor.peer_dependencies.keys().collect::<Vec<_>>(),
            vec!["react", "react-dom"]
        );
    }

    #[test]
    fn absent_fields_default_empty() {
        let descriptor: PackageDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(descriptor.name, None);
        assert!(descriptor.peer_dependencies.is_empty());
        assert_eq!(descriptor.display_name(), "<unnamed package>");
    }

    #[test]
    fn exact_and_subpath_match_but_not_shared_prefix() {
        let descriptor: PackageDescriptor = serde_json::from_str(r#"{
            "peerDependencies": {"react": "^18"}
        }"#).unwrap();
        assert_eq!(descriptor.matching_peer("react"), Some("react"));
        assert_eq!(descriptor.matching_peer("react/jsx-runtime"), Some("react"));
        assert_eq!(descriptor.matching_peer("react-dom"), None);
        assert_eq!(descriptor.matching_peer("./react"), None);
        assert_eq!(descriptor.matching_peer("preact"), None);
    }

    #[test]
    fn longest_declared_name_wins() {
        let descriptor: PackageDescriptor = serde_json::from_str(r#"{
            "peerDependencies": {"a": "*", "a/b": "*"}
        }"#).unwrap();
        assert_eq!(descriptor.matching_peer("a/b/c"), Some("a/b"));
        assert_eq!(descriptor.matching_peer("a/x"), Some("a"));
        assert_eq!(descriptor.matching_peer("a"), Some("a"));
    }

    #[test]
    fn load_missing_or_malformed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PackageDescriptor::load(dir.path()).is_none());

        fs::write(dir.path().join("package.json"), "not json {").unwrap();
        assert!(PackageDescriptor::load(dir.path()).is_none());

        fs::write(dir.path().join("package.json"), r#"{"name": "ok"}"#).unwrap();
        assert_eq!(PackageDescriptor::load(dir.path()).unwrap().name.as_deref(), Some("ok"));
    }
}
