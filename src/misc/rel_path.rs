use std::path::{Component, Path, PathBuf};

/// Relative path which navigates from `base` (a directory) to `target`.
///
/// Both paths must be absolute, or must both be relative to the same directory.
/// Returns an empty path when `base == target`. Symlinks are not consulted, so
/// callers should canonicalize first if `..` segments must be literally walkable.
pub fn relative_from(base: &Path, target: &Path) -> PathBuf {
    let mut base_components = base.components().peekable();
    let mut target_components = target.components().peekable();
    while let (Some(b), Some(t)) = (base_components.peek(), target_components.peek()) {
        if b != t {
            break
        }
        base_components.next();
        target_components.next();
    }

    let mut relative = PathBuf::new();
    for component in base_components {
        match component {
            Component::CurDir => {},
            _ => relative.push("..")
        }
    }
    for component in target_components {
        relative.push(component.as_os_str());
    }
    relative
}

/// Renders a relative path as a module specifier: `/`-separated regardless of platform.
pub fn as_specifier(path: &Path) -> String {
    let segments = path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>();
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{as_specifier, relative_from};

    #[test]
    fn sibling_directories() {
        assert_eq!(
            relative_from(Path::new("/repo/node_modules/libX"), Path::new("/repo")),
            PathBuf::from("../..")
        );
    }

    #[test]
    fn descends_after_ascending() {
        let relative = relative_from(
            Path::new("/repo/node_modules/libX"),
            Path::new("/repo/node_modules/react/index.js")
        );
        assert_eq!(relative, PathBuf::from("../react/index.js"));
    }

    #[test]
    fn equal_paths_are_empty() {
        assert_eq!(relative_from(Path::new("/repo"), Path::new("/repo")), PathBuf::new());
    }

    #[test]
    fn target_below_base() {
        assert_eq!(
            relative_from(Path::new("/repo"), Path::new("/repo/src/index.js")),
            PathBuf::from("src/index.js")
        );
    }

    #[test]
    fn specifier_uses_forward_slashes() {
        let path = PathBuf::from("..").join("..").join("node_modules").join("react").join("index.js");
        assert_eq!(as_specifier(&path), "../../node_modules/react/index.js");
    }
}
