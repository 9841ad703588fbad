use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::redirect::package_json::PackageDescriptor;

/// Locates the file a module specifier resolves to, starting from a directory.
///
/// Resolution is always "silent": a specifier that cannot be located yields `None`, never an
/// error. The trait is a seam so the transform can be tested without a real package tree.
pub trait ModuleResolver {
    fn resolve(&self, from_dir: &Path, specifier: &str) -> Option<PathBuf>;
}

/// Node-style resolver: relative specifiers are joined against the starting directory, bare
/// specifiers walk the starting directory's ancestors looking in `node_modules`. Candidate files
/// are probed as-is, then with `.js`/`.json` appended, then as a directory with `index.js`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeResolver;

impl ModuleResolver for NodeResolver {
    fn resolve(&self, from_dir: &Path, specifier: &str) -> Option<PathBuf> {
        if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/') {
            return probe(&from_dir.join(specifier));
        }
        let (package_name, sub_path) = split_bare_specifier(specifier)?;
        let mut dir = Some(from_dir);
        while let Some(ancestor) = dir {
            let package_dir = ancestor.join("node_modules").join(package_name);
            if package_dir.is_dir() {
                if let Some(resolved) = resolve_in_package(&package_dir, sub_path) {
                    return Some(resolved);
                }
            }
            dir = ancestor.parent();
        }
        None
    }
}

/// Splits a bare specifier into package name and optional sub-path. Scoped packages keep their
/// first two segments (`@scope/name/sub` -> `@scope/name` + `sub`).
fn split_bare_specifier(specifier: &str) -> Option<(&str, Option<&str>)> {
    if specifier.is_empty() {
        return None;
    }
    let name_segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut split_at = specifier.len();
    let mut seen = 0;
    for (i, byte) in specifier.bytes().enumerate() {
        if byte == b'/' {
            seen += 1;
            if seen == name_segments {
                split_at = i;
                break;
            }
        }
    }
    let (package_name, rest) = specifier.split_at(split_at);
    if package_name.is_empty() {
        return None;
    }
    Some((package_name, rest.strip_prefix('/').filter(|rest| !rest.is_empty())))
}

fn resolve_in_package(package_dir: &Path, sub_path: Option<&str>) -> Option<PathBuf> {
    match sub_path {
        Some(sub_path) => probe(&package_dir.join(sub_path)),
        None => {
            let main = PackageDescriptor::load(package_dir).and_then(|descriptor| descriptor.main);
            match main {
                Some(main) => probe(&package_dir.join(main)),
                None => probe(&package_dir.join("index.js")),
            }
        }
    }
}

fn probe(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    for extension in ["js", "json"] {
        let mut with_extension = OsString::from(base.as_os_str());
        with_extension.push(".");
        with_extension.push(extension);
        let candidate = PathBuf::from(with_extension);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    let index = base.join("index.js");
    if index.is_file() {
        return Some(index);
    }
    None
}
