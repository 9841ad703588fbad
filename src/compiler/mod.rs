use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use walkdir::WalkDir;

use crate::ast::Dialect;
use crate::compiler::output::{FatalError, Output};
use crate::diagnostics::{Diagnostics, ProjectLogger};
use crate::error;
use crate::redirect::{NodeResolver, RedirectCtx, PACKAGE_METADATA_FILENAME};
use crate::rewrite::rewrite_file;

/// Output tallies and the fatal error type
pub mod output;

/// Batch driver: collects source files from the CLI paths and runs the rewrite pass on each.
///
/// Every file is processed independently; a failure rewriting one file is recorded as an error
/// diagnostic and the run moves on.
pub struct Rewriter {
    /// Canonicalized directory whose installed packages peer imports are redirected to
    project_root: PathBuf,
    resolver: NodeResolver,
    /// Rewrite changed files in place instead of printing rewritten sources to stdout
    in_place: bool,
    diagnostics: Diagnostics,
}

impl Rewriter {
    /// Rewrite everything under `paths` and exit with a code summarizing the run
    pub fn run(paths: Vec<PathBuf>, project_root: Option<PathBuf>, in_place: bool) -> ! {
        let rewriter = Self::try_new(project_root, in_place).unwrap_or_else(|error| error.exit());
        let output = rewriter.run_batch(&paths).unwrap_or_else(|error| error.exit());
        exit(output.report())
    }

    /// `project_root` defaults to the current directory; it is captured and canonicalized here,
    /// once, and never re-read for the rest of the run.
    pub fn try_new(project_root: Option<PathBuf>, in_place: bool) -> Result<Self, FatalError> {
        let project_root = match project_root {
            Some(root) => root,
            None => std::env::current_dir().map_err(|source| FatalError::IoError {
                action: "reading the current directory".to_string(),
                source
            })?,
        };
        let project_root = fs::canonicalize(&project_root).map_err(|source| FatalError::IoError {
            action: format!("canonicalizing project root {}", project_root.display()),
            source
        })?;
        Ok(Self {
            project_root,
            resolver: NodeResolver,
            in_place,
            diagnostics: Diagnostics::new(true)
        })
    }

    /// Process every source file under `paths` and tally the results
    pub fn run_batch(&self, paths: &[PathBuf]) -> Result<Output, FatalError> {
        for file in collect_source_files(paths)? {
            self.rewrite_one(&file);
        }
        Ok(Output {
            num_warnings: self.diagnostics.count_warnings(),
            num_errors: self.diagnostics.count_errors(),
        })
    }

    fn rewrite_one(&self, path: &Path) {
        let e = ProjectLogger::new(&self.diagnostics).file(path);
        let plugin_root = self.plugin_root_of(path);
        let ctx = RedirectCtx {
            plugin_root: &plugin_root,
            project_root: &self.project_root,
            resolver: &self.resolver,
        };
        match rewrite_file(path, ctx, &e) {
            Ok(rewritten) => {
                if self.in_place {
                    if rewritten.num_redirects > 0 {
                        if let Err(error) = fs::write(path, &rewritten.text) {
                            error!(e, "failed to write rewritten file: {}", error);
                        }
                    }
                } else {
                    print!("{}", rewritten.text);
                }
            }
            Err(error) => error!(e, "failed to rewrite: {}", error),
        }
    }

    /// Nearest ancestor directory of `path` containing a `package.json`, clamped at the project
    /// root. Files directly under the project, outside it, or with no package metadata above
    /// them belong to the project root itself (and are therefore never redirected).
    fn plugin_root_of(&self, path: &Path) -> PathBuf {
        let mut dir = path.parent();
        while let Some(ancestor) = dir {
            if !ancestor.starts_with(&self.project_root) || ancestor == self.project_root {
                break;
            }
            if ancestor.join(PACKAGE_METADATA_FILENAME).is_file() {
                return ancestor.to_path_buf();
            }
            dir = ancestor.parent();
        }
        self.project_root.clone()
    }
}

/// Files to rewrite: the given files, plus every known-extension file under the given directories
fn collect_source_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, FatalError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|source| FatalError::WalkDirError {
                    path_desc: path.display().to_string(),
                    source
                })?;
                if entry.file_type().is_file() && Dialect::of_path(entry.path()).is_some() {
                    files.push(canonicalized(entry.path())?);
                }
            }
        } else {
            files.push(canonicalized(path)?);
        }
    }
    Ok(files)
}

fn canonicalized(path: &Path) -> Result<PathBuf, FatalError> {
    fs::canonicalize(path).map_err(|source| FatalError::IoError {
        action: format!("canonicalizing input path {}", path.display()),
        source
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::Rewriter;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn plugin_root_is_nearest_package_json_clamped_at_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        write(&root.join("packages/ui/package.json"), "{}");
        fs::create_dir_all(root.join("packages/ui/src")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        write(&root.join("package.json"), "{}");

        let rewriter = Rewriter::try_new(Some(root.clone()), false).unwrap();
        assert_eq!(
            rewriter.plugin_root_of(&root.join("packages/ui/src/a.js")),
            root.join("packages/ui")
        );
        assert_eq!(rewriter.plugin_root_of(&root.join("src/b.js")), root);
        assert_eq!(rewriter.plugin_root_of(&root.join("c.js")), root);
        assert_eq!(rewriter.plugin_root_of(Path::new("/elsewhere/d.js")), root);
    }

    #[test_log::test]
    fn run_batch_rewrites_vendored_sources_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        write(&root.join("node_modules/react/index.js"), "module.exports = {};\n");
        write(
            &root.join("node_modules/libX/package.json"),
            r#"{"name": "libX", "peerDependencies": {"react": "^18"}}"#
        );
        write(&root.join("node_modules/libX/index.js"), "import React from 'react';\n");
        write(&root.join("app.js"), "import React from 'react';\n");

        let rewriter = Rewriter::try_new(Some(root.clone()), true).unwrap();
        let output = rewriter.run_batch(&[root.clone()]).unwrap();
        assert_eq!(output.num_errors, 0);
        assert_eq!(output.num_warnings, 0);

        assert_eq!(
            fs::read_to_string(root.join("node_modules/libX/index.js")).unwrap(),
            "import React from '../../node_modules/react/index.js';\n"
        );
        // Co-located source is left alone
        assert_eq!(
            fs::read_to_string(root.join("app.js")).unwrap(),
            "import React from 'react';\n"
        );
    }

    #[test]
    fn declared_but_missing_peer_warns_and_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        write(
            &root.join("node_modules/libX/package.json"),
            r#"{"name": "libX", "peerDependencies": {"react": "^18"}}"#
        );
        write(&root.join("node_modules/libX/index.js"), "import React from 'react';\n");

        let rewriter = Rewriter::try_new(Some(root.clone()), true).unwrap();
        let output = rewriter.run_batch(&[root.join("node_modules/libX")]).unwrap();
        assert_eq!(output.num_warnings, 1);
        assert_eq!(output.num_errors, 0);
        assert_eq!(
            fs::read_to_string(root.join("node_modules/libX/index.js")).unwrap(),
            "import React from 'react';\n"
        );
    }
}
