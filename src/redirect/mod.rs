use std::path::Path;

use crate::diagnostics::FileLogger;
use crate::misc::rel_path::{as_specifier, relative_from};
use crate::{info, warning};

/// Package metadata (`package.json`) reduced to the fields the transform reads
pub mod package_json;
/// The module-resolution seam and its Node-style implementation
pub mod resolver;

pub use package_json::{PackageDescriptor, PACKAGE_METADATA_FILENAME};
pub use resolver::{ModuleResolver, NodeResolver};

/// Immutable context for one transformation pass over one source unit.
///
/// The project root is fixed when the pass is configured; it is never re-read from ambient
/// process state during traversal.
#[derive(Clone, Copy)]
pub struct RedirectCtx<'a> {
    /// Directory of the library/package whose source is currently being transformed
    pub plugin_root: &'a Path,
    /// Directory the overall build was invoked from
    pub project_root: &'a Path,
    /// Locates installed packages under the project root
    pub resolver: &'a dyn ModuleResolver,
}

/// Redirects `specifier` to the project's copy when the plugin declares it as a peer dependency.
///
/// Returns `Some(new_specifier)` when the import should be rewritten and `None` when it should be
/// left alone; writing the new value back into the tree is the caller's job. Pure apart from
/// diagnostics and the read of the plugin root's package metadata.
///
/// A redirected specifier is the relative path from the plugin root to the project root, joined
/// with the relative path from the project root to the resolved file. A peer that is declared but
/// not installed in the project logs a warning and fails open: the import keeps pointing at the
/// plugin's own copy.
pub fn redirect(ctx: RedirectCtx<'_>, specifier: &str, e: &FileLogger<'_>) -> Option<String> {
    // Source already rooted at the project never needs redirection
    if ctx.plugin_root == ctx.project_root {
        return None;
    }
    let descriptor = PackageDescriptor::load(ctx.plugin_root)?;
    let peer = descriptor.matching_peer(specifier)?;
    let Some(resolved) = ctx.resolver.resolve(ctx.project_root, specifier) else {
        warning!(
            e,
            "peer dependency '{}' was not found in the main package, '{}' will not be redirected",
            peer, specifier
        );
        return None;
    };

    let relative_root = relative_from(ctx.plugin_root, ctx.project_root);
    let relative_resolved = relative_from(ctx.project_root, &resolved);
    let new_specifier = as_specifier(&relative_root.join(relative_resolved));
    info!(
        e,
        "'{}' is declared as a peer dependency of {}, redirecting it to '{}' so it resolves to the project's copy",
        specifier, descriptor.display_name(), new_specifier
    );
    Some(new_specifier)
}
