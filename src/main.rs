#![doc = include_str!("../README.md")]

/// Typed AST and wrapper for tree-sitter
pub mod ast;
/// Batch driver which walks input paths and applies the rewrite pass
pub mod compiler;
/// Diagnostics (errors/warnings/etc) and logging
pub mod diagnostics;
/// Utilities which could go in any crate
pub mod misc;
/// Peer-dependency redirection: package metadata, module resolution, and the transform rule
pub mod redirect;
/// The per-file rewrite pass: find import sites, redirect, splice
pub mod rewrite;

use std::path::PathBuf;

use clap::Parser;

use crate::compiler::Rewriter;

/// Rewrites peer-dependency imports in vendored JavaScript/TypeScript sources so they resolve to
/// the host project's installed copy.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Source files or directories to rewrite
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Project root whose installed packages peer imports are redirected to.
    /// Defaults to the current directory
    #[arg(long)]
    project_root: Option<PathBuf>,
    /// Rewrite changed files in place instead of printing rewritten sources to stdout
    #[arg(short, long)]
    in_place: bool,
}

/// Run the program
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    Rewriter::run(args.paths, args.project_root, args.in_place)
}
