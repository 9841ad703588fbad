use std::process::exit;

use thiserror::Error;

/// Warning/error tallies for one run, folded into an exit code
#[derive(Debug, Default)]
pub struct Output {
    pub num_warnings: usize,
    pub num_errors: usize
}

/// Errors which abort the run before (or without) processing any file. Per-file failures are
/// diagnostics instead and never become one of these.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("When {action}: {source}")]
    IoError { action: String, #[source] source: std::io::Error },
    #[error("When traversing {path_desc}: {source}")]
    WalkDirError { path_desc: String, #[source] source: walkdir::Error }
}

impl Output {
    /// Print a summary and return the process exit code
    pub fn report(self) -> i32 {
        let Output { num_warnings, num_errors } = self;
        if num_errors > 0 {
            if num_warnings > 0 {
                eprintln!("Failed with {} errors, {} warnings", num_errors, num_warnings);
            } else {
                eprintln!("Failed with {} errors", num_errors);
            }
            1
        } else if num_warnings > 0 {
            eprintln!("Succeeded but with {} warnings", num_warnings);
            0
        } else {
            0
        }
    }
}

impl FatalError {
    pub fn exit(self) -> ! {
        eprintln!("Fatal error: {}", self);
        exit(2)
    }
}
