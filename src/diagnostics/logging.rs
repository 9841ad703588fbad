use std::path::Path;

use crate::ast::tree_sitter::TSPoint;
use crate::diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticLoc, Diagnostics};

/// Allows you to log run-wide diagnostics.
///
/// Methods which can log diagnostics take this (or [FileLogger]) as a parameter named `e`.
/// They should not take [Diagnostics] directly in order to separate logging from counting and
/// printing.
#[derive(Debug, Clone, Copy)]
pub struct ProjectLogger<'a>(&'a Diagnostics);

/// Allows you to log diagnostics tied to one source file, optionally at a position within it.
#[derive(Debug, Clone)]
pub struct FileLogger<'a> {
    diagnostics: &'a Diagnostics,
    path: &'a Path,
    point: Option<TSPoint>,
}

impl<'a> ProjectLogger<'a> {
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self(diagnostics)
    }

    pub fn file(&self, path: &'a Path) -> FileLogger<'a> {
        FileLogger { diagnostics: self.0, path, point: None }
    }

    pub fn log(&self, level: DiagnosticLevel, message: String) {
        self.0.insert(Diagnostic { level, message, loc: None })
    }
}

impl<'a> FileLogger<'a> {
    pub fn new(diagnostics: &'a Diagnostics, path: &'a Path) -> Self {
        Self { diagnostics, path, point: None }
    }

    /// Same file, diagnostics additionally carry `point` as their position
    pub fn at(&self, point: TSPoint) -> FileLogger<'a> {
        FileLogger { diagnostics: self.diagnostics, path: self.path, point: Some(point) }
    }

    pub fn log(&self, level: DiagnosticLevel, message: String) {
        self.diagnostics.insert(Diagnostic {
            level,
            message,
            loc: Some(DiagnosticLoc { path: self.path.to_path_buf(), point: self.point }),
        })
    }
}

#[macro_export]
macro_rules! log_diagnostic {
    ($e:expr, $level:expr, $format:literal $(, $arg:expr)* $(,)?) => {
        $e.log($level, format!($format $(, $arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($e:expr, $( $arg:tt )*) => {
        $crate::log_diagnostic!($e, $crate::diagnostics::DiagnosticLevel::Error, $( $arg )*)
    };
}

#[macro_export]
macro_rules! warning {
    ($e:expr, $( $arg:tt )*) => {
        $crate::log_diagnostic!($e, $crate::diagnostics::DiagnosticLevel::Warning, $( $arg )*)
    };
}

#[macro_export]
macro_rules! info {
    ($e:expr, $( $arg:tt )*) => {
        $crate::log_diagnostic!($e, $crate::diagnostics::DiagnosticLevel::Info, $( $arg )*)
    };
}

#[macro_export]
macro_rules! debug {
    ($e:expr, $( $arg:tt )*) => {
        $crate::log_diagnostic!($e, $crate::diagnostics::DiagnosticLevel::Debug, $( $arg )*)
    };
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::diagnostics::{DiagnosticLevel, Diagnostics, ProjectLogger};
    use crate::{debug, error, info, warning};

    #[test_log::test]
    fn levels_are_counted() {
        let diagnostics = Diagnostics::new(true);
        let e = ProjectLogger::new(&diagnostics);
        error!(e, "boom");
        warning!(e, "hmm {}", 1);
        warning!(e, "hmm {}", 2);
        info!(e, "fyi");
        debug!(e, "nitty gritty");
        assert_eq!(diagnostics.count_errors(), 1);
        assert_eq!(diagnostics.count_warnings(), 2);
        assert_eq!(diagnostics.count_infos(), 1);
        assert_eq!(diagnostics.count_level(DiagnosticLevel::Debug), 1);
    }

    #[test]
    fn file_diagnostics_carry_their_path() {
        let diagnostics = Diagnostics::new(false);
        let e = ProjectLogger::new(&diagnostics);
        warning!(e.file(Path::new("lib/a.js")), "suspicious import");
        let rendered = diagnostics.to_string();
        assert!(rendered.contains("warning @ lib/a.js: suspicious import"), "got: {}", rendered);
    }
}
