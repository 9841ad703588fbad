use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::ast::tree_sitter::TSPoint;

/// All diagnostics recorded during one run.
///
/// Diagnostics are recorded instead of printed directly so the driver can count warnings and
/// errors for its exit code; with `print_immediately` they are also forwarded to the [log] facade
/// as they arrive.
#[derive(Debug)]
pub struct Diagnostics {
    /// If set, diagnostics are logged through the `log` crate immediately after being recorded
    print_immediately: bool,
    /// The diagnostics
    diagnostics: RefCell<Vec<Diagnostic>>,
}

/// A single diagnostic line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic level AKA error, warning, info, or debug
    pub level: DiagnosticLevel,
    /// Diagnostic message (formatted string)
    pub message: String,
    /// Source location, if the diagnostic is tied to a file
    pub loc: Option<DiagnosticLoc>,
}

/// File (and optionally position within the file) a diagnostic points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLoc {
    pub path: PathBuf,
    pub point: Option<TSPoint>,
}

/// Diagnostic level: how important is the diagnostic, and is it a bad thing or just a message?
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Diagnostic must be fixed, counts toward a failing exit code
    Error,
    /// Diagnostic should be looked at but doesn't fail the run
    Warning,
    /// Diagnostic doesn't have to be addressed, is shown to the user
    Info,
    /// Diagnostic doesn't have to be addressed and is only shown in debug mode
    Debug
}

impl Diagnostics {
    /// Create an instance with no diagnostics.
    pub fn new(print_immediately: bool) -> Self {
        Self {
            print_immediately,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record the given diagnostic
    pub fn insert(&self, diagnostic: Diagnostic) {
        if self.print_immediately {
            diagnostic.log_to_rust();
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Count how many diagnostics of a certain level were recorded
    pub fn count_level(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.borrow().iter().filter(|diagnostic| diagnostic.level == level).count()
    }

    /// Count how many "error" diagnostics were recorded
    pub fn count_errors(&self) -> usize {
        self.count_level(DiagnosticLevel::Error)
    }

    /// Count how many "warning" diagnostics were recorded
    pub fn count_warnings(&self) -> usize {
        self.count_level(DiagnosticLevel::Warning)
    }

    /// Count how many "info" diagnostics were recorded
    pub fn count_infos(&self) -> usize {
        self.count_level(DiagnosticLevel::Info)
    }

    /// Whether a recorded diagnostic's message contains `text` (test helper, but cheap enough to
    /// keep available)
    pub fn any_message_contains(&self, text: &str) -> bool {
        self.diagnostics.borrow().iter().any(|diagnostic| diagnostic.message.contains(text))
    }
}

impl Diagnostic {
    /// Print the diagnostic using the [log] crate.
    pub fn log_to_rust(&self) {
        log::log!(self.level.rust_log_level(), "{}", DisplayDiagnosticWithoutLevel(self));
    }
}

impl DiagnosticLevel {
    pub fn rust_log_level(&self) -> log::Level {
        match self {
            DiagnosticLevel::Error => log::Level::Error,
            DiagnosticLevel::Warning => log::Level::Warn,
            DiagnosticLevel::Info => log::Level::Info,
            DiagnosticLevel::Debug => log::Level::Debug
        }
    }
}

/// Display a diagnostic without its log level, since the `log` facade already prints one
struct DisplayDiagnosticWithoutLevel<'a>(&'a Diagnostic);

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for diagnostic in self.diagnostics.borrow().iter() {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level)?;
        if let Some(loc) = self.loc.as_ref() {
            write!(f, " @ {}", loc)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl<'a> Display for DisplayDiagnosticWithoutLevel<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = self.0.loc.as_ref() {
            write!(f, "@ {}: ", loc)?;
        }
        write!(f, "{}", self.0.message)
    }
}

impl Display for DiagnosticLoc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(point) = self.point.as_ref() {
            write!(f, ":{}:{}", point.row + 1, point.column + 1)?;
        }
        Ok(())
    }
}

impl Display for DiagnosticLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Debug => write!(f, "debug"),
        }
    }
}
