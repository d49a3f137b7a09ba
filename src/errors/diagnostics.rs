use std::fmt::Display;

use tracing::{debug, error, info, warn};

use crate::errors::errors::{Error, ErrorImpl};
use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "Info"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: Error,
}

/// Receives the recoverable problems found by the checker and the encoder.
///
/// Neither pass aborts on a semantic or code generation problem; they report
/// here and carry on with a neutral value.
pub trait DiagnosticSink {
    fn report(&mut self, severity: Severity, error: Error);

    fn error(&mut self, kind: ErrorImpl, position: Position) {
        self.report(Severity::Error, Error::new(kind, position));
    }

    fn warning(&mut self, kind: ErrorImpl, position: Position) {
        self.report(Severity::Warning, Error::new(kind, position));
    }

    fn info(&mut self, kind: ErrorImpl, position: Position) {
        self.report(Severity::Info, Error::new(kind, position));
    }
}

/// Default sink: keeps every report in order and mirrors it to `tracing`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Error> {
        self.with_severity(Severity::Warning)
    }

    /// Number of warnings and errors. Info entries are not problems.
    pub fn problem_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity >= Severity::Warning)
            .count()
    }

    /// A compilation that reported any warning or error is considered failed.
    pub fn is_failed(&self) -> bool {
        self.problem_count() > 0
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Error> {
        self.entries
            .iter()
            .filter(move |diagnostic| diagnostic.severity == severity)
            .map(|diagnostic| &diagnostic.error)
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, severity: Severity, err: Error) {
        let kind = err.get_error_name();
        let position = err.get_position().0;
        let file = err.get_position().1.as_str();

        match severity {
            Severity::Info => info!(kind, position, file, "{}", err.kind()),
            Severity::Warning => warn!(kind, position, file, "{}", err.kind()),
            Severity::Error => error!(kind, position, file, "{}", err.kind()),
        }

        self.entries.push(Diagnostic {
            severity,
            error: err,
        });
        debug!(total = self.entries.len(), "diagnostic recorded");
    }
}
