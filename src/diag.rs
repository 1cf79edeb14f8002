//! Diagnostic model for inspection findings.
//!
//! Findings are not tied to source text, so diagnostics point at field
//! coordinates instead of spans. They convert to `miette` reports for
//! rendering by the embedding application.

use crate::schema::FieldCoordinates;
use miette::{Diagnostic, Report, Severity};
use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagSeverity {
    /// A mismatch that makes the schema unsatisfiable as wired.
    Error,
    /// Something the inspection could not verify.
    Warning,
}

impl fmt::Display for DiagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagSeverity::Error => write!(f, "error"),
            DiagSeverity::Warning => write!(f, "warning"),
        }
    }
}

impl From<DiagSeverity> for Severity {
    fn from(severity: DiagSeverity) -> Self {
        match severity {
            DiagSeverity::Error => Severity::Error,
            DiagSeverity::Warning => Severity::Warning,
        }
    }
}

/// A structured diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The severity level of this diagnostic.
    pub severity: DiagSeverity,
    /// The main diagnostic message.
    pub message: String,
    /// The schema field this diagnostic is about, if any.
    pub coordinates: Option<FieldCoordinates>,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Optional diagnostic code (e.g., "schema_inspection::unmapped_field").
    pub code: Option<String>,
}

impl Diag {
    /// Creates a new diagnostic with the given severity and message.
    pub fn new(severity: DiagSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            coordinates: None,
            help: None,
            notes: Vec::new(),
            code: None,
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Error, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Warning, message)
    }

    /// Sets the field coordinates.
    pub fn with_coordinates(mut self, coordinates: FieldCoordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns true for error severity.
    pub fn is_error(&self) -> bool {
        self.severity == DiagSeverity::Error
    }
}

/// Converts diagnostics to miette Reports.
pub fn convert_diagnostics_to_reports(diagnostics: &[Diag]) -> Vec<Report> {
    diagnostics.iter().map(convert_diag_to_report).collect()
}

/// Converts a single diagnostic to a miette Report.
pub fn convert_diag_to_report(diag: &Diag) -> Report {
    Report::new(build_diagnostic(diag))
}

/// Folds diagnostics into one report with each diagnostic as a related entry.
pub fn aggregate_report(message: impl Into<String>, diagnostics: &[Diag]) -> Report {
    let severity = if diagnostics.iter().any(Diag::is_error) {
        Severity::Error
    } else {
        Severity::Warning
    };
    Report::new(BuiltDiagnostic {
        message: message.into(),
        severity,
        code: None,
        help: None,
        related: diagnostics
            .iter()
            .map(|diag| Box::new(build_diagnostic(diag)) as Box<dyn Diagnostic + Send + Sync>)
            .collect(),
    })
}

fn build_diagnostic(diag: &Diag) -> BuiltDiagnostic {
    let message = match &diag.coordinates {
        Some(coordinates) => format!("{}: {}", coordinates, diag.message),
        None => diag.message.clone(),
    };
    BuiltDiagnostic {
        message,
        severity: diag.severity.into(),
        code: diag.code.clone(),
        help: diag.help.clone(),
        related: diag
            .notes
            .iter()
            .cloned()
            .map(|note| Box::new(NoteDiagnostic::new(note)) as Box<dyn Diagnostic + Send + Sync>)
            .collect(),
    }
}

/// The final diagnostic type that implements miette's Diagnostic trait.
#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    severity: Severity,
    code: Option<String>,
    help: Option<String>,
    related: Vec<Box<dyn Diagnostic + Send + Sync>>,
}

#[derive(Debug)]
struct NoteDiagnostic {
    message: String,
}

impl NoteDiagnostic {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for NoteDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}
impl std::error::Error for NoteDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            None
        } else {
            Some(Box::new(
                self.related.iter().map(|diag| diag.as_ref() as &dyn Diagnostic),
            ))
        }
    }
}

impl Diagnostic for NoteDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}
