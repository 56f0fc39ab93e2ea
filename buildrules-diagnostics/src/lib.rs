// Diagnostics for descriptor errors
// Renders resolver failures as rustc-style messages with codes, notes and suggestions

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::path::Path;

pub mod fuzzy;

/// Where a diagnostic points: the manifest file and, when known, the descriptor in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
}

impl Location {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            descriptor: None,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.display().to_string())
    }

    pub fn unknown() -> Self {
        Self::new("<unknown>")
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.descriptor {
            Some(descriptor) => write!(f, "{} ({})", self.file, descriptor),
            None => write!(f, "{}", self.file),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Error,
    Warning,
    Note,
    Help,
}

impl ErrorLevel {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Error => "error",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Note => "note",
            ErrorLevel::Help => "help",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorLevel::Error => write!(f, "{}", "error".red().bold()),
            ErrorLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
            ErrorLevel::Note => write!(f, "{}", "note".cyan().bold()),
            ErrorLevel::Help => write!(f, "{}", "help".green().bold()),
        }
    }
}

/// Structured diagnostic message
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub level: ErrorLevel,
    pub code: String, // e.g., "E0391" for a dependency cycle
    pub message: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(level: ErrorLevel, code: &str, message: String, location: Location) -> Self {
        Self {
            level,
            code: code.to_string(),
            message,
            location,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn error(code: &str, message: String, location: Location) -> Self {
        Self::new(ErrorLevel::Error, code, message, location)
    }

    pub fn warning(code: &str, message: String, location: Location) -> Self {
        Self::new(ErrorLevel::Warning, code, message, location)
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Format diagnostic in rustc style
    pub fn format(&self) -> String {
        let mut output = String::new();

        // Header: error[E0391]: message
        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level,
            self.code,
            self.message.bold()
        ));

        // Location: --> buildrules.json (module `Game`)
        output.push_str(&format!(" {} {}\n", "-->".cyan().bold(), self.location));

        for note in &self.notes {
            output.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!(" {} {}\n", "help:".green().bold(), help));
        }

        output
    }

    /// Single-line form without colors, for logs
    fn format_plain(&self) -> String {
        format!(
            "{}[{}]: {} at {}",
            self.level.as_str(),
            self.code,
            self.message,
            self.location
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format_plain())
    }
}

#[derive(Serialize)]
struct DiagnosticReport<'a> {
    diagnostics: &'a [Diagnostic],
    errors: usize,
    warnings: usize,
}

/// Diagnostic collection and reporting engine
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            ErrorLevel::Error => self.error_count += 1,
            ErrorLevel::Warning => self.warning_count += 1,
            _ => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_all(&self) {
        for diag in &self.diagnostics {
            eprintln!("{}", diag.format());
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        if self.error_count > 0 {
            eprintln!(
                "{}: {} error{} emitted",
                "error".red().bold(),
                self.error_count,
                if self.error_count == 1 { "" } else { "s" }
            );
        }

        if self.warning_count > 0 {
            eprintln!(
                "{}: {} warning{} emitted",
                "warning".yellow().bold(),
                self.warning_count,
                if self.warning_count == 1 { "" } else { "s" }
            );
        }
    }

    /// Export diagnostics as JSON for editors and CI tooling
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&DiagnosticReport {
            diagnostics: &self.diagnostics,
            errors: self.error_count,
            warnings: self.warning_count,
        })
    }
}

/// Common error codes
pub mod error_codes {
    // Manifest errors
    pub const INVALID_MANIFEST: &str = "E0001";

    // Registry errors
    pub const DUPLICATE_DEFINITION: &str = "E0428";

    // Resolution errors
    pub const CIRCULAR_DEPENDENCY: &str = "E0391";
    pub const MODULE_NOT_FOUND: &str = "E0583";
    pub const TARGET_NOT_FOUND: &str = "E0584";

    // Warnings
    pub const UNREACHABLE_MODULE: &str = "W0001";
    pub const DUPLICATE_DEPENDENCY: &str = "W0002";
    pub const STALE_PLAN: &str = "W0003";
}
