//! Line-tagged diagnostics, per-unit verdicts, and the error types the CLI
//! surfaces for I/O failures.
//!
//! The recognizer itself never errors in the `Result` sense: every failure
//! path inside it terminates in a list of [`Diagnostic`] values. The types
//! here are the boundary between that list and the outside world.

use std::fmt;
use std::path::PathBuf;

use miette::{LabeledSpan, NamedSource, SourceCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single finding against one program unit: the line it was detected on
/// and a human-readable description.
///
/// Diagnostics are created during one parse, returned to the caller, and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number at which the problem was detected.
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// The outcome of validating one program unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid { diagnostics: Vec<Diagnostic> },
}

impl Verdict {
    /// An empty diagnostic list is the definition of a valid program.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            Verdict::Valid
        } else {
            Verdict::Invalid { diagnostics }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// I/O-level failures from the CLI pipeline: reading unit files, walking
/// directories, writing the aggregated report.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum HornlintError {
    #[error("failed to read program unit {path}")]
    #[diagnostic(code(hornlint::io::read))]
    ReadUnit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan {path} for program units")]
    #[diagnostic(code(hornlint::io::scan))]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write report to {path}")]
    #[diagnostic(code(hornlint::io::write))]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report as JSON")]
    #[diagnostic(code(hornlint::json))]
    Serialize(#[from] serde_json::Error),
}

/// One diagnostic rendered against the text of its unit, with the offending
/// line highlighted.
#[derive(Debug)]
pub struct SourceReport {
    message: String,
    line: usize,
    source: NamedSource<String>,
    span: Option<(usize, usize)>,
}

impl SourceReport {
    pub fn new(unit: &str, text: &str, diagnostic: &Diagnostic) -> Self {
        Self {
            message: diagnostic.message.clone(),
            line: diagnostic.line,
            source: NamedSource::new(unit, text.to_string()),
            span: line_span(text, diagnostic.line),
        }
    }
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for SourceReport {}

impl miette::Diagnostic for SourceReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("hornlint::syntax"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.span.map(|(offset, len)| {
            Box::new(std::iter::once(LabeledSpan::new(
                Some(self.message.clone()),
                offset,
                len,
            ))) as Box<dyn Iterator<Item = LabeledSpan>>
        })
    }
}

/// Byte range of the given 1-based line, excluding its newline.
fn line_span(text: &str, line: usize) -> Option<(usize, usize)> {
    let mut offset = 0;
    for (index, content) in text.split('\n').enumerate() {
        if index + 1 == line {
            return Some((offset, content.len()));
        }
        offset += content.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_is_line_tagged() {
        let diagnostic = Diagnostic::new(3, "expected '.' to terminate the clause");
        assert_eq!(
            diagnostic.to_string(),
            "Line 3: expected '.' to terminate the clause"
        );
    }

    #[test]
    fn line_span_finds_interior_lines() {
        let text = "first\nsecond\nthird";
        assert_eq!(line_span(text, 1), Some((0, 5)));
        assert_eq!(line_span(text, 2), Some((6, 6)));
        assert_eq!(line_span(text, 3), Some((13, 5)));
        assert_eq!(line_span(text, 4), None);
    }
}
