//! Report sinks: every way a verdict leaves the process.
//!
//! A verdict can end up in the aggregated batch file, on a color-capable
//! terminal, or in a JSON array. All three renderings live here so the
//! "valid program" marker and the diagnostic line format cannot drift
//! apart between commands.

use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::{SourceReport, Verdict};
use crate::discovery::ProgramUnit;

/// Marker reported for a unit with no diagnostics.
pub const VALID_MARKER: &str = "valid program";

/// Accepts per-unit verdicts and renders them somewhere.
pub trait ReportSink {
    fn report(&mut self, unit: &ProgramUnit, verdict: &Verdict);
}

/// Collects reports into the aggregated batch format: each unit's
/// identifier on its own line followed by the marker or its diagnostic
/// lines, entries joined by newlines.
#[derive(Debug, Default)]
pub struct AggregateBuffer {
    buffer: String,
}

impl AggregateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl ReportSink for AggregateBuffer {
    fn report(&mut self, unit: &ProgramUnit, verdict: &Verdict) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(&unit.id);
        self.buffer.push_str(":\n");
        match verdict {
            Verdict::Valid => self.buffer.push_str(VALID_MARKER),
            Verdict::Invalid { diagnostics } => {
                let lines: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
                self.buffer.push_str(&lines.join("\n"));
            }
        }
    }
}

/// Writes colored per-unit reports to stdout. Falls back to plain text when
/// stdout is not a terminal or when asked to.
pub struct ConsoleSink {
    stream: StandardStream,
    snippets: bool,
}

impl ConsoleSink {
    pub fn new(plain: bool) -> Self {
        let choice = if plain || !atty::is(atty::Stream::Stdout) {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Self {
            stream: StandardStream::stdout(choice),
            snippets: !plain,
        }
    }
}

impl ReportSink for ConsoleSink {
    fn report(&mut self, unit: &ProgramUnit, verdict: &Verdict) {
        match verdict {
            Verdict::Valid => {
                let _ = self
                    .stream
                    .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
                let _ = writeln!(self.stream, "{}: {VALID_MARKER}", unit.id);
                let _ = self.stream.reset();
            }
            Verdict::Invalid { diagnostics } => {
                let _ = self
                    .stream
                    .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
                let _ = writeln!(self.stream, "{}:", unit.id);
                let _ = self.stream.reset();
                for diagnostic in diagnostics {
                    if self.snippets {
                        let report =
                            miette::Report::new(SourceReport::new(&unit.id, &unit.text, diagnostic));
                        let _ = writeln!(self.stream, "{report:?}");
                    } else {
                        let _ = writeln!(self.stream, "{diagnostic}");
                    }
                }
            }
        }
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    unit: &'a str,
    #[serde(flatten)]
    verdict: &'a Verdict,
}

/// Prints one JSON array with a record per unit.
pub fn print_json(results: &[(ProgramUnit, Verdict)]) -> serde_json::Result<()> {
    let records: Vec<JsonRecord<'_>> = results
        .iter()
        .map(|(unit, verdict)| JsonRecord {
            unit: &unit.id,
            verdict,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
