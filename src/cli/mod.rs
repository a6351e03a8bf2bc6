//! Command dispatch for the binary.
//!
//! Each subcommand follows the same shape: gather program units, run the
//! recognizer over each, hand the verdicts to a report sink. Failures that
//! reach this level are I/O problems; invalid programs are ordinary data
//! and only influence the exit code.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::Parser;

use crate::cli::args::{Command, HornlintArgs};
use crate::cli::output::{AggregateBuffer, ConsoleSink, ReportSink};
use crate::diagnostics::{HornlintError, Verdict};
use crate::discovery::{self, ProgramUnit};
use crate::syntax;

pub mod args;
pub mod output;

/// Parses the command line, runs the chosen subcommand, and exits with its
/// code. Never returns.
pub fn run() {
    let args = HornlintArgs::parse();

    let result = match args.command {
        Command::Check { paths, json, plain } => handle_check(&paths, json, plain),
        Command::Batch { dir, output } => handle_batch(&dir, &output),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            process::exit(2);
        }
    }
}

/// Handles the `check` subcommand. Exits 0 when every unit is valid and 1
/// otherwise; I/O failures bubble up as errors.
fn handle_check(paths: &[PathBuf], json: bool, plain: bool) -> Result<i32, HornlintError> {
    let units = discovery::collect_units(paths)?;
    let results: Vec<(ProgramUnit, Verdict)> = units
        .into_iter()
        .map(|unit| {
            let verdict = syntax::verify(&unit.text);
            (unit, verdict)
        })
        .collect();

    let all_valid = results.iter().all(|(_, verdict)| verdict.is_valid());

    if json {
        output::print_json(&results)?;
    } else {
        let mut sink = ConsoleSink::new(plain);
        for (unit, verdict) in &results {
            sink.report(unit, verdict);
        }
    }

    Ok(if all_valid { 0 } else { 1 })
}

/// Handles the `batch` subcommand: the numbered-unit pipeline with one
/// aggregated report. Unit invalidity is data in the report, not a process
/// failure.
fn handle_batch(dir: &Path, output_path: &Path) -> Result<i32, HornlintError> {
    let units = discovery::numbered_units(dir)?;

    let mut sink = AggregateBuffer::new();
    for unit in &units {
        let verdict = syntax::verify(&unit.text);
        sink.report(unit, &verdict);
    }

    fs::write(output_path, sink.into_string()).map_err(|error| HornlintError::WriteReport {
        path: output_path.to_path_buf(),
        source: error,
    })?;
    Ok(0)
}
