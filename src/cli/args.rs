//! Argument surface of the binary, declared with clap's derive macros.
//!
//! Two subcommands cover the two ways units reach the validator: `check`
//! for explicit paths given on the command line, `batch` for the
//! numbered-file convention.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level argument structure; everything hangs off one subcommand.
#[derive(Debug, Parser)]
#[command(
    name = "hornlint",
    version,
    about = "A syntax validator for a small clause-based logic language."
)]
pub struct HornlintArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// What the binary can be asked to do.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate programs and report line-tagged diagnostics.
    Check {
        /// Files to validate; a directory is scanned for `.txt` programs.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Emit one JSON record per unit instead of text output.
        #[arg(long)]
        json: bool,
        /// Plain text output: no color, no source snippets.
        #[arg(long)]
        plain: bool,
    },
    /// Validate numbered units (1.txt, 2.txt, ...) and write one aggregated report.
    Batch {
        /// Directory containing the numbered unit files.
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Where to write the aggregated report.
        #[arg(long, default_value = "parser_output.txt")]
        output: PathBuf,
    },
}
