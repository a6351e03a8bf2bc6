//! Program-unit sources: where the texts to validate come from.
//!
//! Two conventions are supported. Batch mode reads `1.txt`, `2.txt`, … from
//! one directory until the first missing number, matching the layout the
//! validator has always consumed. The `check` command takes explicit paths,
//! expanding directories into a sorted recursive scan for `.txt` files so
//! runs are deterministic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::diagnostics::HornlintError;

/// One program unit: its identifier (shown in reports) and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramUnit {
    pub id: String,
    pub text: String,
}

/// Reads `1.txt`, `2.txt`, … from `dir` until the first missing number.
/// A missing file is the normal end of the sequence; any other read failure
/// is a real error.
pub fn numbered_units(dir: &Path) -> Result<Vec<ProgramUnit>, HornlintError> {
    let mut units = Vec::new();
    for index in 1usize.. {
        let name = format!("{index}.txt");
        let path = dir.join(&name);
        match fs::read_to_string(&path) {
            Ok(text) => units.push(ProgramUnit { id: name, text }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => break,
            Err(error) => {
                return Err(HornlintError::ReadUnit {
                    path,
                    source: error,
                })
            }
        }
    }
    Ok(units)
}

/// Expands CLI path arguments into units. Plain files are read as given;
/// a directory is scanned recursively for `.txt` files, sorted by path.
pub fn collect_units(paths: &[PathBuf]) -> Result<Vec<ProgramUnit>, HornlintError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(path) {
                let entry = entry.map_err(|error| HornlintError::Scan {
                    path: path.clone(),
                    source: error,
                })?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "txt")
                {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    let mut units = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(&path).map_err(|error| HornlintError::ReadUnit {
            path: path.clone(),
            source: error,
        })?;
        units.push(ProgramUnit {
            id: path.display().to_string(),
            text,
        });
    }
    Ok(units)
}
