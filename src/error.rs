//! Fatal errors: operator configuration problems that stop the whole run.
//!
//! Row-level problems are never reported through this type; see
//! [`crate::diagnostics`].

use crate::gateway::ExecuteError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Exiting... CSV file {} does not exist", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("Exiting... CSV file {} is not readable", .path.display())]
    UnreadableSourceFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Exiting... database schema file {} does not exist", .0.display())]
    MissingSchemaFile(PathBuf),

    #[error("Exiting... database schema file {} is not readable", .path.display())]
    UnreadableSchemaFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Exiting... could not parse CSV file {}: {}", .path.display(), .source)]
    MalformedSourceFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Error: {0}")]
    Statement(#[from] ExecuteError),

    #[error("Exiting... could not write diagnostics: {0}")]
    Output(#[from] io::Error),
}

/// Why an operator-supplied file could not be loaded
pub(crate) enum FileProblem {
    Missing,
    Unreadable(io::Error),
}

/// Read a whole input file, telling "missing" apart from "unreadable".
pub(crate) fn read_operator_file(path: &Path) -> Result<Vec<u8>, FileProblem> {
    if !path.exists() {
        return Err(FileProblem::Missing);
    }
    fs::read(path).map_err(FileProblem::Unreadable)
}
