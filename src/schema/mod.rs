//! Schema bootstrap: run a SQL script against the target database.
//!
//! The script is split with [`crate::splitter`] and each statement is
//! executed in source order. The first failing statement aborts the rest.

use crate::error::{read_operator_file, FatalError, FileProblem};
use crate::gateway::Gateway;
use crate::splitter::{self, SqlStatement};
use std::io;
use std::path::{Path, PathBuf};

/// Schema script shipped with the tool, relative to the working directory
pub const DEFAULT_SCHEMA_PATH: &str = "database/users_schema.sql";

/// What a bootstrap run did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Statements found in the script
    pub statements: usize,
    /// Statements sent to the database (zero in dry-run mode)
    pub executed: usize,
}

impl std::fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} statements found, {} executed",
            self.statements, self.executed
        )
    }
}

/// Read the schema script at `schema_path`.
pub fn load_script(schema_path: &Path) -> Result<String, FatalError> {
    let bytes = read_operator_file(schema_path).map_err(|problem| match problem {
        FileProblem::Missing => FatalError::MissingSchemaFile(schema_path.to_path_buf()),
        FileProblem::Unreadable(source) => unreadable(schema_path, source),
    })?;
    String::from_utf8(bytes)
        .map_err(|e| unreadable(schema_path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Run the schema script through `gateway`.
///
/// With `dry_run` set the script is still read and split, but nothing is
/// executed.
pub fn bootstrap<G: Gateway + ?Sized>(
    schema_path: &Path,
    gateway: &mut G,
    dry_run: bool,
) -> Result<BootstrapReport, FatalError> {
    let script = load_script(schema_path)?;
    run_statements(splitter::split(&script), gateway, dry_run)
}

/// Execute already-split statements in order, stopping at the first failure.
pub fn run_statements<G, I>(
    statements: I,
    gateway: &mut G,
    dry_run: bool,
) -> Result<BootstrapReport, FatalError>
where
    G: Gateway + ?Sized,
    I: IntoIterator<Item = SqlStatement>,
{
    let mut report = BootstrapReport::default();
    for stmt in statements {
        report.statements += 1;
        if dry_run {
            continue;
        }
        gateway.execute(stmt.as_str())?;
        report.executed += 1;
    }
    Ok(report)
}

fn unreadable(path: &Path, source: io::Error) -> FatalError {
    FatalError::UnreadableSchemaFile {
        path: PathBuf::from(path),
        source,
    }
}
