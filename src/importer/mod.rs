//! CSV import: validate, normalize and insert user rows one at a time.
//!
//! A row is an independent unit of work. Rejections and insert failures are
//! reported and the run moves on to the next row; only problems with the
//! source file itself stop the import.

use crate::diagnostics::{RejectionReason, RowDiagnostic};
use crate::error::{read_operator_file, FatalError, FileProblem};
use crate::gateway::Gateway;
use crate::record::{normalize, ImportConfig, RawRow};
use csv::{ByteRecord, ReaderBuilder, Trim};
use serde::Serialize;
use std::io::Write;

/// Outcome of one import run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportSummary {
    /// Data rows read, header excluded
    pub rows_read: u64,
    /// Rows that passed validation
    pub accepted: u64,
    /// Rows written to the database
    pub inserted: u64,
    /// Rows dropped by validation or by the database
    pub skipped: u64,
    /// Rows that needed at least one repair
    pub repaired: u64,
    pub dry_run: bool,
    /// Every diagnostic emitted, in file order
    pub diagnostics: Vec<RowDiagnostic>,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows read, {} inserted, {} skipped, {} repaired",
            self.rows_read, self.inserted, self.skipped, self.repaired
        )?;
        if self.dry_run {
            write!(f, " (dry run: {} rows would be inserted)", self.accepted)?;
        }
        Ok(())
    }
}

/// Drives the normalizer and the gateway over a CSV file
pub struct Importer<'a> {
    config: &'a ImportConfig,
}

impl<'a> Importer<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    /// Import the configured file.
    ///
    /// Each diagnostic is written as one line to `diagnostics` as soon as it is
    /// found, and also kept in the returned summary.
    pub fn run<G, W>(&self, gateway: &mut G, diagnostics: &mut W) -> Result<ImportSummary, FatalError>
    where
        G: Gateway + ?Sized,
        W: Write + ?Sized,
    {
        let data = self.load_source()?;
        let mut summary = ImportSummary {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        // Blank lines are not records: the reader skips them and they are
        // neither counted nor reported. Line numbers still count them.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(data.as_slice());

        let mut record = ByteRecord::new();
        let mut index: u64 = 0;
        loop {
            let more = reader
                .read_byte_record(&mut record)
                .map_err(|source| FatalError::MalformedSourceFile {
                    path: self.config.source_path.clone(),
                    source,
                })?;
            if !more {
                break;
            }
            index += 1;

            // Header
            if index == 1 {
                continue;
            }

            let line = record.position().map_or(index, |pos| pos.line());
            let row = RawRow::new(
                line,
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned()),
            );
            self.process_row(&row, gateway, diagnostics, &mut summary)?;
        }

        Ok(summary)
    }

    fn process_row<G, W>(
        &self,
        row: &RawRow,
        gateway: &mut G,
        diagnostics: &mut W,
        summary: &mut ImportSummary,
    ) -> Result<(), FatalError>
    where
        G: Gateway + ?Sized,
        W: Write + ?Sized,
    {
        summary.rows_read += 1;
        let normalized = normalize(row, self.config);

        if !normalized.repairs.is_empty() {
            summary.repaired += 1;
        }
        for repair in normalized.repairs {
            emit(RowDiagnostic::repaired(row.line, repair), diagnostics, summary)?;
        }

        let record = match normalized.outcome {
            Ok(record) => record,
            Err(reason) => {
                summary.skipped += 1;
                return emit(RowDiagnostic::rejected(row.line, reason), diagnostics, summary);
            }
        };
        summary.accepted += 1;

        if self.config.dry_run {
            return Ok(());
        }

        match gateway.insert_user(&record) {
            Ok(()) => {
                summary.inserted += 1;
                Ok(())
            }
            Err(cause) => {
                summary.skipped += 1;
                emit(
                    RowDiagnostic::rejected(row.line, RejectionReason::InsertFailed(cause)),
                    diagnostics,
                    summary,
                )
            }
        }
    }

    fn load_source(&self) -> Result<Vec<u8>, FatalError> {
        let path = &self.config.source_path;
        read_operator_file(path).map_err(|problem| match problem {
            FileProblem::Missing => FatalError::MissingSourceFile(path.clone()),
            FileProblem::Unreadable(source) => FatalError::UnreadableSourceFile {
                path: path.clone(),
                source,
            },
        })
    }
}

fn emit<W: Write + ?Sized>(
    diagnostic: RowDiagnostic,
    out: &mut W,
    summary: &mut ImportSummary,
) -> Result<(), FatalError> {
    writeln!(out, "{}", diagnostic)?;
    summary.diagnostics.push(diagnostic);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ExecuteError, InsertError};
    use crate::record::UserRecord;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryGateway {
        rows: Vec<UserRecord>,
        emails: HashSet<String>,
    }

    impl Gateway for MemoryGateway {
        fn execute(&mut self, _sql: &str) -> Result<(), ExecuteError> {
            Ok(())
        }

        fn insert_user(&mut self, record: &UserRecord) -> Result<(), InsertError> {
            if !self.emails.insert(record.email().to_string()) {
                return Err(InsertError::DuplicateKey {
                    email: record.email().to_string(),
                });
            }
            self.rows.push(record.clone());
            Ok(())
        }
    }

    fn write_csv(content: &str) -> (TempDir, ImportConfig) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(&path, content).unwrap();
        (dir, ImportConfig::new(path))
    }

    #[test]
    fn test_header_is_skipped() {
        let (_dir, config) = write_csv("name,surname,email\njohn,smith,john@test.com\n");
        let mut gateway = MemoryGateway::default();
        let mut out = Vec::new();
        let summary = Importer::new(&config).run(&mut gateway, &mut out).unwrap();
        assert_eq!(summary.rows_read, 1);
        assert_eq!(summary.inserted, 1);
        assert!(out.is_empty());
        assert_eq!(gateway.rows[0].first_name(), "John");
    }

    #[test]
    fn test_line_numbers_follow_the_file() {
        let (_dir, config) =
            write_csv("name,surname,email\n\"multi\nline\",x,x@y\nA,B\n");
        let mut gateway = MemoryGateway::default();
        let mut out = Vec::new();
        let summary = Importer::new(&config).run(&mut gateway, &mut out).unwrap();
        // The second data row starts on line 4 because the first spans two lines
        assert_eq!(summary.diagnostics.len(), 2);
        assert_eq!(summary.diagnostics[0].line, 2);
        assert_eq!(summary.diagnostics[1].line, 4);
    }

    #[test]
    fn test_duplicate_email_is_skipped_not_fatal() {
        let (_dir, config) = write_csv(
            "name,surname,email\nJohn,Smith,jsmith@gmail.com\nJane,Smith,JSmith@gmail.com\nAmy,Lee,amy@gmail.com\n",
        );
        let mut gateway = MemoryGateway::default();
        let mut out = Vec::new();
        let summary = Importer::new(&config).run(&mut gateway, &mut out).unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "WARNING: While parsing the line number 3, an error occurred: Duplicate entry 'jsmith@gmail.com' for key 'email'. Skipping row...\n"
        );
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = ImportConfig::new(dir.path().join("nope.csv"));
        let mut gateway = MemoryGateway::default();
        let err = Importer::new(&config)
            .run(&mut gateway, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, FatalError::MissingSourceFile(_)));
    }
}
