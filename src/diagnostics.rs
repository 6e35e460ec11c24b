//! Row-level diagnostics.
//!
//! Every anomaly found while importing is reported as one line on the
//! operator's error stream. The wording is stable and parsed by scripts:
//!
//! ```text
//! WARNING: While parsing the line number 3, the email address foo value is invalid. Skipping this row...
//! ```

use crate::gateway::InsertError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Which name column a repair applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameField::First => write!(f, "firstname"),
            NameField::Last => write!(f, "lastname"),
        }
    }
}

/// Why a row was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The row did not have the configured number of fields
    FieldCountMismatch { actual: usize, expected: usize },
    /// A name field was empty, or had nothing left after stripping
    EmptyName { field: NameField },
    /// The email field failed the structural check
    InvalidEmail { value: String },
    /// The database refused the insert
    InsertFailed(InsertError),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::FieldCountMismatch { actual, expected } => write!(
                f,
                "there were {} fields when {} were expected. Skipping this row...",
                actual, expected
            ),
            RejectionReason::EmptyName { field } => {
                write!(f, "the {} value is empty. Skipping this row...", field)
            }
            RejectionReason::InvalidEmail { value } => write!(
                f,
                "the email address {} value is invalid. Skipping this row...",
                value
            ),
            RejectionReason::InsertFailed(cause) => {
                write!(f, "an error occurred: {}. Skipping row...", cause)
            }
        }
    }
}

/// A cosmetic correction applied to an accepted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// Characters outside letters, whitespace, `-` and `'` were removed
    StrippedCharacters { field: NameField, original: String },
    /// The capitalized name was cut to the configured maximum
    Truncated {
        field: NameField,
        original: String,
        max_length: usize,
    },
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repair::StrippedCharacters { original, .. } => write!(
                f,
                "the name {} had invalid characters that were stripped out...",
                original
            ),
            Repair::Truncated {
                field, original, ..
            } => write!(
                f,
                "{} \"{}\" is too long. Truncating {}...",
                field, original, field
            ),
        }
    }
}

/// What happened to a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Rejected(RejectionReason),
    Repaired(Repair),
}

/// One diagnostic line, tied to the CSV line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line number of the record in the source file
    pub line: u64,
    pub issue: Issue,
}

impl RowDiagnostic {
    pub fn rejected(line: u64, reason: RejectionReason) -> Self {
        Self {
            line,
            issue: Issue::Rejected(reason),
        }
    }

    pub fn repaired(line: u64, repair: Repair) -> Self {
        Self {
            line,
            issue: Issue::Repaired(repair),
        }
    }

    /// Whether the row was dropped
    pub fn is_rejection(&self) -> bool {
        matches!(self.issue, Issue::Rejected(_))
    }

    fn kind(&self) -> &'static str {
        match &self.issue {
            Issue::Rejected(RejectionReason::FieldCountMismatch { .. }) => "field_count_mismatch",
            Issue::Rejected(RejectionReason::EmptyName { .. }) => "empty_name",
            Issue::Rejected(RejectionReason::InvalidEmail { .. }) => "invalid_email",
            Issue::Rejected(RejectionReason::InsertFailed(e)) if e.is_duplicate() => {
                "duplicate_email"
            }
            Issue::Rejected(RejectionReason::InsertFailed(_)) => "insert_failed",
            Issue::Repaired(Repair::StrippedCharacters { .. }) => "invalid_characters",
            Issue::Repaired(Repair::Truncated { .. }) => "truncated",
        }
    }
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WARNING: While parsing the line number {}, ", self.line)?;
        match &self.issue {
            Issue::Rejected(reason) => write!(f, "{}", reason),
            Issue::Repaired(repair) => write!(f, "{}", repair),
        }
    }
}

impl Serialize for RowDiagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RowDiagnostic", 4)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("skipped", &self.is_rejection())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
