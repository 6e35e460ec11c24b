//! User records and the row normalizer.
//!
//! A raw CSV row goes through these steps, in order:
//!
//! 1. trim every field
//! 2. reject if the field count is wrong
//! 3. strip disallowed characters from both names (repair, not reject)
//! 4. reject if a name is empty, either as given or once stripped
//! 5. reject if the email is not structurally valid
//! 6. capitalize both names, lower-case the email
//! 7. truncate over-long names (repair, not reject)
//!
//! Structural defects reject the row; content defects are repaired and reported.

mod email;

pub use email::is_valid_email;

use crate::diagnostics::{NameField, RejectionReason, Repair};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Default maximum length for first and last names
pub const DEFAULT_MAX_NAME_LENGTH: usize = 80;

/// Fields per row: first name, last name, email
pub const REQUIRED_FIELD_COUNT: usize = 3;

/// Anything that is not a letter, whitespace, hyphen or apostrophe
static NAME_DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z\s'-]").unwrap());

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// CSV file to import
    pub source_path: PathBuf,
    pub max_first_name_length: usize,
    pub max_last_name_length: usize,
    pub required_field_count: usize,
    /// Validate and report everything, but never insert
    pub dry_run: bool,
}

impl ImportConfig {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            max_first_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_last_name_length: DEFAULT_MAX_NAME_LENGTH,
            required_field_count: REQUIRED_FIELD_COUNT,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_max_first_name_length(mut self, max: usize) -> Self {
        self.max_first_name_length = max;
        self
    }

    pub fn with_max_last_name_length(mut self, max: usize) -> Self {
        self.max_last_name_length = max;
        self
    }

    /// Fields a row must have. Values below [`REQUIRED_FIELD_COUNT`] still
    /// reject every row, since name and email are always read.
    pub fn with_required_field_count(mut self, count: usize) -> Self {
        self.required_field_count = count;
        self
    }

    fn max_length(&self, field: NameField) -> usize {
        match field {
            NameField::First => self.max_first_name_length,
            NameField::Last => self.max_last_name_length,
        }
    }
}

/// One record as read from the CSV file, before trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number where the record starts
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new<I, S>(line: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// A validated, normalized user ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    first_name: String,
    last_name: String,
    email: String,
}

impl UserRecord {
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Result of normalizing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub outcome: Result<UserRecord, RejectionReason>,
    /// Repairs applied before the outcome was decided, in the order made
    pub repairs: Vec<Repair>,
}

impl Normalized {
    fn rejected(reason: RejectionReason, repairs: Vec<Repair>) -> Self {
        Self {
            outcome: Err(reason),
            repairs,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Validate and normalize one raw row.
pub fn normalize(row: &RawRow, config: &ImportConfig) -> Normalized {
    let mut repairs = Vec::new();

    let fields: Vec<&str> = row.fields.iter().map(|f| f.trim()).collect();

    if fields.len() != config.required_field_count {
        return Normalized::rejected(
            RejectionReason::FieldCountMismatch {
                actual: fields.len(),
                expected: config.required_field_count,
            },
            repairs,
        );
    }

    let [first, last, email, ..] = fields[..] else {
        return Normalized::rejected(
            RejectionReason::FieldCountMismatch {
                actual: fields.len(),
                expected: REQUIRED_FIELD_COUNT,
            },
            repairs,
        );
    };

    let first = strip_disallowed(first, NameField::First, &mut repairs);
    let last = strip_disallowed(last, NameField::Last, &mut repairs);

    for (value, field) in [(&first, NameField::First), (&last, NameField::Last)] {
        if value.trim().is_empty() {
            return Normalized::rejected(RejectionReason::EmptyName { field }, repairs);
        }
    }

    if !is_valid_email(email) {
        return Normalized::rejected(
            RejectionReason::InvalidEmail {
                value: email.to_string(),
            },
            repairs,
        );
    }

    let first = truncate_name(capitalize_first(&first), NameField::First, config, &mut repairs);
    let last = truncate_name(capitalize_first(&last), NameField::Last, config, &mut repairs);

    Normalized {
        outcome: Ok(UserRecord {
            first_name: first,
            last_name: last,
            email: email.to_lowercase(),
        }),
        repairs,
    }
}

fn strip_disallowed(value: &str, field: NameField, repairs: &mut Vec<Repair>) -> String {
    if !NAME_DISALLOWED_RE.is_match(value) {
        return value.to_string();
    }
    repairs.push(Repair::StrippedCharacters {
        field,
        original: value.to_string(),
    });
    NAME_DISALLOWED_RE.replace_all(value, "").into_owned()
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_name(
    value: String,
    field: NameField,
    config: &ImportConfig,
    repairs: &mut Vec<Repair>,
) -> String {
    let max_length = config.max_length(field);
    if value.chars().count() <= max_length {
        return value;
    }
    let truncated = value.chars().take(max_length).collect();
    repairs.push(Repair::Truncated {
        field,
        original: value,
        max_length,
    });
    truncated
}
