//! Validation for literature entries

use super::{LiteratureEntry, Roster};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted relevance rating.
pub const MIN_RELEVANCE: i32 = 1;
/// Highest accepted relevance rating.
pub const MAX_RELEVANCE: i32 = 3;

/// Severity of a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// A validation error or warning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl ValidationError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate an entry before it is written and return errors/warnings.
pub fn validate_entry(entry: &LiteratureEntry, roster: &Roster) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Required fields
    if entry.title.trim().is_empty() {
        errors.push(ValidationError::error("title", "Title is required"));
    }

    if entry.authors.trim().is_empty() {
        errors.push(ValidationError::error("authors", "Authors are required"));
    }

    if !(MIN_RELEVANCE..=MAX_RELEVANCE).contains(&entry.relevance) {
        errors.push(ValidationError::error(
            "relevance",
            format!(
                "Relevance must be between {MIN_RELEVANCE} and {MAX_RELEVANCE}, got {}",
                entry.relevance
            ),
        ));
    }

    // Writes are restricted to the known sets
    if !entry.status.is_known() {
        errors.push(ValidationError::error(
            "status",
            format!("Unknown status '{}'", entry.status),
        ));
    }

    if !roster.contains(&entry.pic) {
        errors.push(ValidationError::error(
            "pic",
            format!("'{}' is not a team member", entry.pic),
        ));
    }

    // The link is never rejected, only flagged
    if let Some(ref link) = entry.link {
        if !(link.starts_with("http://") || link.starts_with("https://")) {
            errors.push(ValidationError::warning(
                "link",
                "Link should start with http:// or https://",
            ));
        }
    }

    errors
}

/// Check if an entry can be written (no errors)
pub fn is_valid(entry: &LiteratureEntry, roster: &Roster) -> bool {
    validate_entry(entry, roster).iter().all(|e| !e.is_error())
}
