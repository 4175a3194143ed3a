//! Error types for litrack-core

use litrack_domain::ValidationError;
use thiserror::Error;

/// Result type alias for litrack operations
pub type Result<T> = std::result::Result<T, LitrackError>;

/// Main error type for litrack operations
#[derive(Error, Debug)]
pub enum LitrackError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Identity acquisition errors
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Subscription and mutation errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Draft errors
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Access gate errors
    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required setting absent from the environment
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// Setting present but unusable
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reported by a remote document store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Caller lacks access
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Store temporarily unreachable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Identity acquisition errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Transient failure, worth retrying
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    /// Provider refused anonymous sign-in
    #[error("Anonymous sign-in rejected: {0}")]
    Rejected(String),
}

impl IdentityError {
    pub fn is_transient(&self) -> bool {
        matches!(self, IdentityError::Unavailable(_))
    }
}

/// Subscription and mutation errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// Identity could not be obtained
    #[error("Could not obtain identity after {attempts} attempt(s): {source}")]
    Identity {
        attempts: u32,
        #[source]
        source: IdentityError,
    },

    /// Operation requires an identity and a subscription
    #[error("Not connected (state: {0})")]
    NotConnected(String),

    /// Subscription delivered an error
    #[error("Subscription failed: {0}")]
    Subscription(StoreError),

    /// Remote mutation failed
    #[error("{operation} failed: {source}")]
    Mutation {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// Record refused before reaching the store
    #[error("Entry rejected: {}", format_validation(.0))]
    Invalid(Vec<ValidationError>),

    /// Entry could not be encoded as a document
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Draft errors
#[derive(Error, Debug, PartialEq)]
pub enum EditorError {
    /// Field value could not be coerced to the field's type
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    /// Field cannot be edited
    #[error("Field {0} is not editable")]
    ReadOnly(&'static str),

    /// Draft failed validation on submit
    #[error("Draft is incomplete: {}", format_validation(.0))]
    Invalid(Vec<ValidationError>),
}

/// Access gate errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Submitted text does not match the shared secret
    #[error("Incorrect password")]
    IncorrectPassword,
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
