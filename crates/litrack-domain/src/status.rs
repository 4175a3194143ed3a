//! Reading status of an entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow state of a literature entry.
///
/// Values written by other clients that are not in the known set are kept
/// verbatim in `Other` so they still display and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    ToRead,
    Reading,
    Completed,
    SuggestedForBenchmark,
    Benchmark,
    Other(String),
}

impl Status {
    /// The known statuses, in workflow order.
    pub const KNOWN: [Status; 5] = [
        Status::ToRead,
        Status::Reading,
        Status::Completed,
        Status::SuggestedForBenchmark,
        Status::Benchmark,
    ];

    /// Display label, which is also the stored value.
    pub fn label(&self) -> &str {
        match self {
            Self::ToRead => "To Read",
            Self::Reading => "Reading",
            Self::Completed => "Completed",
            Self::SuggestedForBenchmark => "Suggested for Benchmark",
            Self::Benchmark => "Benchmark",
            Self::Other(label) => label,
        }
    }

    /// Parse a stored label. Matching is exact; anything else becomes `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "To Read" => Self::ToRead,
            "Reading" => Self::Reading,
            "Completed" => Self::Completed,
            "Suggested for Benchmark" => Self::SuggestedForBenchmark,
            "Benchmark" => Self::Benchmark,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this status may be written by an editor.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        Status::from_label(&label)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
