//! Literature entry domain model

use super::Status;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Opaque identifier assigned by the document store.
pub type EntryId = String;

/// A catalogued paper with the team's notes, rating and reading status.
///
/// Field names on the wire are camelCase (`unitOfObservations`). The `id` is
/// the document identifier and is never part of the stored fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiteratureEntry {
    #[serde(skip)]
    pub id: Option<EntryId>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub authors: String,
    #[serde(deserialize_with = "lenient_int")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub publication: String,
    #[serde(deserialize_with = "null_as_default")]
    pub topic: String,
    /// Description of the data source used by the paper.
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_of_observations: String,
    /// Person in charge.
    #[serde(deserialize_with = "null_as_default")]
    pub pic: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub findings: String,
    #[serde(deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contributions: String,
    /// Rating from 1 (low) to 3 (high).
    #[serde(deserialize_with = "lenient_int")]
    pub relevance: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Addressable fields of an entry, named as they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    Id,
    Title,
    Authors,
    Year,
    Publication,
    Topic,
    Data,
    UnitOfObservations,
    Pic,
    Summary,
    Findings,
    Method,
    Contributions,
    Relevance,
    Status,
    Link,
}

impl EntryField {
    /// Every field, in display order.
    pub const ALL: [EntryField; 16] = [
        EntryField::Id,
        EntryField::Title,
        EntryField::Authors,
        EntryField::Year,
        EntryField::Publication,
        EntryField::Topic,
        EntryField::Data,
        EntryField::UnitOfObservations,
        EntryField::Pic,
        EntryField::Summary,
        EntryField::Findings,
        EntryField::Method,
        EntryField::Contributions,
        EntryField::Relevance,
        EntryField::Status,
        EntryField::Link,
    ];

    /// Stored (wire) name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Year => "year",
            Self::Publication => "publication",
            Self::Topic => "topic",
            Self::Data => "data",
            Self::UnitOfObservations => "unitOfObservations",
            Self::Pic => "pic",
            Self::Summary => "summary",
            Self::Findings => "findings",
            Self::Method => "method",
            Self::Contributions => "contributions",
            Self::Relevance => "relevance",
            Self::Status => "status",
            Self::Link => "link",
        }
    }

    /// Look up a field by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Numeric fields sort numerically; the rest sort lexicographically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Year | Self::Relevance)
    }
}

impl LiteratureEntry {
    /// Decode a stored document. Missing fields take their defaults.
    pub fn from_document(
        id: EntryId,
        fields: Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let mut entry: LiteratureEntry = serde_json::from_value(Value::Object(fields))?;
        entry.id = Some(id);
        Ok(entry)
    }

    /// Encode the stored fields. The `id` is not included.
    pub fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            // A struct always serializes to an object.
            other => Ok(Map::from_iter([("value".to_string(), other)])),
        }
    }

    /// String representation of a field, as shown in the list and matched by search.
    pub fn field_text(&self, field: EntryField) -> Cow<'_, str> {
        match field {
            EntryField::Id => Cow::Borrowed(self.id.as_deref().unwrap_or_default()),
            EntryField::Title => Cow::Borrowed(&self.title),
            EntryField::Authors => Cow::Borrowed(&self.authors),
            EntryField::Year => Cow::Owned(self.year.to_string()),
            EntryField::Publication => Cow::Borrowed(&self.publication),
            EntryField::Topic => Cow::Borrowed(&self.topic),
            EntryField::Data => Cow::Borrowed(&self.data),
            EntryField::UnitOfObservations => Cow::Borrowed(&self.unit_of_observations),
            EntryField::Pic => Cow::Borrowed(&self.pic),
            EntryField::Summary => Cow::Borrowed(&self.summary),
            EntryField::Findings => Cow::Borrowed(&self.findings),
            EntryField::Method => Cow::Borrowed(&self.method),
            EntryField::Contributions => Cow::Borrowed(&self.contributions),
            EntryField::Relevance => Cow::Owned(self.relevance.to_string()),
            EntryField::Status => Cow::Borrowed(self.status.label()),
            EntryField::Link => Cow::Borrowed(self.link.as_deref().unwrap_or_default()),
        }
    }

    /// Integer value of a numeric field.
    pub fn field_number(&self, field: EntryField) -> Option<i64> {
        match field {
            EntryField::Year => Some(i64::from(self.year)),
            EntryField::Relevance => Some(i64::from(self.relevance)),
            _ => None,
        }
    }
}

/// A stored `null` reads as the field's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts integers, whole floats and numeric strings; `null` becomes 0.
///
/// Documents edited outside the app sometimes carry `"2021"` instead of `2021`.
fn lenient_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let out_of_range = |v: i64| D::Error::custom(format!("integer out of range: {v}"));
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Raw::Int(v)) => i32::try_from(v).map_err(|_| out_of_range(v)),
        Some(Raw::Float(v)) if v.fract() == 0.0 => {
            i32::try_from(v as i64).map_err(|_| out_of_range(v as i64))
        }
        Some(Raw::Float(v)) => Err(D::Error::custom(format!("expected an integer, got {v}"))),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}
