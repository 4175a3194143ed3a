//! List projection: filter, search and sort the mirror for display.
//!
//! `project` is pure and deterministic. It only borrows the mirror, so the
//! output is always a subset of the input.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use litrack_domain::{EntryField, LiteratureEntry, Status};
use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: EntryField,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::ascending(EntryField::Title)
    }
}

impl SortConfig {
    pub fn ascending(key: EntryField) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: EntryField) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    /// Column header click: the same key flips direction, a new key starts
    /// ascending.
    pub fn toggle(self, key: EntryField) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.reversed(),
            }
        } else {
            Self::ascending(key)
        }
    }
}

/// Status filter: everything, or a single status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// Parse the filter control's value; `"All"` selects everything.
    pub fn parse(value: &str) -> Self {
        match value {
            "All" => Self::All,
            label => Self::Only(Status::from_label(label)),
        }
    }

    pub fn matches(&self, status: &Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Derive the displayed sequence from the mirror.
///
/// 1. Keep entries matching `status_filter`.
/// 2. If `search_term` is non-empty, keep entries where any field contains it
///    (case-insensitive substring, no tokenization).
/// 3. Stable sort by `sort.key`; descending reverses the comparison.
pub fn project<'a>(
    entries: &'a [LiteratureEntry],
    search_term: &str,
    status_filter: &StatusFilter,
    sort: &SortConfig,
) -> Vec<&'a LiteratureEntry> {
    let needle = search_term.to_lowercase();

    let mut visible: Vec<&LiteratureEntry> = entries
        .iter()
        .filter(|e| status_filter.matches(&e.status))
        .filter(|e| needle.is_empty() || matches_search(e, &needle))
        .collect();

    // `sort_by` is stable, so equal keys keep mirror order.
    visible.sort_by(|a, b| {
        let ord = compare_field(a, b, sort.key);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    visible
}

/// Whether any field's text contains the lowercased needle.
pub fn matches_search(entry: &LiteratureEntry, needle: &str) -> bool {
    EntryField::ALL
        .into_iter()
        .any(|field| entry.field_text(field).to_lowercase().contains(needle))
}

/// Three-way comparison over a field's natural ordering.
pub fn compare_field(a: &LiteratureEntry, b: &LiteratureEntry, key: EntryField) -> Ordering {
    match (a.field_number(key), b.field_number(key)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.field_text(key).cmp(&b.field_text(key)),
    }
}

/// Number of entries per status label, for filter badges.
pub fn status_counts(entries: &[LiteratureEntry]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = Status::KNOWN
        .iter()
        .map(|s| (s.label().to_string(), 0))
        .collect();
    for entry in entries {
        *counts.entry(entry.status.label().to_string()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(title: &str, year: i32, status: Status, relevance: i32) -> LiteratureEntry {
        LiteratureEntry {
            id: Some(format!("id-{title}")),
            title: title.to_string(),
            year,
            status,
            relevance,
            ..Default::default()
        }
    }

    fn scenario() -> Vec<LiteratureEntry> {
        vec![
            entry("A", 2020, Status::ToRead, 1),
            entry("B", 2022, Status::Completed, 3),
        ]
    }

    fn titles(entries: &[&LiteratureEntry]) -> Vec<String> {
        entries.iter().map(|e| e.title.clone()).collect()
    }

    #[rstest]
    #[case(SortDirection::Ascending, &["A", "B"])]
    #[case(SortDirection::Descending, &["B", "A"])]
    fn scenario_sorted_by_year(#[case] direction: SortDirection, #[case] expected: &[&str]) {
        let entries = scenario();
        let sort = SortConfig {
            key: EntryField::Year,
            direction,
        };
        let out = project(&entries, "", &StatusFilter::All, &sort);
        assert_eq!(titles(&out), expected);
    }

    #[test]
    fn scenario_status_filter() {
        let entries = scenario();
        let out = project(
            &entries,
            "",
            &StatusFilter::Only(Status::Completed),
            &SortConfig::ascending(EntryField::Year),
        );
        assert_eq!(titles(&out), ["B"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut entries = scenario();
        entries[1].authors = "SMITH, J.".to_string();
        entries[0].findings = "Nothing about smiths".to_string();
        let out = project(&entries, "smith", &StatusFilter::All, &SortConfig::default());
        assert_eq!(titles(&out), ["A", "B"]);

        let out = project(&entries, "J.", &StatusFilter::All, &SortConfig::default());
        assert_eq!(titles(&out), ["B"]);
    }

    #[test]
    fn search_matches_numeric_and_status_fields() {
        let entries = scenario();
        let out = project(&entries, "2022", &StatusFilter::All, &SortConfig::default());
        assert_eq!(titles(&out), ["B"]);
        let out = project(&entries, "to read", &StatusFilter::All, &SortConfig::default());
        assert_eq!(titles(&out), ["A"]);
    }

    #[test]
    fn numeric_fields_sort_numerically() {
        let entries = vec![
            entry("late", 10000, Status::ToRead, 1),
            entry("early", 999, Status::ToRead, 1),
        ];
        let sort = SortConfig::ascending(EntryField::Year);
        let out = project(&entries, "", &StatusFilter::All, &sort);
        assert_eq!(titles(&out), ["early", "late"]);
    }

    #[test]
    fn text_fields_sort_lexicographically() {
        let entries = vec![
            entry("b", 1, Status::ToRead, 1),
            entry("B", 1, Status::ToRead, 1),
            entry("a", 1, Status::ToRead, 1),
        ];
        let sort = SortConfig::ascending(EntryField::Title);
        let out = project(&entries, "", &StatusFilter::All, &sort);
        assert_eq!(titles(&out), ["B", "a", "b"]);
    }

    #[test]
    fn equal_keys_keep_mirror_order_in_both_directions() {
        let entries = vec![
            entry("first", 2020, Status::ToRead, 2),
            entry("second", 2020, Status::ToRead, 2),
        ];
        for sort in [
            SortConfig::ascending(EntryField::Relevance),
            SortConfig::descending(EntryField::Relevance),
        ] {
            let out = project(&entries, "", &StatusFilter::All, &sort);
            assert_eq!(titles(&out), ["first", "second"]);
        }
    }

    #[test]
    fn filter_parse_and_display() {
        assert_eq!(StatusFilter::parse("All"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("Benchmark"),
            StatusFilter::Only(Status::Benchmark)
        );
        assert_eq!(StatusFilter::parse("Benchmark").to_string(), "Benchmark");
    }

    #[test]
    fn toggle_flips_same_key_and_resets_new_key() {
        let sort = SortConfig::ascending(EntryField::Year);
        assert_eq!(sort.toggle(EntryField::Year), SortConfig::descending(EntryField::Year));
        assert_eq!(
            SortConfig::descending(EntryField::Year).toggle(EntryField::Title),
            SortConfig::ascending(EntryField::Title)
        );
    }

    #[test]
    fn counts_include_every_known_status() {
        let mut entries = scenario();
        entries.push(entry("C", 2021, Status::Other("Archived".into()), 1));
        let counts = status_counts(&entries);
        assert_eq!(counts["To Read"], 1);
        assert_eq!(counts["Completed"], 1);
        assert_eq!(counts["Benchmark"], 0);
        assert_eq!(counts["Archived"], 1);
        assert_eq!(counts.values().sum::<usize>(), 3);
    }
}
