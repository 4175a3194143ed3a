//! List projection integration tests
//!
//! Property-based checks of filtering and ordering over generated mirrors.

use litrack_core::domain::{EntryField, LiteratureEntry, Status};
use litrack_core::projector::matches_search;
use litrack_core::{project, SortConfig, SortDirection, StatusFilter};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::ToRead),
        Just(Status::Reading),
        Just(Status::Completed),
        Just(Status::SuggestedForBenchmark),
        Just(Status::Benchmark),
        "[A-Z][a-z]{2,6}".prop_map(|label| Status::from_label(&label)),
    ]
}

fn entry_strategy() -> impl Strategy<Value = LiteratureEntry> {
    (
        "[a-zA-Z ]{0,12}",
        "[a-zA-Z, ]{0,12}",
        1990i32..2030,
        1i32..=3,
        status_strategy(),
        "[a-z]{0,8}",
    )
        .prop_map(|(title, authors, year, relevance, status, topic)| LiteratureEntry {
            title,
            authors,
            year,
            relevance,
            status,
            topic,
            ..Default::default()
        })
}

fn mirror_strategy() -> impl Strategy<Value = Vec<LiteratureEntry>> {
    prop::collection::vec(entry_strategy(), 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, mut e)| {
                e.id = Some(format!("doc{i:03}"));
                e
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        status_strategy().prop_map(StatusFilter::Only),
    ]
}

fn sort_strategy() -> impl Strategy<Value = SortConfig> {
    (
        prop::sample::select(EntryField::ALL.to_vec()),
        prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)],
    )
        .prop_map(|(key, direction)| SortConfig { key, direction })
}

fn ids(entries: &[&LiteratureEntry]) -> Vec<String> {
    entries.iter().filter_map(|e| e.id.clone()).collect()
}

proptest! {
    #[test]
    fn projection_is_deterministic(
        mirror in mirror_strategy(),
        term in "[a-z]{0,2}",
        filter in filter_strategy(),
        sort in sort_strategy(),
    ) {
        let first = ids(&project(&mirror, &term, &filter, &sort));
        let second = ids(&project(&mirror, &term, &filter, &sort));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn projection_is_a_subset(
        mirror in mirror_strategy(),
        term in "[a-z]{0,2}",
        filter in filter_strategy(),
        sort in sort_strategy(),
    ) {
        let out = project(&mirror, &term, &filter, &sort);
        prop_assert!(out.len() <= mirror.len());
        for entry in out {
            prop_assert!(mirror.iter().any(|m| std::ptr::eq(m, entry)));
        }
    }

    #[test]
    fn descending_year_is_non_increasing(mirror in mirror_strategy()) {
        let sort = SortConfig::descending(EntryField::Year);
        let out = project(&mirror, "", &StatusFilter::All, &sort);
        prop_assert_eq!(out.len(), mirror.len());
        for pair in out.windows(2) {
            prop_assert!(pair[0].year >= pair[1].year);
        }
    }

    #[test]
    fn status_filter_is_exact(mirror in mirror_strategy(), term in "[a-z]{0,2}") {
        let sort = SortConfig::default();
        let out = project(&mirror, &term, &StatusFilter::Only(Status::Benchmark), &sort);
        prop_assert!(out.iter().all(|e| e.status == Status::Benchmark));

        let needle = term.to_lowercase();
        let searched = mirror
            .iter()
            .filter(|e| needle.is_empty() || matches_search(e, &needle))
            .count();
        let all = project(&mirror, &term, &StatusFilter::All, &sort);
        prop_assert_eq!(all.len(), searched);
    }

    #[test]
    fn search_ignores_case(mirror in mirror_strategy(), term in "[a-z]{1,3}") {
        let sort = SortConfig::default();
        let lower = ids(&project(&mirror, &term, &StatusFilter::All, &sort));
        let upper = ids(&project(&mirror, &term.to_uppercase(), &StatusFilter::All, &sort));
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn equal_keys_keep_mirror_order(mirror in mirror_strategy()) {
        let sort = SortConfig::ascending(EntryField::Relevance);
        let out = project(&mirror, "", &StatusFilter::All, &sort);
        for pair in out.windows(2) {
            if pair[0].relevance == pair[1].relevance {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }
}

#[test]
fn uppercase_author_matched_by_lowercase_term() {
    let mirror = vec![
        LiteratureEntry {
            id: Some("a".into()),
            authors: "SMITH, J. and Jones, K.".into(),
            ..Default::default()
        },
        LiteratureEntry {
            id: Some("b".into()),
            authors: "Brown, L.".into(),
            ..Default::default()
        },
    ];
    let out = project(&mirror, "smith", &StatusFilter::All, &SortConfig::default());
    assert_eq!(ids(&out), ["a"]);
}
