// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use budgetr::view::{self, SortKey, SortOrder, SortSpec};
use common::{sample, tx};

fn dates(rows: &[budgetr::models::Transaction]) -> Vec<&str> {
    rows.iter().map(|t| t.date.as_str()).collect()
}

#[test]
fn default_sort_is_date_descending() {
    let mut rows = sample();
    view::sort(&mut rows, SortSpec::default());
    assert_eq!(dates(&rows), ["2024-06-01", "2024-01-01", "2023-06-01"]);
}

#[test]
fn empty_query_returns_everything_in_canonical_order() {
    let rows = sample();
    assert_eq!(view::filter(&rows, ""), rows);
}

#[test]
fn query_matches_any_searchable_column_case_insensitively() {
    let rows = sample();
    let ids = |q: &str| -> Vec<String> {
        view::filter(&rows, q)
            .into_iter()
            .map(|t| t.id)
            .collect()
    };
    assert_eq!(ids("corner"), ["A1"]); // description
    assert_eq!(ids("INCOME"), ["B2"]); // category
    assert_eq!(ids("2024-"), ["A1", "C3"]); // date
    assert_eq!(ids("2500.0"), ["B2"]); // amount text
    assert_eq!(ids("-12"), ["C3"]);
    assert!(ids("nothing like this").is_empty());
}

#[test]
fn filter_agrees_with_matches() {
    let rows = sample();
    for q in ["", "a", "T", "food", ".5", "06"] {
        let expected: Vec<_> = rows
            .iter()
            .filter(|t| {
                let q = q.to_lowercase();
                t.description.to_lowercase().contains(&q)
                    || t.category.to_lowercase().contains(&q)
                    || t.date.to_lowercase().contains(&q)
                    || t.amount_text().to_lowercase().contains(&q)
            })
            .cloned()
            .collect();
        assert_eq!(view::filter(&rows, q), expected, "query {:?}", q);
    }
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let mut rows = vec![
        tx("1", "2024-01-01", "first", 1.0, "same"),
        tx("2", "2024-02-01", "second", 2.0, "same"),
        tx("3", "2024-03-01", "third", 3.0, "same"),
    ];
    view::sort(
        &mut rows,
        SortSpec::new(SortKey::Category, SortOrder::Descending),
    );
    let ids: Vec<_> = rows.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
fn amount_sort_handles_negatives() {
    let mut rows = sample();
    view::sort(
        &mut rows,
        SortSpec::new(SortKey::Amount, SortOrder::Ascending),
    );
    let amounts: Vec<f64> = rows.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, [-42.5, -12.0, 2500.0]);
}

#[test]
fn sort_spec_parts_parse_from_text() {
    assert_eq!("Amount".parse::<SortKey>().unwrap(), SortKey::Amount);
    assert_eq!(" cat ".parse::<SortKey>().unwrap(), SortKey::Category);
    assert!("payee".parse::<SortKey>().is_err());
    assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
    assert_eq!(
        SortSpec::new(SortKey::Description, SortOrder::Ascending).to_string(),
        "description asc"
    );
}
