//! Read-only queries over a [`CompleteDataSet`].
//!
//! Every function here is a pure function of its inputs and never fails: an inverted year range
//! or a selection that matches nothing yields an empty result, not an error.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{CompleteDataSet, CompleteRow, FilterOptions, FilterSpec, Summary};

/// Rows matching `spec`, in dataset order.
///
/// Empty selection sets mean "no restriction"; the year range is inclusive.
pub fn filter<'a>(dataset: &'a CompleteDataSet, spec: &FilterSpec) -> Vec<&'a CompleteRow> {
    dataset.filter_rows(|row| spec.matches(row))
}

/// Total, per-year totals, and peak year over `rows`.
///
/// The peak year is the year with the largest per-year total; ties go to the earliest year.
/// An empty input gives `Summary::default()` (zero total, no years, no peak).
pub fn summarize<'a, I>(rows: I) -> Summary
where
    I: IntoIterator<Item = &'a CompleteRow>,
{
    let mut total = 0.0;
    let mut per_year: BTreeMap<i32, f64> = BTreeMap::new();
    for row in rows {
        total += row.count;
        *per_year.entry(row.year).or_insert(0.0) += row.count;
    }

    let mut peak: Option<(i32, f64)> = None;
    for (&year, &count) in &per_year {
        if peak.is_none_or(|(_, best)| count > best) {
            peak = Some((year, count));
        }
    }

    Summary {
        total,
        per_year,
        peak_year: peak.map(|(year, _)| year),
    }
}

/// Distinct non-empty label values present in `dataset`, sorted ascending.
pub fn filter_options(dataset: &CompleteDataSet) -> FilterOptions {
    let mut citizenships = BTreeSet::new();
    let mut awards = BTreeSet::new();
    let mut fields = BTreeSet::new();
    for row in dataset.rows() {
        insert_non_empty(&mut citizenships, &row.citizenship);
        insert_non_empty(&mut awards, &row.award);
        insert_non_empty(&mut fields, &row.field);
    }
    FilterOptions {
        citizenships,
        awards,
        fields,
        years: dataset.years(),
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() && !set.contains(value) {
        set.insert(value.to_owned());
    }
}

/// The filter a reset returns to: nothing selected, the full year range.
pub fn default_filter(dataset: &CompleteDataSet) -> FilterSpec {
    FilterSpec::unrestricted(dataset.years())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{default_filter, filter, filter_options, summarize};
    use crate::pipeline::build_from_table;
    use crate::types::{CompleteDataSet, CompleteRow, FilterSpec, RawRecord, RawTable, YearRange};

    fn raw(citizenship: &str, cip: &str, award: &str, counts: &[&str]) -> RawRecord {
        RawRecord {
            citizenship: citizenship.to_string(),
            cip: cip.to_string(),
            award_code: award.to_string(),
            counts: counts.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample_dataset() -> CompleteDataSet {
        let years = YearRange::new(2000, 2003).unwrap();
        build_from_table(&RawTable::new(
            years,
            vec![
                raw("U.S. citizen or permanent resident", "14 - Engineering", "17", &["10", "20", "30", "40"]),
                raw("Nonresident alien (temporary visa)", "14 - Engineering", "19", &["1", "2", "", "4"]),
                raw("U.S. citizen or permanent resident", "27 - Mathematics and Statistics", "18", &["5", "x", "5", "5"]),
            ],
        ))
        .dataset
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sum(rows: &[&CompleteRow]) -> f64 {
        rows.iter().map(|r| r.count).sum()
    }

    #[test]
    fn empty_selections_do_not_restrict() {
        let ds = sample_dataset();
        let rows = filter(&ds, &default_filter(&ds));
        assert_eq!(rows.len(), ds.row_count());

        let mut spec = default_filter(&ds);
        spec.year_range = (2001, 2002);
        let rows = filter(&ds, &spec);
        assert_eq!(rows.len(), 3 * 2);
        assert!(rows.iter().all(|r| (2001..=2002).contains(&r.year)));
    }

    #[test]
    fn selections_restrict_each_dimension() {
        let ds = sample_dataset();
        let mut spec = default_filter(&ds);
        spec.citizenships = set(&["US"]);
        assert_eq!(filter(&ds, &spec).len(), 2 * 4);

        spec.awards = set(&["BA", "MA"]);
        spec.fields = set(&["Engineering"]);
        let rows = filter(&ds, &spec);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.group.as_str() == "US | BA | Engineering"));
    }

    #[test]
    fn unmatched_selection_and_inverted_range_are_empty() {
        let ds = sample_dataset();
        let mut spec = default_filter(&ds);
        spec.fields = set(&["Physics"]);
        assert!(filter(&ds, &spec).is_empty());

        let spec = FilterSpec {
            year_range: (2003, 2000),
            ..default_filter(&ds)
        };
        assert!(filter(&ds, &spec).is_empty());
    }

    #[test]
    fn summarize_totals_per_year_and_peak() {
        let ds = sample_dataset();
        let rows = filter(&ds, &default_filter(&ds));
        let summary = summarize(rows.iter().copied());

        assert_eq!(summary.total, sum(&rows));
        assert_eq!(summary.total, 100.0 + 7.0 + 15.0);
        assert_eq!(
            summary.per_year.into_iter().collect::<Vec<_>>(),
            vec![(2000, 16.0), (2001, 22.0), (2002, 35.0), (2003, 49.0)]
        );
        assert_eq!(summary.peak_year, Some(2003));
    }

    #[test]
    fn summarize_peak_ties_go_to_earliest_year() {
        let ds = sample_dataset();
        let mut spec = default_filter(&ds);
        spec.fields = set(&["Mathematics and Statistics"]);
        let summary = summarize(filter(&ds, &spec));
        assert_eq!(summary.peak_year, Some(2000));
    }

    #[test]
    fn summarize_of_nothing_is_empty() {
        let summary = summarize(Vec::<&CompleteRow>::new());
        assert_eq!(summary.total, 0.0);
        assert!(summary.per_year.is_empty());
        assert_eq!(summary.peak_year, None);
    }

    #[test]
    fn filter_options_are_sorted_distinct_and_non_empty() {
        let years = YearRange::new(2000, 2000).unwrap();
        let ds = build_from_table(&RawTable::new(
            years,
            vec![
                raw("U.S. citizen or permanent resident", "Unlabeled", "19", &["1"]),
                raw("Nonresident alien (temporary visa)", "14 - Engineering", "17", &["1"]),
                raw("U.S. citizen or permanent resident", "14 - Engineering", "17", &["1"]),
            ],
        ))
        .dataset;

        let options = filter_options(&ds);
        assert_eq!(options.citizenships, set(&["INTL", "US"]));
        assert_eq!(options.awards, set(&["BA", "PhD"]));
        assert_eq!(options.fields, set(&["Engineering"]));
        assert_eq!(options.years, years);
    }
}
