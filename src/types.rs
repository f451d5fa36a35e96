//! Core data model types for the reshaping pipeline.
//!
//! Values flow one way through these types:
//! [`RawTable`] → [`Observation`] → [`LabeledObservation`] → [`CompleteDataSet`].
//! Only the last one outlives a build; it is immutable and queried through
//! [`crate::processing::query`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// Inclusive, contiguous range of years covered by the source's year columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    first: i32,
    last: i32,
}

impl YearRange {
    /// First year of the published NCES/IPEDS extract.
    pub const DEFAULT_FIRST: i32 = 1997;
    /// Last year of the published NCES/IPEDS extract.
    pub const DEFAULT_LAST: i32 = 2023;

    /// Create a validated range; `first` must not be after `last`.
    pub fn new(first: i32, last: i32) -> LoadResult<Self> {
        if first > last {
            return Err(LoadError::InvalidYearRange { first, last });
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    /// Number of years in the range (never zero).
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year)
    }

    /// Iterate years in ascending order.
    pub fn iter(&self) -> std::ops::RangeInclusive<i32> {
        self.first..=self.last
    }

    /// Zero-based offset of `year` within the range.
    pub fn offset_of(&self, year: i32) -> Option<usize> {
        self.contains(year).then(|| (year - self.first) as usize)
    }

    /// Header names of the year columns, in ascending order.
    pub fn column_names(&self) -> Vec<String> {
        self.iter().map(|y| y.to_string()).collect()
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: Self::DEFAULT_FIRST,
            last: Self::DEFAULT_LAST,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.first, self.last)
    }
}

/// One source row as loaded: categorical columns kept as exact text, count cells kept raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub citizenship: String,
    pub cip: String,
    /// Award level code; categorical identifier (e.g. `"17"`), never a number.
    pub award_code: String,
    /// Raw count cells, one per year of the table's [`YearRange`], in ascending year order.
    pub counts: Vec<String>,
}

/// The wide-format source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub years: YearRange,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(years: YearRange, records: Vec<RawRecord>) -> Self {
        Self { years, records }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// A single (source row × year column) cell after reshaping. Borrows its text from the [`RawTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    pub citizenship_raw: &'a str,
    pub cip_raw: &'a str,
    pub award_code_raw: &'a str,
    pub year: i32,
    /// Coerced count: finite and `>= 0`.
    pub count: f64,
}

/// Display labels derived from the raw categorical columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Labels {
    pub citizenship: String,
    pub award: String,
    pub field: String,
}

/// Composite identity `CitizenshipAbbr | AwardAbbr | CIPLabel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub const SEPARATOR: &'static str = " | ";

    pub fn from_labels(labels: &Labels) -> Self {
        Self(format!(
            "{}{sep}{}{sep}{}",
            labels.citizenship,
            labels.award,
            labels.field,
            sep = Self::SEPARATOR
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An [`Observation`] after labeling.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledObservation {
    pub group: GroupKey,
    pub labels: Labels,
    pub year: i32,
    pub count: f64,
}

/// One (GroupKey, Year) row of the dense dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteRow {
    pub group: GroupKey,
    pub year: i32,
    pub count: f64,
    pub citizenship: String,
    pub award: String,
    pub field: String,
}

/// The dense, gap-filled dataset: exactly one [`CompleteRow`] per (GroupKey, Year).
///
/// Rows are ordered by group (first-seen order in the source) and then by ascending year.
/// The value is immutable once built; share it behind an `Arc` and swap the `Arc` to refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteDataSet {
    years: YearRange,
    groups: Vec<GroupKey>,
    rows: Vec<CompleteRow>,
}

impl CompleteDataSet {
    pub(crate) fn from_parts(years: YearRange, groups: Vec<GroupKey>, rows: Vec<CompleteRow>) -> Self {
        debug_assert_eq!(rows.len(), groups.len() * years.len());
        Self { years, groups, rows }
    }

    /// Year range every group is completed over.
    pub fn years(&self) -> YearRange {
        self.years
    }

    /// Distinct group keys in first-seen order.
    pub fn groups(&self) -> &[GroupKey] {
        &self.groups
    }

    pub fn rows(&self) -> &[CompleteRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow every row for which `predicate` returns `true`, preserving dataset order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Vec<&CompleteRow>
    where
        F: FnMut(&CompleteRow) -> bool,
    {
        self.rows.iter().filter(|row| predicate(row)).collect()
    }
}

/// User-selected constraints applied to a [`CompleteDataSet`].
///
/// Empty sets mean "no restriction". `year_range` is inclusive; a range with `min > max`
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub citizenships: BTreeSet<String>,
    #[serde(default)]
    pub awards: BTreeSet<String>,
    #[serde(default)]
    pub fields: BTreeSet<String>,
    pub year_range: (i32, i32),
}

impl FilterSpec {
    /// The reset state: no categorical restriction, the full year range.
    pub fn unrestricted(years: YearRange) -> Self {
        Self {
            citizenships: BTreeSet::new(),
            awards: BTreeSet::new(),
            fields: BTreeSet::new(),
            year_range: (years.first(), years.last()),
        }
    }

    pub fn matches(&self, row: &CompleteRow) -> bool {
        let (min, max) = self.year_range;
        (min..=max).contains(&row.year)
            && allows(&self.citizenships, &row.citizenship)
            && allows(&self.awards, &row.award)
            && allows(&self.fields, &row.field)
    }
}

fn allows(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

/// Aggregates over a filtered row set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total: f64,
    pub per_year: BTreeMap<i32, f64>,
    /// Year with the largest per-year total; ties go to the earliest year.
    pub peak_year: Option<i32>,
}

/// Distinct, non-empty label values present in a dataset, for populating selection controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub citizenships: BTreeSet<String>,
    pub awards: BTreeSet<String>,
    pub fields: BTreeSet<String>,
    pub years: YearRange,
}
