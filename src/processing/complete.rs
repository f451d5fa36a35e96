//! Grid completion: one row per (GroupKey, Year) over the configured year range.

use std::collections::HashMap;

use crate::types::{CompleteDataSet, CompleteRow, GroupKey, LabeledObservation, Labels, YearRange};

struct GroupAccumulator {
    key: GroupKey,
    first_labels: Labels,
    earliest_positive: Option<(i32, Labels)>,
    counts: Vec<f64>,
}

impl GroupAccumulator {
    fn new(key: GroupKey, labels: Labels, years: YearRange) -> Self {
        Self {
            key,
            first_labels: labels,
            earliest_positive: None,
            counts: vec![0.0; years.len()],
        }
    }

    /// Labels of the earliest-year positive observation (first seen wins ties), else the first seen.
    fn representative_labels(self) -> (GroupKey, Labels, Vec<f64>) {
        let labels = match self.earliest_positive {
            Some((_, labels)) => labels,
            None => self.first_labels,
        };
        (self.key, labels, self.counts)
    }
}

/// Build the dense dataset from labeled observations.
///
/// - Groups are every distinct [`GroupKey`] seen in `observations`, in first-seen order.
/// - Counts for the same (GroupKey, Year) are summed, since distinct raw spellings can collapse
///   onto one key.
/// - Years in `years` with no observation get a count of `0`. Observations outside `years` still
///   register their group but contribute no count.
pub fn complete<I>(observations: I, years: YearRange) -> CompleteDataSet
where
    I: IntoIterator<Item = LabeledObservation>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<GroupAccumulator> = Vec::new();

    for obs in observations {
        let LabeledObservation {
            group,
            labels,
            year,
            count,
        } = obs;

        let slot = match index.get(&group) {
            Some(&slot) => slot,
            None => {
                let slot = groups.len();
                index.insert(group.clone(), slot);
                groups.push(GroupAccumulator::new(group, labels.clone(), years));
                slot
            }
        };
        let acc = &mut groups[slot];

        let Some(offset) = years.offset_of(year) else {
            continue;
        };
        acc.counts[offset] += count;

        if count > 0.0 && acc.earliest_positive.as_ref().is_none_or(|(best, _)| year < *best) {
            acc.earliest_positive = Some((year, labels));
        }
    }

    let mut keys = Vec::with_capacity(groups.len());
    let mut rows = Vec::with_capacity(groups.len() * years.len());
    for acc in groups {
        let (key, labels, counts) = acc.representative_labels();
        for (year, count) in years.iter().zip(counts) {
            rows.push(CompleteRow {
                group: key.clone(),
                year,
                count,
                citizenship: labels.citizenship.clone(),
                award: labels.award.clone(),
                field: labels.field.clone(),
            });
        }
        keys.push(key);
    }

    CompleteDataSet::from_parts(years, keys, rows)
}
