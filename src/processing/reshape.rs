//! Wide-to-long reshape with numeric coercion of count cells.

use crate::types::{Observation, RawTable};

/// A count cell that was present but unusable and was replaced by `0`.
///
/// Warnings are informational only; they never fail a build and are not shown to end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionWarning {
    /// 1-based source line (the header is line 1).
    pub row: usize,
    pub year: i32,
    pub raw: String,
}

/// Classification of one raw count cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountCell {
    /// A finite, non-negative number.
    Count(f64),
    /// Empty or whitespace-only; reads as zero without a warning.
    Blank,
    /// Non-numeric, negative, or non-finite; reads as zero with a warning.
    Malformed,
}

impl CountCell {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        match trimmed.parse::<f64>() {
            // `+ 0.0` folds a parsed `-0` into `0`.
            Ok(v) if v.is_finite() && v >= 0.0 => Self::Count(v + 0.0),
            _ => Self::Malformed,
        }
    }

    /// The count this cell contributes; never NaN and never negative.
    pub fn value(self) -> f64 {
        match self {
            Self::Count(v) => v,
            Self::Blank | Self::Malformed => 0.0,
        }
    }
}

/// Output of [`reshape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped<'a> {
    /// One observation per (source row × year), row-major in source order.
    pub observations: Vec<Observation<'a>>,
    pub warnings: Vec<CoercionWarning>,
}

/// Melt the year columns of `table` into long form.
pub fn reshape(table: &RawTable) -> Reshaped<'_> {
    let years = table.years;
    let mut observations = Vec::with_capacity(table.row_count() * years.len());
    let mut warnings = Vec::new();

    for (row_idx0, record) in table.records.iter().enumerate() {
        // Records built in memory may carry fewer cells than years; missing cells read as blank.
        let cells = record.counts.iter().map(String::as_str).chain(std::iter::repeat(""));
        for (year, raw) in years.iter().zip(cells) {
            let cell = CountCell::parse(raw);
            if cell == CountCell::Malformed {
                warnings.push(CoercionWarning {
                    row: row_idx0 + 2,
                    year,
                    raw: raw.to_owned(),
                });
            }
            observations.push(Observation {
                citizenship_raw: &record.citizenship,
                cip_raw: &record.cip,
                award_code_raw: &record.award_code,
                year,
                count: cell.value(),
            });
        }
    }

    Reshaped {
        observations,
        warnings,
    }
}
