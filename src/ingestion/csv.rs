//! Delimited-text loading of the wide source table.

use std::path::Path;

use crate::config::{AWARD_LEVEL_COLUMN, CIP_COLUMN, CITIZENSHIP_COLUMN};
use crate::error::{LoadError, LoadResult};
use crate::types::{RawRecord, RawTable, YearRange};

/// Load a delimited file into a [`RawTable`].
///
/// Rules:
///
/// - The file must have a header row.
/// - Headers must contain the three categorical columns and one column per year in `years`
///   (order can differ; extra columns are ignored).
/// - Categorical cells are kept byte-for-byte as text. In particular the award level code is never
///   interpreted as a number, so `"17"` stays `"17"`.
/// - Count cells are kept raw; numeric coercion happens in [`crate::processing::reshape`].
pub fn load_raw_from_path(
    path: impl AsRef<Path>,
    years: YearRange,
    delimiter: u8,
) -> LoadResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    load_raw_from_reader(&mut rdr, years)
}

/// Load a [`RawTable`] from an existing CSV reader.
///
/// Invalid UTF-8 is replaced rather than rejected; short rows read missing cells as empty.
pub fn load_raw_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    years: YearRange,
) -> LoadResult<RawTable> {
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let citizenship_idx = column_index(&headers, CITIZENSHIP_COLUMN)?;
    let cip_idx = column_index(&headers, CIP_COLUMN)?;
    let award_idx = column_index(&headers, AWARD_LEVEL_COLUMN)?;
    let year_idxs = years
        .column_names()
        .iter()
        .map(|name| column_index(&headers, name))
        .collect::<LoadResult<Vec<_>>>()?;

    let mut records = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let cell = |idx: usize| {
            record
                .get(idx)
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default()
        };
        records.push(RawRecord {
            citizenship: cell(citizenship_idx),
            cip: cell(cip_idx),
            award_code: cell(award_idx),
            counts: year_idxs.iter().map(|&idx| cell(idx)).collect(),
        });
    }

    Ok(RawTable::new(years, records))
}

fn column_index(headers: &[String], name: &str) -> LoadResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::SchemaMismatch {
            message: format!("missing required column '{name}'. headers={headers:?}"),
        })
}
