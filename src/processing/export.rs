//! CSV export of filtered rows.

use std::io::Write;

use crate::types::CompleteRow;

/// Export header, in column order.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Group",
    "Year",
    "Count",
    "Citizenship Abbr",
    "Award Abbr",
    "CIP Label",
];

/// Write `rows` as CSV: one header line, then one line per row in the given order.
///
/// Whole-number counts are written without a fractional part (`100`, not `100.0`).
pub fn export<'a, I, W>(rows: I, writer: W) -> Result<(), csv::Error>
where
    I: IntoIterator<Item = &'a CompleteRow>,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for row in rows {
        // f64 `Display` already prints whole numbers without a trailing `.0`.
        let year = row.year.to_string();
        let count = row.count.to_string();
        wtr.write_record([
            row.group.as_str(),
            year.as_str(),
            count.as_str(),
            row.citizenship.as_str(),
            row.award.as_str(),
            row.field.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// [`export`] into an in-memory buffer.
pub fn export_to_vec<'a, I>(rows: I) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = &'a CompleteRow>,
{
    let mut buf = Vec::new();
    export(rows, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::export_to_vec;
    use crate::types::{CompleteRow, GroupKey, Labels};

    fn row(field: &str, year: i32, count: f64) -> CompleteRow {
        let labels = Labels {
            citizenship: "US".to_string(),
            award: "BA".to_string(),
            field: field.to_string(),
        };
        CompleteRow {
            group: GroupKey::from_labels(&labels),
            year,
            count,
            citizenship: labels.citizenship,
            award: labels.award,
            field: labels.field,
        }
    }

    #[test]
    fn export_writes_header_and_rows() {
        let rows = vec![row("Engineering", 1997, 100.0), row("Engineering", 1998, 2.5)];
        let out = String::from_utf8(export_to_vec(&rows).unwrap()).unwrap();
        assert_eq!(
            out,
            "Group,Year,Count,Citizenship Abbr,Award Abbr,CIP Label\n\
             US | BA | Engineering,1997,100,US,BA,Engineering\n\
             US | BA | Engineering,1998,2.5,US,BA,Engineering\n"
        );
    }

    #[test]
    fn export_quotes_labels_with_commas() {
        let rows = vec![row("Agriculture, Agriculture Operations", 2000, 0.0)];
        let out = String::from_utf8(export_to_vec(&rows).unwrap()).unwrap();
        assert!(out.ends_with(",2000,0,US,BA,\"Agriculture, Agriculture Operations\"\n"));
        assert!(out.contains("\"US | BA | Agriculture, Agriculture Operations\""));
    }

    #[test]
    fn export_of_no_rows_is_header_only() {
        let out = String::from_utf8(export_to_vec(Vec::new()).unwrap()).unwrap();
        assert_eq!(out, "Group,Year,Count,Citizenship Abbr,Award Abbr,CIP Label\n");
    }
}
