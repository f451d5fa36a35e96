//! Display labels and group keys for reshaped observations.
//!
//! Labeling never fails: unknown categorical spellings pass through unchanged and CIP text that
//! does not start with a numeric code yields an empty field label.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{GroupKey, LabeledObservation, Labels, Observation};

/// Citizenship synonyms and their abbreviations.
pub const CITIZENSHIP_ABBREVIATIONS: [(&str, &str); 2] = [
    ("U.S. citizen or permanent resident", "US"),
    ("Nonresident alien (temporary visa)", "INTL"),
];

/// IPEDS award level codes and their abbreviations.
pub const AWARD_ABBREVIATIONS: [(&str, &str); 3] = [("17", "BA"), ("18", "MA"), ("19", "PhD")];

// Leading numeric code, optional `-`/`:` separators, then the description up to end of line.
static CIP_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*[-:]*\s*(.*)").expect("CIP label pattern is valid"));

/// Look `raw` up by exact string equality; unmapped values are returned unchanged.
pub fn lookup_or_pass_through<'a>(table: &[(&str, &'static str)], raw: &'a str) -> &'a str {
    table
        .iter()
        .find(|(from, _)| *from == raw)
        .map_or(raw, |(_, to)| *to)
}

pub fn citizenship_abbr(raw: &str) -> &str {
    lookup_or_pass_through(&CITIZENSHIP_ABBREVIATIONS, raw)
}

pub fn award_abbr(raw: &str) -> &str {
    lookup_or_pass_through(&AWARD_ABBREVIATIONS, raw)
}

/// The descriptive part of a CIP code-and-description, or `""` if it has no leading code.
pub fn cip_label(raw: &str) -> &str {
    CIP_LABEL
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Labels for one combination of raw categorical values.
pub fn labels_for(citizenship_raw: &str, award_code_raw: &str, cip_raw: &str) -> Labels {
    Labels {
        citizenship: citizenship_abbr(citizenship_raw).to_owned(),
        award: award_abbr(award_code_raw).to_owned(),
        field: cip_label(cip_raw).to_owned(),
    }
}

/// Label one observation and derive its [`GroupKey`].
pub fn label(observation: &Observation<'_>) -> LabeledObservation {
    let labels = labels_for(
        observation.citizenship_raw,
        observation.award_code_raw,
        observation.cip_raw,
    );
    LabeledObservation {
        group: GroupKey::from_labels(&labels),
        labels,
        year: observation.year,
        count: observation.count,
    }
}

#[cfg(test)]
mod tests {
    use super::{award_abbr, cip_label, citizenship_abbr, label, lookup_or_pass_through};
    use crate::types::Observation;

    #[test]
    fn citizenship_synonyms_map_and_unknowns_pass_through() {
        assert_eq!(citizenship_abbr("U.S. citizen or permanent resident"), "US");
        assert_eq!(citizenship_abbr("Nonresident alien (temporary visa)"), "INTL");
        assert_eq!(citizenship_abbr("Unknown residency"), "Unknown residency");
        assert_eq!(citizenship_abbr(""), "");
    }

    #[test]
    fn award_codes_match_on_exact_text() {
        assert_eq!(award_abbr("17"), "BA");
        assert_eq!(award_abbr("18"), "MA");
        assert_eq!(award_abbr("19"), "PhD");
        assert_eq!(award_abbr("017"), "017");
        assert_eq!(award_abbr("17.0"), "17.0");
        assert_eq!(award_abbr("20"), "20");
    }

    #[test]
    fn lookup_uses_the_given_table() {
        let table = [("a", "A")];
        assert_eq!(lookup_or_pass_through(&table, "a"), "A");
        assert_eq!(lookup_or_pass_through(&table, "b"), "b");
    }

    #[test]
    fn cip_label_strips_code_and_separator() {
        assert_eq!(cip_label("14 - Engineering"), "Engineering");
        assert_eq!(cip_label("14-Engineering"), "Engineering");
        assert_eq!(cip_label("11: Computer and Information Sciences"), "Computer and Information Sciences");
        assert_eq!(cip_label("  26 Biological and Biomedical Sciences"), "Biological and Biomedical Sciences");
        assert_eq!(
            cip_label("01 - Agriculture, Agriculture Operations, and Related Sciences"),
            "Agriculture, Agriculture Operations, and Related Sciences"
        );
    }

    #[test]
    fn malformed_cip_text_yields_empty_label() {
        assert_eq!(cip_label("Engineering"), "");
        assert_eq!(cip_label(""), "");
        assert_eq!(cip_label("- 14 Engineering"), "");
        assert_eq!(cip_label("14"), "");
        assert_eq!(cip_label("14 - "), "");
    }

    #[test]
    fn group_key_is_pipe_joined_labels() {
        let obs = Observation {
            citizenship_raw: "U.S. citizen or permanent resident",
            cip_raw: "14 - Engineering",
            award_code_raw: "17",
            year: 1997,
            count: 100.0,
        };
        let labeled = label(&obs);
        assert_eq!(labeled.group.as_str(), "US | BA | Engineering");
        assert_eq!(labeled.labels.field, "Engineering");
        assert_eq!(labeled.count, 100.0);
        assert_eq!(label(&obs), labeled);
    }
}
