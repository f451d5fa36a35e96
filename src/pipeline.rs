//! One-call build of the complete dataset: load → reshape → label → complete.

use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::LoadResult;
use crate::ingestion::{load_from_path, resolve_format, LoadContext, LoadOptions, LoadSeverity, LoadStats};
use crate::processing::{complete, label, reshape, CoercionWarning};
use crate::types::{CompleteDataSet, RawTable};

/// Result of building from an in-memory table.
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub dataset: CompleteDataSet,
    /// Count cells that were present but unusable and were read as `0`.
    pub warnings: Vec<CoercionWarning>,
    pub stats: LoadStats,
}

/// Reshape, label and complete an already-loaded table.
pub fn build_from_table(table: &RawTable) -> Built {
    let reshaped = reshape(table);
    let observations = reshaped.observations.len();
    let dataset = complete(reshaped.observations.iter().map(label), table.years);

    let stats = LoadStats {
        rows: table.row_count(),
        observations,
        coerced_cells: reshaped.warnings.len(),
        groups: dataset.groups().len(),
        complete_rows: dataset.row_count(),
    };
    Built {
        dataset,
        warnings: reshaped.warnings,
        stats,
    }
}

/// Load the source at `path` and build the immutable [`CompleteDataSet`].
///
/// When an observer is configured, this function reports:
///
/// - `on_warning` for each coerced count cell
/// - `on_success` once, with [`LoadStats`]
/// - `on_failure` on failure, and `on_alert` when the failure's severity is at or above
///   `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use stem_pipeline::config::PipelineConfig;
/// use stem_pipeline::ingestion::{LoadOptions, StdErrObserver};
/// use stem_pipeline::pipeline::build;
///
/// # fn main() -> Result<(), stem_pipeline::LoadError> {
/// let opts = LoadOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let dataset = build("NCES_IPEDS_RAW_DATA.csv", &PipelineConfig::default(), &opts)?;
/// println!("groups={} rows={}", dataset.groups().len(), dataset.row_count());
/// # Ok(())
/// # }
/// ```
pub fn build(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
    options: &LoadOptions,
) -> LoadResult<CompleteDataSet> {
    let path = path.as_ref();
    let format = resolve_format(path, options.format)?;
    let ctx = LoadContext {
        path: path.to_path_buf(),
        format,
    };

    let table = match load_from_path(path, config.years, format) {
        Ok(table) => table,
        Err(e) => {
            if let Some(obs) = options.observer.as_ref() {
                let sev = LoadSeverity::for_error(&e);
                obs.on_failure(&ctx, sev, &e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, &e);
                }
            }
            return Err(e);
        }
    };

    let built = build_from_table(&table);
    if let Some(obs) = options.observer.as_ref() {
        for warning in &built.warnings {
            obs.on_warning(&ctx, warning);
        }
        obs.on_success(&ctx, built.stats);
    }

    Ok(built.dataset)
}

#[cfg(test)]
mod tests {
    use super::build_from_table;
    use crate::types::{RawRecord, RawTable, YearRange};

    #[test]
    fn spelling_variants_collapse_and_sum() {
        let years = YearRange::new(1997, 1998).unwrap();
        let rows = vec![
            RawRecord {
                citizenship: "U.S. citizen or permanent resident".to_string(),
                cip: "14 - Engineering".to_string(),
                award_code: "17".to_string(),
                counts: vec!["50".to_string(), "1".to_string()],
            },
            RawRecord {
                citizenship: "US".to_string(),
                cip: "14: Engineering".to_string(),
                award_code: "17".to_string(),
                counts: vec!["30".to_string(), "".to_string()],
            },
        ];
        let built = build_from_table(&RawTable::new(years, rows));

        assert_eq!(built.dataset.groups().len(), 1);
        assert_eq!(built.dataset.rows()[0].group.as_str(), "US | BA | Engineering");
        assert_eq!(built.dataset.rows()[0].count, 80.0);
        assert_eq!(built.dataset.rows()[1].count, 1.0);
        assert_eq!(built.stats.rows, 2);
        assert_eq!(built.stats.observations, 4);
        assert_eq!(built.stats.complete_rows, 2);
        assert!(built.warnings.is_empty());
    }
}
