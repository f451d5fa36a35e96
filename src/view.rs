//! View models for the presentation layer.
//!
//! Each UI interaction maps to one synchronous call, [`handle`], which is a pure function of the
//! request and the immutable dataset. The returned [`ViewModel`] carries everything a renderer
//! needs: chart series per group, summary cards, and a "no data" message for empty selections.

use serde::{Deserialize, Serialize};

use crate::processing::summarize;
use crate::types::{CompleteDataSet, CompleteRow, FilterSpec, GroupKey, Summary};

/// Message shown instead of a chart when the filter matches nothing.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters";

/// Chart style requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Line,
    /// Grouped bars.
    Bar,
    /// Stacked bars.
    Stacked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub filter: FilterSpec,
    #[serde(default)]
    pub chart: ChartKind,
}

/// One `(year, count)` point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub year: i32,
    pub count: f64,
}

/// All points for one group, in ascending year order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub group: GroupKey,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: String,
    pub value: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub chart: ChartKind,
    pub series: Vec<Series>,
    pub summary: Summary,
    /// Empty when there is no data.
    pub cards: Vec<SummaryCard>,
    /// Set when the filter matched nothing; the renderer shows it instead of a chart.
    pub message: Option<String>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Dashboard title for the dataset's year range.
pub fn title(dataset: &CompleteDataSet) -> String {
    let years = dataset.years();
    format!(
        "The US STEM Talent Pipeline From {} to {}",
        years.first(),
        years.last()
    )
}

/// Build the view for `request`.
pub fn handle(dataset: &CompleteDataSet, request: &ViewRequest) -> ViewModel {
    let rows = crate::processing::filter(dataset, &request.filter);
    render(dataset, request.chart, &rows)
}

/// Build a view from rows that were already filtered (e.g. by the parallel engine).
pub fn render(dataset: &CompleteDataSet, chart: ChartKind, rows: &[&CompleteRow]) -> ViewModel {
    let summary = summarize(rows.iter().copied());
    if rows.is_empty() {
        return ViewModel {
            title: title(dataset),
            chart,
            series: Vec::new(),
            summary,
            cards: Vec::new(),
            message: Some(NO_DATA_MESSAGE.to_string()),
        };
    }

    ViewModel {
        title: title(dataset),
        chart,
        series: series(rows),
        cards: cards(&summary),
        summary,
        message: None,
    }
}

// Rows arrive grouped and year-ordered from the dataset, so consecutive runs form one series.
fn series(rows: &[&CompleteRow]) -> Vec<Series> {
    let mut out: Vec<Series> = Vec::new();
    for row in rows {
        let point = Point {
            year: row.year,
            count: row.count,
        };
        match out.last_mut() {
            Some(last) if last.group == row.group => last.points.push(point),
            _ => out.push(Series {
                group: row.group.clone(),
                points: vec![point],
            }),
        }
    }
    out
}

fn cards(summary: &Summary) -> Vec<SummaryCard> {
    let peak = summary
        .peak_year
        .map_or_else(|| "N/A".to_string(), |y| y.to_string());
    vec![
        SummaryCard {
            title: "Total Degrees".to_string(),
            value: format_thousands(summary.total),
            caption: "Total number of degrees awarded".to_string(),
        },
        SummaryCard {
            title: "Peak Year".to_string(),
            value: peak,
            caption: "Year with the most degrees awarded".to_string(),
        },
    ]
}

/// Whole part of `value` with `,` thousands separators, e.g. `1234567.9` → `"1,234,567"`.
pub fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
