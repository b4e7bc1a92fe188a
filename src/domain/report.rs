//! Assembled analysis results, ready for a report adapter.

use crate::domain::analytics::{self, Analysis};
use crate::domain::series::InstrumentSeries;

/// One computed value (or "no data") for one day-count.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub days: u32,
    pub value: Option<f64>,
}

/// All requested day-counts for one analysis, in request order.
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub analysis: Analysis,
    pub rows: Vec<ReportRow>,
}

impl ReportSection {
    pub fn compute(analysis: Analysis, series: &InstrumentSeries, day_counts: &[u32]) -> Self {
        let rows = day_counts
            .iter()
            .zip(analytics::compute_many(analysis, series, day_counts))
            .map(|(&days, value)| ReportRow { days, value })
            .collect();
        Self { analysis, rows }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub symbol: String,
    pub sections: Vec<ReportSection>,
}
