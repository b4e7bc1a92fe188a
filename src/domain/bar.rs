//! Daily quote bar representation.

use chrono::NaiveDate;

/// One trading day of OHLCV data for a single instrument.
///
/// The instrument symbol lives on [`crate::domain::series::InstrumentSeries`],
/// not on the bar itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
