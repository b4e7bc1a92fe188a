//! Per-instrument quote history and trailing-window selection.

use crate::domain::bar::Bar;
use chrono::{Duration, NaiveDate};

/// Normalizes a ticker symbol for use as a repository key.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// An instrument's full daily history, ascending by date with unique dates.
#[derive(Debug, Clone)]
pub struct InstrumentSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl InstrumentSeries {
    /// Builds a series from bars in any order. Bars are sorted ascending by
    /// date; on a duplicate date the bar appearing later in the input wins.
    pub fn new(symbol: &str, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by(|next, prev| {
            if next.date == prev.date {
                std::mem::swap(next, prev);
                true
            } else {
                false
            }
        });
        Self {
            symbol: normalize_symbol(symbol),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The series' own maximum date. Window anchoring is data-relative, so
    /// this is the anchor regardless of the current calendar date.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Trailing window: all bars with `date > latest_date - days`, ascending.
    ///
    /// An empty series or `days == 0` yields an empty window; a `days` larger
    /// than the series span yields the full series.
    pub fn window(&self, days: u32) -> &[Bar] {
        let Some(latest) = self.latest_date() else {
            return &[];
        };
        let Some(cutoff) = latest.checked_sub_signed(Duration::days(i64::from(days))) else {
            // Day-counts past the representable calendar range cover everything.
            return &self.bars;
        };
        let start = self.bars.partition_point(|b| b.date <= cutoff);
        &self.bars[start..]
    }
}
