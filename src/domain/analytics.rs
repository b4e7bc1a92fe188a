//! Trailing-window analytics: SMA, EMA and price volatility.
//!
//! Every computation anchors at the series' own most recent date, never the
//! wall clock. An empty window yields `None`, so callers can tell "no data"
//! apart from a genuine zero-valued result.

use crate::domain::series::InstrumentSeries;
use std::fmt;
use std::str::FromStr;

/// The analyses the engine can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analysis {
    Sma,
    Ema,
    Volatility,
}

impl Analysis {
    pub fn compute(self, series: &InstrumentSeries, days: u32) -> Option<f64> {
        match self {
            Analysis::Sma => sma(series, days),
            Analysis::Ema => ema(series, days),
            Analysis::Volatility => volatility(series, days),
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Analysis::Sma => write!(f, "SMA"),
            Analysis::Ema => write!(f, "EMA"),
            Analysis::Volatility => write!(f, "Volatility"),
        }
    }
}

impl FromStr for Analysis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sma" => Ok(Analysis::Sma),
            "ema" => Ok(Analysis::Ema),
            "volatility" | "vol" => Ok(Analysis::Volatility),
            other => Err(format!("unknown analysis: {other}")),
        }
    }
}

/// Arithmetic mean of closing prices over the trailing window.
pub fn sma(series: &InstrumentSeries, days: u32) -> Option<f64> {
    let window = series.window(days);
    if window.is_empty() {
        return None;
    }
    let sum: f64 = window.iter().map(|b| b.close).sum();
    Some(sum / window.len() as f64)
}

/// Exponential moving average over the trailing window.
///
/// alpha = 2/(days+1). The earliest in-window close seeds the recurrence, so
/// the smoothing reaches only as far back as the window itself. Ascending
/// date order is guaranteed by the series invariant.
pub fn ema(series: &InstrumentSeries, days: u32) -> Option<f64> {
    let window = series.window(days);
    let (seed, rest) = window.split_first()?;
    let alpha = 2.0 / (f64::from(days) + 1.0);
    Some(rest.iter().fold(seed.close, |prev, bar| {
        bar.close * alpha + prev * (1.0 - alpha)
    }))
}

/// Population standard deviation of closing prices around the windowed SMA.
///
/// The mean is [`sma`] over the same window and day-count: volatility measures
/// dispersion around the windowed average, not a separately-fit mean.
pub fn volatility(series: &InstrumentSeries, days: u32) -> Option<f64> {
    let mean = sma(series, days)?;
    let window = series.window(days);
    let sum_sq: f64 = window.iter().map(|b| (b.close - mean).powi(2)).sum();
    Some((sum_sq / window.len() as f64).sqrt())
}

/// One result per requested day-count, in request order. A day-count with no
/// data yields `None` without affecting its siblings.
pub fn compute_many(
    analysis: Analysis,
    series: &InstrumentSeries,
    day_counts: &[u32],
) -> Vec<Option<f64>> {
    day_counts
        .iter()
        .map(|&days| analysis.compute(series, days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_series(closes: &[f64]) -> InstrumentSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2023, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect();
        InstrumentSeries::new("TEST", bars)
    }

    #[test]
    fn sma_of_three_bars() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        assert_eq!(sma(&series, 3), Some(20.0));
    }

    #[test]
    fn sma_window_narrower_than_series() {
        // Latest 2023-01-03, 1 day: only the last bar qualifies.
        let series = make_series(&[10.0, 20.0, 30.0]);
        assert_eq!(sma(&series, 1), Some(30.0));
    }

    #[test]
    fn sma_empty_window_is_no_data() {
        let series = make_series(&[]);
        assert_eq!(sma(&series, 30), None);
    }

    #[test]
    fn ema_single_bar_equals_close() {
        let series = make_series(&[42.5]);
        for days in [1, 2, 30, 360] {
            assert_eq!(ema(&series, days), Some(42.5));
        }
    }

    #[test]
    fn ema_manual_trace() {
        // alpha = 2/3: seed 10, then 20*(2/3)+10*(1/3) = 16.667,
        // then 30*(2/3)+16.667*(1/3) = 25.556.
        let series = make_series(&[10.0, 20.0, 30.0]);
        let result = ema(&series, 2).unwrap();
        assert!((result - 25.556).abs() < 1e-3);
    }

    #[test]
    fn ema_of_constant_series_is_constant() {
        let series = make_series(&[100.0; 8]);
        assert_relative_eq!(ema(&series, 5).unwrap(), 100.0);
    }

    #[test]
    fn ema_result_is_final_recurrence_value() {
        // days=4 covers all three bars; fold by hand.
        let series = make_series(&[10.0, 20.0, 30.0]);
        let alpha = 2.0 / 5.0;
        let e1 = 20.0 * alpha + 10.0 * (1.0 - alpha);
        let e2 = 30.0 * alpha + e1 * (1.0 - alpha);
        assert_relative_eq!(ema(&series, 4).unwrap(), e2);
    }

    #[test]
    fn ema_empty_window_is_no_data() {
        let series = make_series(&[10.0, 20.0]);
        assert_eq!(ema(&series, 0), None);
    }

    #[test]
    fn volatility_of_constant_series_is_zero() {
        let series = make_series(&[50.0; 5]);
        assert_eq!(volatility(&series, 5), Some(0.0));
    }

    #[test]
    fn volatility_matches_hand_computed_population_stdev() {
        // mean 20, sum of squares 200, population stdev sqrt(200/3).
        let series = make_series(&[10.0, 20.0, 30.0]);
        let expected = (200.0_f64 / 3.0).sqrt();
        assert_relative_eq!(volatility(&series, 3).unwrap(), expected, epsilon = 1e-9);
        assert!((volatility(&series, 3).unwrap() - 8.165).abs() < 1e-3);
    }

    #[test]
    fn volatility_of_zero_prices_is_computed_not_short_circuited() {
        // All-zero closes are legitimate data, not a missing-data signal.
        let series = make_series(&[0.0, 0.0, 0.0]);
        assert_eq!(volatility(&series, 3), Some(0.0));

        let mixed = make_series(&[0.0, 10.0]);
        let mean = 5.0;
        let expected = (((0.0 - mean) * (0.0 - mean) + (10.0 - mean) * (10.0 - mean)) / 2.0_f64)
            .sqrt();
        assert_relative_eq!(volatility(&mixed, 2).unwrap(), expected);
    }

    #[test]
    fn volatility_empty_window_is_no_data() {
        let series = make_series(&[]);
        assert_eq!(volatility(&series, 30), None);
    }

    #[test]
    fn no_data_outcome_is_idempotent() {
        let series = make_series(&[]);
        for analysis in [Analysis::Sma, Analysis::Ema, Analysis::Volatility] {
            assert_eq!(analysis.compute(&series, 30), None);
            assert_eq!(analysis.compute(&series, 30), None);
        }
    }

    #[test]
    fn compute_many_preserves_order_and_locality() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        // days=0 has no data; its siblings still compute.
        let results = compute_many(Analysis::Sma, &series, &[3, 0, 1]);
        assert_eq!(results, vec![Some(20.0), None, Some(30.0)]);
    }

    #[test]
    fn analysis_display_matches_report_labels() {
        assert_eq!(Analysis::Sma.to_string(), "SMA");
        assert_eq!(Analysis::Ema.to_string(), "EMA");
        assert_eq!(Analysis::Volatility.to_string(), "Volatility");
    }

    #[test]
    fn analysis_from_str() {
        assert_eq!("sma".parse::<Analysis>().unwrap(), Analysis::Sma);
        assert_eq!("EMA".parse::<Analysis>().unwrap(), Analysis::Ema);
        assert_eq!("vol".parse::<Analysis>().unwrap(), Analysis::Volatility);
        assert!("macd".parse::<Analysis>().is_err());
    }

    proptest! {
        #[test]
        fn sma_stays_within_close_bounds(
            closes in proptest::collection::vec(1.0_f64..1000.0, 1..25),
            days in 1_u32..40,
        ) {
            let series = make_series(&closes);
            if let Some(value) = sma(&series, days) {
                let window = series.window(days);
                let min = window.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
                let max = window.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
            }
        }

        #[test]
        fn ema_stays_within_close_bounds(
            closes in proptest::collection::vec(1.0_f64..1000.0, 1..25),
            days in 1_u32..40,
        ) {
            let series = make_series(&closes);
            if let Some(value) = ema(&series, days) {
                let window = series.window(days);
                let min = window.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
                let max = window.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
            }
        }

        #[test]
        fn volatility_is_never_negative(
            closes in proptest::collection::vec(0.0_f64..1000.0, 0..25),
            days in 0_u32..40,
        ) {
            let series = make_series(&closes);
            if let Some(value) = volatility(&series, days) {
                prop_assert!(value >= 0.0);
            }
        }
    }
}
