#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use stocklens::domain::bar::Bar;
use stocklens::domain::error::StocklensError;
use stocklens::domain::series::{normalize_symbol, InstrumentSeries};
use stocklens::ports::bar_repository::BarRepository;

pub struct MockBarRepository {
    pub data: HashMap<String, InstrumentSeries>,
    pub errors: HashMap<String, String>,
}

impl MockBarRepository {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        let series = InstrumentSeries::new(symbol, bars);
        self.data.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors
            .insert(normalize_symbol(symbol), reason.to_string());
        self
    }
}

impl BarRepository for MockBarRepository {
    fn list_symbols(&self) -> Result<Vec<String>, StocklensError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_series(&self, symbol: &str) -> Result<InstrumentSeries, StocklensError> {
        let symbol = normalize_symbol(symbol);
        if let Some(reason) = self.errors.get(&symbol) {
            return Err(StocklensError::Database {
                reason: reason.clone(),
            });
        }
        self.data
            .get(&symbol)
            .cloned()
            .ok_or(StocklensError::UnknownSymbol { symbol })
    }

    fn replace_series(&self, _series: &InstrumentSeries) -> Result<(), StocklensError> {
        unimplemented!("mock repository is read-only")
    }

    fn remove_series(&self, _symbol: &str) -> Result<(), StocklensError> {
        unimplemented!("mock repository is read-only")
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StocklensError> {
        match self.data.get(&normalize_symbol(symbol)) {
            Some(series) if !series.is_empty() => {
                let first = series.bars()[0].date;
                let last = series.latest_date().unwrap();
                Ok(Some((first, last, series.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> Bar {
    Bar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<Bar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| Bar {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000.0,
        })
        .collect()
}
