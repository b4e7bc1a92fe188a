//! CSV quote-file ingestion source.
//!
//! Reads a directory of `<SYMBOL>.csv` files, one instrument per file, with a
//! `date,open,high,low,close,volume` header row. Dates are accepted as ISO
//! `2023-01-10` or US `01/10/2023`, the format the upstream quote exports use.

use crate::domain::bar::Bar;
use crate::domain::error::StocklensError;
use crate::domain::series::InstrumentSeries;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvDirSource {
    base_path: PathBuf,
}

impl CsvDirSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// All `.csv` files in the source directory, sorted by file name.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, StocklensError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StocklensError::Ingest {
            file: self.base_path.display().to_string(),
            reason: format!("failed to read directory: {e}"),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StocklensError::Ingest {
                file: self.base_path.display().to_string(),
                reason: format!("directory entry error: {e}"),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Loads one quote file into a series. The file stem is the symbol.
    pub fn load_file(&self, path: &Path) -> Result<InstrumentSeries, StocklensError> {
        let file = path.display().to_string();
        let symbol = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| StocklensError::Ingest {
                file: file.clone(),
                reason: "file name is not a valid symbol".into(),
            })?;

        let content = fs::read_to_string(path).map_err(|e| StocklensError::Ingest {
            file: file.clone(),
            reason: format!("failed to read: {e}"),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StocklensError::Ingest {
                file: file.clone(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| StocklensError::Ingest {
                file: file.clone(),
                reason: "missing date column".into(),
            })?;
            let date = parse_date(date_str).map_err(|reason| StocklensError::Ingest {
                file: file.clone(),
                reason,
            })?;

            let number = |i: usize, name: &str| -> Result<f64, StocklensError> {
                record
                    .get(i)
                    .ok_or_else(|| StocklensError::Ingest {
                        file: file.clone(),
                        reason: format!("missing {name} column"),
                    })?
                    .trim()
                    .parse()
                    .map_err(|e| StocklensError::Ingest {
                        file: file.clone(),
                        reason: format!("invalid {name} value: {e}"),
                    })
            };

            bars.push(Bar {
                date,
                open: number(1, "open")?,
                high: number(2, "high")?,
                low: number(3, "low")?,
                close: number(4, "close")?,
                volume: number(5, "volume")?,
            });
        }

        Ok(InstrumentSeries::new(symbol, bars))
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map_err(|_| format!("invalid date: {trimmed} (expected YYYY-MM-DD or MM/DD/YYYY)"))
}
