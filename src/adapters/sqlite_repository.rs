//! SQLite bar repository adapter.

use crate::domain::bar::Bar;
use crate::domain::error::StocklensError;
use crate::domain::series::{normalize_symbol, InstrumentSeries};
use crate::ports::bar_repository::BarRepository;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteRepository {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StocklensError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| StocklensError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| StocklensError::Database {
                    reason: e.to_string(),
                })?;

        let repo = Self { pool };
        repo.initialize_schema()?;
        Ok(repo)
    }

    pub fn in_memory() -> Result<Self, StocklensError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        let repo = Self { pool };
        repo.initialize_schema()?;
        Ok(repo)
    }

    fn initialize_schema(&self) -> Result<(), StocklensError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bars (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL,
                PRIMARY KEY (symbol, date)
            );
            CREATE INDEX IF NOT EXISTS idx_bars_symbol ON bars(symbol);",
        )
        .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

impl BarRepository for SqliteRepository {
    fn list_symbols(&self) -> Result<Vec<String>, StocklensError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM bars ORDER BY symbol")
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(
                row.map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(symbols)
    }

    fn get_series(&self, symbol: &str) -> Result<InstrumentSeries, StocklensError> {
        let symbol = normalize_symbol(symbol);
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        let mut stmt = conn
            .prepare(
                "SELECT date, open, high, low, close, volume
                 FROM bars WHERE symbol = ?1 ORDER BY date ASC",
            )
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![symbol], |row| {
                let date_str: String = row.get(0)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        date_str.len(),
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(Bar {
                    date,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            })
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(
                row.map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        if bars.is_empty() {
            return Err(StocklensError::UnknownSymbol { symbol });
        }

        Ok(InstrumentSeries::new(&symbol, bars))
    }

    fn replace_series(&self, series: &InstrumentSeries) -> Result<(), StocklensError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        tx.execute("DELETE FROM bars WHERE symbol = ?1", params![series.symbol()])
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for bar in series.bars() {
            tx.execute(
                "INSERT INTO bars (symbol, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    series.symbol(),
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(())
    }

    fn remove_series(&self, symbol: &str) -> Result<(), StocklensError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        conn.execute(
            "DELETE FROM bars WHERE symbol = ?1",
            params![normalize_symbol(symbol)],
        )
        .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StocklensError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| StocklensError::Database {
                reason: e.to_string(),
            })?;

        let result = conn
            .query_row(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM bars WHERE symbol = ?1",
                params![normalize_symbol(symbol)],
                |row| {
                    let min: Option<String> = row.get(0)?;
                    let max: Option<String> = row.get(1)?;
                    let count: i64 = row.get(2)?;
                    Ok((min, max, count))
                },
            )
            .map_err(|e: rusqlite::Error| StocklensError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min), Some(max), count) if count > 0 => {
                let parse = |s: &str| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                        StocklensError::DatabaseQuery {
                            reason: format!("stored date {s} is not ISO-8601: {e}"),
                        }
                    })
                };
                Ok(Some((parse(&min)?, parse(&max)?, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
