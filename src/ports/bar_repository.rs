//! Bar repository port trait.

use crate::domain::error::StocklensError;
use crate::domain::series::InstrumentSeries;
use chrono::NaiveDate;

/// Storage for per-instrument daily quote series, keyed by normalized symbol.
///
/// Ingestion for a symbol is a full replace, never an incremental merge.
/// Callers must serialize a replace with concurrent reads of the same symbol;
/// the repository does not enforce it.
pub trait BarRepository {
    /// Known instrument symbols, sorted ascending.
    fn list_symbols(&self) -> Result<Vec<String>, StocklensError>;

    /// Full history for one symbol, ascending by date. Fails with
    /// [`StocklensError::UnknownSymbol`] when the symbol has no bars.
    fn get_series(&self, symbol: &str) -> Result<InstrumentSeries, StocklensError>;

    /// Drops any existing bars for the series' symbol and stores the given
    /// bars in their place.
    fn replace_series(&self, series: &InstrumentSeries) -> Result<(), StocklensError>;

    /// Removes a symbol's series entirely. Removing an unknown symbol is not
    /// an error.
    fn remove_series(&self, symbol: &str) -> Result<(), StocklensError>;

    /// First date, last date and bar count for a symbol, if any bars exist.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StocklensError>;
}
