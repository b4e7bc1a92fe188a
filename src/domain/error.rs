//! Domain error types.

use crate::domain::day_counts::DayCountError;

/// Top-level error type for stocklens.
#[derive(Debug, thiserror::Error)]
pub enum StocklensError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("ingest error in {file}: {reason}")]
    Ingest { file: String, reason: String },

    #[error(transparent)]
    DayCounts(#[from] DayCountError),

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocklensError> for std::process::ExitCode {
    fn from(err: &StocklensError) -> Self {
        let code: u8 = match err {
            StocklensError::Io(_) => 1,
            StocklensError::ConfigParse { .. }
            | StocklensError::ConfigMissing { .. }
            | StocklensError::ConfigInvalid { .. } => 2,
            StocklensError::Database { .. } | StocklensError::DatabaseQuery { .. } => 3,
            StocklensError::Ingest { .. } | StocklensError::DayCounts(_) => 4,
            StocklensError::UnknownSymbol { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
