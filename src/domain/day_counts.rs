//! Day-count list parsing for analysis requests.
//!
//! Day-count lists arrive as comma-separated strings from config or the
//! command line, e.g. `30,180,360`.

use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DayCountError {
    #[error("empty token in day-count list")]
    EmptyToken,

    #[error("invalid day count: {0}")]
    Invalid(String),

    #[error("day count must be positive")]
    Zero,

    #[error("duplicate day count: {0}")]
    Duplicate(u32),
}

pub fn parse_day_counts(input: &str) -> Result<Vec<u32>, DayCountError> {
    let mut day_counts = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DayCountError::EmptyToken);
        }
        let days: u32 = trimmed
            .parse()
            .map_err(|_| DayCountError::Invalid(trimmed.to_string()))?;
        if days == 0 {
            return Err(DayCountError::Zero);
        }
        if !seen.insert(days) {
            return Err(DayCountError::Duplicate(days));
        }
        day_counts.push(days);
    }

    Ok(day_counts)
}
