//! Report output port trait.

use crate::domain::error::StocklensError;
use crate::domain::report::AnalysisReport;

/// Port for presenting computed analysis values.
pub trait ReportPort {
    fn write(&self, report: &AnalysisReport) -> Result<(), StocklensError>;
}
