//! Console report adapter.
//!
//! Renders one block per analysis with a `N days: value` row per requested
//! day-count. Absent values print as `no data` rather than a zero that could
//! be mistaken for a computed result.

use crate::domain::error::StocklensError;
use crate::domain::report::AnalysisReport;
use crate::ports::report_port::ReportPort;
use std::fmt::Write;

pub struct ConsoleReportAdapter;

impl ReportPort for ConsoleReportAdapter {
    fn write(&self, report: &AnalysisReport) -> Result<(), StocklensError> {
        print!("{}", render(report));
        Ok(())
    }
}

pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", report.symbol);

    for section in &report.sections {
        let _ = writeln!(out, "{}:", section.analysis);
        for row in &section.rows {
            match row.value {
                Some(value) => {
                    let _ = writeln!(out, "{} days: {:.2}", row.days, value);
                }
                None => {
                    let _ = writeln!(out, "{} days: no data", row.days);
                }
            }
        }
        out.push('\n');
    }

    out
}
