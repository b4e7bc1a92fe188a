//! Concrete adapter implementations for ports.

#[cfg(feature = "sqlite")]
pub mod sqlite_repository;
pub mod csv_source;
pub mod file_config_adapter;
pub mod console_report;
