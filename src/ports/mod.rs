//! Port traits decoupling the domain from storage, config and presentation.

pub mod bar_repository;
pub mod config_port;
pub mod report_port;
