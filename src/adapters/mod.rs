//! Concrete adapter implementations for the ports.

pub mod cache_adapter;
pub mod csv_data_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod retry_adapter;
