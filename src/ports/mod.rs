//! Port traits crossed by the domain's collaborators.

pub mod config_port;
pub mod data_port;
pub mod report_port;
