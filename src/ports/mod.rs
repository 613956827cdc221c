//! Port traits consumed by the domain and CLI.

pub mod market_data_port;
pub mod config_port;
pub mod statement_port;
