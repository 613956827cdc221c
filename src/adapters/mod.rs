//! Concrete adapter implementations for ports.

pub mod fixed_quote_adapter;
pub mod http_quote_adapter;
pub mod file_config_adapter;
pub mod csv_statement_adapter;
