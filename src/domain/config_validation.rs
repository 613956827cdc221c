//! Session configuration validation.
//!
//! Checks a config file before a session starts so bad values fail up front
//! instead of mid-session.

use super::error::PapertraderError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_MARKET_MODE: &str = "fixed";
pub const DEFAULT_ENROLLMENT_FEE: f64 = 1.0;

pub fn validate_session_config(config: &dyn ConfigPort) -> Result<(), PapertraderError> {
    validate_market_mode(config)?;
    validate_api_key(config)?;
    validate_enrollment_fee(config)?;
    Ok(())
}

fn validate_market_mode(config: &dyn ConfigPort) -> Result<(), PapertraderError> {
    let mode = config
        .get_string("market", "mode")
        .unwrap_or_else(|| DEFAULT_MARKET_MODE.to_string());
    match mode.as_str() {
        "fixed" | "live" => Ok(()),
        other => Err(PapertraderError::ConfigInvalid {
            section: "market".to_string(),
            key: "mode".to_string(),
            reason: format!("expected fixed or live, got {other}"),
        }),
    }
}

fn validate_api_key(config: &dyn ConfigPort) -> Result<(), PapertraderError> {
    let mode = config
        .get_string("market", "mode")
        .unwrap_or_else(|| DEFAULT_MARKET_MODE.to_string());
    if mode != "live" {
        return Ok(());
    }
    match config.get_string("market", "api_key") {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(PapertraderError::ConfigMissing {
            section: "market".to_string(),
            key: "api_key".to_string(),
        }),
    }
}

fn validate_enrollment_fee(config: &dyn ConfigPort) -> Result<(), PapertraderError> {
    let fee = config.get_double("account", "enrollment_fee", DEFAULT_ENROLLMENT_FEE);
    if fee < 0.0 {
        return Err(PapertraderError::ConfigInvalid {
            section: "account".to_string(),
            key: "enrollment_fee".to_string(),
            reason: "enrollment_fee must be non-negative".to_string(),
        });
    }
    Ok(())
}
