//! Deterministic quote adapter.
//!
//! Serves the fixed price table used for offline sessions and tests:
//! `CORNELL` at 18.65, `HARVARD` at 0.0, any other ticker at 1.0, and the
//! coin at 18.65. Extra tickers can be pinned with [`FixedQuoteAdapter::with_price`].

use std::collections::HashMap;

use crate::ports::market_data_port::MarketDataPort;

pub const CORNELL_PRICE: f64 = 18.65;
pub const DEFAULT_STOCK_PRICE: f64 = 1.0;
pub const BTC_PRICE: f64 = 18.65;

#[derive(Debug)]
pub struct FixedQuoteAdapter {
    overrides: HashMap<String, f64>,
}

impl FixedQuoteAdapter {
    pub fn new() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert("CORNELL".to_string(), CORNELL_PRICE);
        overrides.insert("HARVARD".to_string(), 0.0);
        FixedQuoteAdapter { overrides }
    }

    /// Pin `ticker` at `price` for this adapter instance.
    pub fn with_price(mut self, ticker: &str, price: f64) -> Self {
        self.overrides.insert(ticker.to_string(), price);
        self
    }
}

impl Default for FixedQuoteAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataPort for FixedQuoteAdapter {
    fn stock_price(&self, ticker: &str) -> f64 {
        self.overrides
            .get(ticker)
            .copied()
            .unwrap_or(DEFAULT_STOCK_PRICE)
    }

    fn btc_price(&self) -> f64 {
        BTC_PRICE
    }
}
