//! Stock lot tracking.
//!
//! A lot is one discrete purchase of shares of a ticker. Lots are archival:
//! selling drives `shares` to zero but never removes the lot from the
//! portfolio, so past purchases stay discoverable.

use chrono::NaiveDateTime;

use super::error::PapertraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct StockLot {
    ticker: String,
    shares: u64,
    buy_price: f64,
    buy_date: NaiveDateTime,
    short: bool,
}

impl StockLot {
    /// Create a lot. The ticker must be non-empty and the per-share purchase
    /// price non-negative.
    pub fn new(
        ticker: &str,
        buy_price: f64,
        shares: u64,
        short: bool,
        buy_date: NaiveDateTime,
    ) -> Result<Self, PapertraderError> {
        if ticker.is_empty() {
            return Err(PapertraderError::invalid_state("lot ticker must not be empty"));
        }
        if buy_price < 0.0 || buy_price.is_nan() {
            return Err(PapertraderError::invalid_state(format!(
                "lot buy price {buy_price} must be non-negative"
            )));
        }
        Ok(StockLot {
            ticker: ticker.to_string(),
            shares,
            buy_price,
            buy_date,
            short,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn buy_price(&self) -> f64 {
        self.buy_price
    }

    pub fn buy_date(&self) -> NaiveDateTime {
        self.buy_date
    }

    pub fn is_short(&self) -> bool {
        self.short
    }

    /// Remove `count` shares from the lot. Selling more than the lot holds is
    /// a caller bug, not a business refusal.
    pub fn reduce_shares(&mut self, count: u64) -> Result<(), PapertraderError> {
        if count > self.shares {
            return Err(PapertraderError::invalid_state(format!(
                "cannot remove {count} shares from a lot of {held}",
                held = self.shares
            )));
        }
        self.shares -= count;
        Ok(())
    }
}
